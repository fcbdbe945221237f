//! Infrastructure layer for the locator.
//!
//! Contains the outward-facing adapters: terminal input capture, rendering
//! surfaces, and file-system configuration.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `rack_core`, but MUST NOT be imported by the application or domain layers
//! (the application layer's `RawInputEvent` input contract in
//! `infrastructure::input` is the one deliberate exception).

pub mod display;
pub mod input;
pub mod storage;
