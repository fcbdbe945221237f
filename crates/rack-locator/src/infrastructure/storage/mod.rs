//! File-system storage for the locator.
//!
//! Only configuration lives on disk; the tool itself is ephemeral and keeps
//! no session state between runs.

pub mod config;
