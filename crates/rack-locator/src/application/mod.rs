//! Application layer use cases for the locator.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure business rules) and the infrastructure (terminal, file system).
//!
//! Use cases in this layer orchestrate domain objects to fulfil a user goal,
//! depend on abstractions (traits) rather than concrete implementations, and
//! contain no OS calls, no terminal I/O, and no file system access.  The
//! infrastructure behind those traits can be swapped (terminal, JSON bridge,
//! recording test double) without touching this code.
//!
//! # Sub-modules
//!
//! - **`select_location`** – Owns the current selection and the pointer
//!   gesture lifecycle.  Receives raw input events (typed sequence entry and
//!   pointer down/move/up) and keeps the rendering surface in sync.  This is
//!   the most critical path; it runs on every keystroke and on every
//!   pointer-move of a drag.

pub mod select_location;
