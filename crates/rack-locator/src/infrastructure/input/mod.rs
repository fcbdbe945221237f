//! Input capture infrastructure for the locator.
//!
//! The interactive frontend runs the terminal in raw mode with mouse capture
//! enabled and translates key and mouse events into [`RawInputEvent`]s on a
//! dedicated capture thread.  Events are placed into a channel and consumed
//! by the single event-handling thread, which processes each one to
//! completion before taking the next.
//!
//! Pointer positions are translated into diagram-local units before they
//! enter the channel: the application layer never sees terminal screen
//! coordinates.
//!
//! # Testability
//!
//! The [`InputSource`] trait allows unit tests to inject synthetic events
//! without a real terminal.

use std::sync::mpsc;

pub mod mock;
pub mod stdio;
pub mod terminal;

/// A raw input event produced by the input capture infrastructure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInputEvent {
    /// The numeric entry text changed; carries the full current contents.
    EntryChanged(String),
    /// Primary button pressed at a diagram-local position.
    PointerDown { x: i32, y: i32 },
    /// Pointer moved with the primary button held.
    PointerMove { x: i32, y: i32 },
    /// Primary button released.
    PointerUp,
    /// The platform abandoned the gesture without a release.
    PointerCancel,
    /// The user asked to leave the tool.
    Quit,
}

/// Error type for input capture operations.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("failed to enter raw terminal mode: {0}")]
    RawMode(String),
    #[error("failed to enable mouse capture: {0}")]
    MouseCapture(String),
    #[error("capture source has already been started")]
    AlreadyStarted,
}

/// Trait abstracting input event production.
///
/// The interactive implementation reads the terminal; the JSON bridge reads
/// stdin lines; tests use [`mock::MockInputSource`].
pub trait InputSource: Send {
    /// Starts the input source and returns a receiver for captured events.
    fn start(&self) -> Result<mpsc::Receiver<RawInputEvent>, CaptureError>;

    /// Stops the input source and releases any terminal state it claimed.
    fn stop(&self);
}
