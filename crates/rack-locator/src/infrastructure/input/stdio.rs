//! Line-command input source for the JSON bridge mode.
//!
//! When an external rendering surface drives the locator, it feeds simple
//! text commands on stdin (one per line) and consumes JSON notifications on
//! stdout.  The command set mirrors [`RawInputEvent`] directly:
//!
//! ```text
//! seq 45        numeric entry text changed to "45"
//! seq           numeric entry text cleared
//! down 12 3     primary button pressed at diagram-local (12, 3)
//! move 13 3     pointer moved with the button held
//! up            primary button released
//! cancel        gesture abandoned
//! quit          leave the tool
//! ```
//!
//! Pointer coordinates are diagram-local: the external surface owns its own
//! pixel layout and translates before sending, exactly as the terminal
//! capture translates screen cells.

use std::io::{self, BufRead};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc, Arc,
};
use std::thread;

use tracing::{debug, warn};

use super::{CaptureError, InputSource, RawInputEvent};

/// Reads bridge commands from stdin on a dedicated thread.
pub struct StdioInputSource {
    active: Arc<AtomicBool>,
}

impl StdioInputSource {
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Default for StdioInputSource {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for StdioInputSource {
    fn start(&self) -> Result<mpsc::Receiver<RawInputEvent>, CaptureError> {
        if self.active.swap(true, Ordering::SeqCst) {
            return Err(CaptureError::AlreadyStarted);
        }

        let (tx, rx) = mpsc::channel();
        let active = Arc::clone(&self.active);

        thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                if !active.load(Ordering::Relaxed) {
                    break;
                }
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!("stdin read failed: {e}");
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Some(event) => {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                    None => warn!("ignoring malformed command: {line:?}"),
                }
            }
            // End of input from the driving surface means we are done.
            let _ = tx.send(RawInputEvent::Quit);
            debug!("stdio capture thread exiting");
        });

        Ok(rx)
    }

    fn stop(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

/// Parses one bridge command line.
///
/// Returns `None` for commands that are not well-formed; the caller decides
/// whether to log or drop them.
pub fn parse_command(line: &str) -> Option<RawInputEvent> {
    let trimmed = line.trim();
    let (verb, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (trimmed, ""),
    };

    match verb {
        "seq" => Some(RawInputEvent::EntryChanged(rest.to_string())),
        "down" | "move" => {
            let mut parts = rest.split_whitespace();
            let x: i32 = parts.next()?.parse().ok()?;
            let y: i32 = parts.next()?.parse().ok()?;
            if parts.next().is_some() {
                return None;
            }
            if verb == "down" {
                Some(RawInputEvent::PointerDown { x, y })
            } else {
                Some(RawInputEvent::PointerMove { x, y })
            }
        }
        "up" if rest.is_empty() => Some(RawInputEvent::PointerUp),
        "cancel" if rest.is_empty() => Some(RawInputEvent::PointerCancel),
        "quit" if rest.is_empty() => Some(RawInputEvent::Quit),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
