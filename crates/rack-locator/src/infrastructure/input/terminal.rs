//! Terminal input capture.
//!
//! Puts the terminal into raw mode with mouse capture enabled and runs a
//! capture thread that translates crossterm events into [`RawInputEvent`]s:
//!
//! - Digit and backspace keys maintain the numeric entry text (this source
//!   *is* the entry widget) and emit [`RawInputEvent::EntryChanged`] with the
//!   full current contents on every change.
//! - Left-button press, drag, and release over the diagram become pointer
//!   events, translated into diagram-local units using the origin the
//!   renderer drew the diagram at.
//! - `q`, `Esc`, and `Ctrl-C` emit [`RawInputEvent::Quit`].
//!
//! The capture thread blocks in `crossterm::event::read()`; after `stop()`
//! it exits on the next event or when the receiver is dropped.

use std::io;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc, Arc,
};
use std::thread;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal;
use crossterm::ExecutableCommand;
use tracing::{debug, warn};

use super::{CaptureError, InputSource, RawInputEvent};

/// Captures interactive terminal input on a dedicated thread.
pub struct TerminalInputSource {
    /// Screen column of the diagram's top-left corner.
    origin_x: u16,
    /// Screen row of the diagram's top-left corner.
    origin_y: u16,
    active: Arc<AtomicBool>,
}

impl TerminalInputSource {
    /// Creates a source translating pointer positions relative to the given
    /// diagram origin on screen.
    pub fn new(origin_x: u16, origin_y: u16) -> Self {
        Self {
            origin_x,
            origin_y,
            active: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl InputSource for TerminalInputSource {
    fn start(&self) -> Result<mpsc::Receiver<RawInputEvent>, CaptureError> {
        if self.active.swap(true, Ordering::SeqCst) {
            return Err(CaptureError::AlreadyStarted);
        }

        if let Err(e) = terminal::enable_raw_mode() {
            self.active.store(false, Ordering::SeqCst);
            return Err(CaptureError::RawMode(e.to_string()));
        }
        if let Err(e) = io::stdout().execute(EnableMouseCapture) {
            let _ = terminal::disable_raw_mode();
            self.active.store(false, Ordering::SeqCst);
            return Err(CaptureError::MouseCapture(e.to_string()));
        }

        let (tx, rx) = mpsc::channel();
        let active = Arc::clone(&self.active);
        let (origin_x, origin_y) = (self.origin_x, self.origin_y);

        thread::spawn(move || {
            let mut entry = String::new();
            while active.load(Ordering::Relaxed) {
                let event = match event::read() {
                    Ok(event) => event,
                    Err(e) => {
                        warn!("terminal event read failed: {e}");
                        break;
                    }
                };
                let translated = match event {
                    Event::Key(key) => translate_key(&key, &mut entry),
                    Event::Mouse(mouse) => translate_mouse(&mouse, origin_x, origin_y),
                    _ => None,
                };
                if let Some(raw) = translated {
                    if tx.send(raw).is_err() {
                        break;
                    }
                }
            }
            debug!("terminal capture thread exiting");
        });

        Ok(rx)
    }

    fn stop(&self) {
        self.active.store(false, Ordering::SeqCst);
        if let Err(e) = io::stdout().execute(DisableMouseCapture) {
            warn!("failed to disable mouse capture: {e}");
        }
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("failed to leave raw mode: {e}");
        }
    }
}

/// Translates one key event, updating the entry text as a side effect.
fn translate_key(key: &KeyEvent, entry: &mut String) -> Option<RawInputEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(RawInputEvent::Quit)
        }
        KeyCode::Char('q') | KeyCode::Esc => Some(RawInputEvent::Quit),
        KeyCode::Char(c) if c.is_ascii_digit() => {
            entry.push(c);
            Some(RawInputEvent::EntryChanged(entry.clone()))
        }
        KeyCode::Backspace => {
            entry.pop();
            Some(RawInputEvent::EntryChanged(entry.clone()))
        }
        KeyCode::Delete => {
            entry.clear();
            Some(RawInputEvent::EntryChanged(entry.clone()))
        }
        _ => None,
    }
}

/// Translates one mouse event into diagram-local units.
fn translate_mouse(mouse: &MouseEvent, origin_x: u16, origin_y: u16) -> Option<RawInputEvent> {
    let x = i32::from(mouse.column) - i32::from(origin_x);
    let y = i32::from(mouse.row) - i32::from(origin_y);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(RawInputEvent::PointerDown { x, y }),
        MouseEventKind::Drag(MouseButton::Left) => Some(RawInputEvent::PointerMove { x, y }),
        MouseEventKind::Up(MouseButton::Left) => Some(RawInputEvent::PointerUp),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    // ── Key translation ───────────────────────────────────────────────────────

    #[test]
    fn test_digits_accumulate_into_the_entry_text() {
        let mut entry = String::new();

        let first = translate_key(&key(KeyCode::Char('4')), &mut entry);
        let second = translate_key(&key(KeyCode::Char('5')), &mut entry);

        assert_eq!(first, Some(RawInputEvent::EntryChanged("4".to_string())));
        assert_eq!(second, Some(RawInputEvent::EntryChanged("45".to_string())));
    }

    #[test]
    fn test_backspace_removes_the_last_digit() {
        let mut entry = "45".to_string();

        let result = translate_key(&key(KeyCode::Backspace), &mut entry);

        assert_eq!(result, Some(RawInputEvent::EntryChanged("4".to_string())));
    }

    #[test]
    fn test_backspace_on_empty_entry_reports_empty_text() {
        let mut entry = String::new();

        let result = translate_key(&key(KeyCode::Backspace), &mut entry);

        assert_eq!(result, Some(RawInputEvent::EntryChanged(String::new())));
    }

    #[test]
    fn test_delete_clears_the_whole_entry() {
        let mut entry = "180".to_string();

        let result = translate_key(&key(KeyCode::Delete), &mut entry);

        assert_eq!(result, Some(RawInputEvent::EntryChanged(String::new())));
    }

    #[test]
    fn test_non_digit_characters_are_ignored() {
        let mut entry = "4".to_string();

        let result = translate_key(&key(KeyCode::Char('x')), &mut entry);

        assert_eq!(result, None);
        assert_eq!(entry, "4");
    }

    #[test]
    fn test_q_and_escape_and_ctrl_c_quit() {
        let mut entry = String::new();
        assert_eq!(
            translate_key(&key(KeyCode::Char('q')), &mut entry),
            Some(RawInputEvent::Quit)
        );
        assert_eq!(
            translate_key(&key(KeyCode::Esc), &mut entry),
            Some(RawInputEvent::Quit)
        );
        assert_eq!(
            translate_key(
                &KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                &mut entry
            ),
            Some(RawInputEvent::Quit)
        );
    }

    #[test]
    fn test_key_release_events_are_ignored() {
        let mut entry = String::new();
        let release = KeyEvent {
            code: KeyCode::Char('4'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };

        assert_eq!(translate_key(&release, &mut entry), None);
        assert!(entry.is_empty());
    }

    // ── Mouse translation ─────────────────────────────────────────────────────

    #[test]
    fn test_left_press_becomes_pointer_down_in_diagram_units() {
        let result = translate_mouse(
            &mouse(MouseEventKind::Down(MouseButton::Left), 12, 7),
            2,
            4,
        );
        assert_eq!(result, Some(RawInputEvent::PointerDown { x: 10, y: 3 }));
    }

    #[test]
    fn test_left_drag_becomes_pointer_move() {
        let result = translate_mouse(
            &mouse(MouseEventKind::Drag(MouseButton::Left), 2, 4),
            2,
            4,
        );
        assert_eq!(result, Some(RawInputEvent::PointerMove { x: 0, y: 0 }));
    }

    #[test]
    fn test_position_left_of_the_origin_goes_negative() {
        // Off-diagram positions still flow through; resolution decides.
        let result = translate_mouse(
            &mouse(MouseEventKind::Drag(MouseButton::Left), 0, 0),
            2,
            4,
        );
        assert_eq!(result, Some(RawInputEvent::PointerMove { x: -2, y: -4 }));
    }

    #[test]
    fn test_left_release_becomes_pointer_up() {
        let result = translate_mouse(&mouse(MouseEventKind::Up(MouseButton::Left), 30, 9), 2, 4);
        assert_eq!(result, Some(RawInputEvent::PointerUp));
    }

    #[test]
    fn test_other_buttons_and_plain_motion_are_ignored() {
        assert_eq!(
            translate_mouse(&mouse(MouseEventKind::Down(MouseButton::Right), 5, 5), 2, 4),
            None
        );
        assert_eq!(
            translate_mouse(&mouse(MouseEventKind::Moved, 5, 5), 2, 4),
            None
        );
        assert_eq!(
            translate_mouse(&mouse(MouseEventKind::ScrollDown, 5, 5), 2, 4),
            None
        );
    }
}
