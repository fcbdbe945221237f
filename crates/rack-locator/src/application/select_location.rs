//! SelectLocationUseCase: keeps the highlighted rack cell in sync with input.
//!
//! This use case is the heart of the locator.  It owns the current selection
//! and the pointer gesture state, accepts the two kinds of user input (typed
//! sequence entry and pointer events over the diagram), resolves them through
//! the domain layer, and pushes every resulting change to the
//! [`SelectionRenderer`].
//!
//! # Architecture
//!
//! The use case depends only on traits (`SelectionRenderer`) and domain types
//! (`RackLayout`, `DiagramGeometry`).  The rendering surface is injected at
//! construction time, making the use case fully unit-testable, and each
//! instance owns its state outright, so two instances never interfere.
//!
//! All handling is synchronous and O(1) per event: pointer-moves arrive every
//! few milliseconds during a fast drag and each one must complete before the
//! next is delivered.

use std::num::IntErrorKind;
use std::sync::Arc;

use thiserror::Error;

use rack_core::{
    CellCoordinate, DiagramGeometry, GridPoint, RackLayout, SequenceNumber,
};

use crate::infrastructure::input::RawInputEvent;

/// Error type for the select-location use case.
#[derive(Debug, Error)]
pub enum SelectError {
    #[error("renderer error: {0}")]
    Render(String),
}

/// User-visible validation failures for typed sequence entry.
///
/// Both conditions are expected and frequent; they surface next to the entry
/// box and never abort anything.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntryError {
    /// The entry text is not a positive integer.
    #[error("Sequence must be a positive integer.")]
    NotANumber,
    /// The entry parsed but falls outside the load capacity.
    #[error("Sequence must be between {min} and {max}.")]
    OutOfRange { min: u16, max: u16 },
}

/// The currently highlighted tube slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub sequence: SequenceNumber,
    pub cell: CellCoordinate,
}

/// Trait for pushing selection changes to a rendering surface.
///
/// Infrastructure implementations draw to the terminal or emit JSON lines;
/// test implementations record calls.
pub trait SelectionRenderer: Send + Sync {
    /// A new slot is highlighted.
    fn selection_changed(&self, selection: Selection) -> Result<(), String>;

    /// No slot is highlighted any more.
    fn selection_cleared(&self) -> Result<(), String>;

    /// Typed entry was rejected; show the validation message.
    fn show_entry_error(&self, error: &EntryError) -> Result<(), String>;

    /// The last validation message no longer applies.
    fn clear_entry_error(&self) -> Result<(), String>;
}

/// Phase of the pointer interaction state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    /// No active drag; the selection only moves via typed entry.
    #[default]
    Idle,
    /// Pointer held down; the selection follows the pointer.
    Dragging,
}

/// An in-progress drag: created on pointer-down, destroyed on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PointerGesture {
    start: GridPoint,
    current: GridPoint,
}

/// The Select Location use case.
///
/// Receives raw input events, resolves them against the rack layout, and
/// keeps the renderer in sync with the selection.
pub struct SelectLocationUseCase {
    geometry: DiagramGeometry,
    selection: Option<Selection>,
    gesture: Option<PointerGesture>,
    renderer: Arc<dyn SelectionRenderer>,
}

impl SelectLocationUseCase {
    /// Creates a use case with no selection and no active gesture.
    pub fn new(geometry: DiagramGeometry, renderer: Arc<dyn SelectionRenderer>) -> Self {
        Self {
            geometry,
            selection: None,
            gesture: None,
            renderer,
        }
    }

    /// Returns the currently highlighted slot, if any.
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Returns the current phase of the pointer state machine.
    pub fn gesture_state(&self) -> GestureState {
        if self.gesture.is_some() {
            GestureState::Dragging
        } else {
            GestureState::Idle
        }
    }

    /// Where the active drag began, if one is in progress.
    ///
    /// Renderers can use this to visualise the sweep from press to the
    /// current position.
    pub fn gesture_origin(&self) -> Option<GridPoint> {
        self.gesture.map(|g| g.start)
    }

    /// Handles one raw input event to completion.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::Render`] if the renderer fails to apply a
    /// notification.  Malformed entry text and off-slot pointer positions are
    /// not errors; they resolve to a validation message or a silent no-op.
    pub fn handle_event(&mut self, event: RawInputEvent) -> Result<(), SelectError> {
        match event {
            RawInputEvent::EntryChanged(raw) => self.enter_sequence(&raw),
            RawInputEvent::PointerDown { x, y } => self.pointer_down(GridPoint::new(x, y)),
            RawInputEvent::PointerMove { x, y } => self.pointer_move(GridPoint::new(x, y)),
            RawInputEvent::PointerUp | RawInputEvent::PointerCancel => self.pointer_up(),
            // Shutdown is the event loop's concern, not a selection change.
            RawInputEvent::Quit => Ok(()),
        }
    }

    /// Applies a change of the numeric entry text.
    ///
    /// Empty entry clears the selection and any stale validation message.
    /// Invalid entry leaves the previous selection untouched and surfaces the
    /// validation message.  Valid entry highlights the tube's slot.
    pub fn enter_sequence(&mut self, raw: &str) -> Result<(), SelectError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.selection = None;
            self.renderer
                .selection_cleared()
                .map_err(SelectError::Render)?;
            return self
                .renderer
                .clear_entry_error()
                .map_err(SelectError::Render);
        }

        match parse_sequence(trimmed) {
            Ok(sequence) => {
                let cell = RackLayout::to_coordinate(sequence);
                self.set_selection(Selection { sequence, cell })
            }
            Err(error) => self
                .renderer
                .show_entry_error(&error)
                .map_err(SelectError::Render),
        }
    }

    // ── Pointer gesture handlers ──────────────────────────────────────────────

    fn pointer_down(&mut self, point: GridPoint) -> Result<(), SelectError> {
        self.gesture = Some(PointerGesture {
            start: point,
            current: point,
        });
        self.track(point)
    }

    fn pointer_move(&mut self, point: GridPoint) -> Result<(), SelectError> {
        match self.gesture.as_mut() {
            Some(gesture) => gesture.current = point,
            // Moves without a held pointer do not affect the selection.
            None => return Ok(()),
        }
        self.track(point)
    }

    fn pointer_up(&mut self) -> Result<(), SelectError> {
        // The selection persists after release; only the gesture ends.
        self.gesture = None;
        Ok(())
    }

    /// Follows the pointer with the selection.
    ///
    /// Off-slot positions (pane gap, padding slots, outside the diagram) are
    /// a silent no-op so the previous highlight persists while the pointer
    /// drifts toward a valid cell.
    fn track(&mut self, point: GridPoint) -> Result<(), SelectError> {
        let Some(cell) = self.geometry.resolve(point) else {
            return Ok(());
        };
        let Ok(sequence) = RackLayout::to_sequence(cell) else {
            // resolve() only yields addressable slots; nothing to do here
            // beyond not disturbing the selection.
            return Ok(());
        };
        if self.selection.map(|s| s.sequence) == Some(sequence) {
            return Ok(());
        }
        self.set_selection(Selection { sequence, cell })
    }

    fn set_selection(&mut self, selection: Selection) -> Result<(), SelectError> {
        self.selection = Some(selection);
        self.renderer
            .selection_changed(selection)
            .map_err(SelectError::Render)?;
        // A highlighted slot is always a valid state; retire any stale
        // validation message.
        self.renderer
            .clear_entry_error()
            .map_err(SelectError::Render)
    }
}

/// Parses entry text into a validated sequence number.
fn parse_sequence(trimmed: &str) -> Result<SequenceNumber, EntryError> {
    match trimmed.parse::<u32>() {
        Ok(value) => SequenceNumber::new(value).map_err(|_| EntryError::OutOfRange {
            min: SequenceNumber::MIN,
            max: SequenceNumber::MAX,
        }),
        // A number too large to represent is out of range, not malformed.
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow) => Err(EntryError::OutOfRange {
            min: SequenceNumber::MIN,
            max: SequenceNumber::MAX,
        }),
        Err(_) => Err(EntryError::NotANumber),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rack_core::Rack;
    use std::sync::Mutex;

    // ── Test doubles ──────────────────────────────────────────────────────────

    /// Everything a renderer was told, in order.
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Notified {
        Changed(u16),
        Cleared,
        Error(EntryError),
        ErrorCleared,
    }

    #[derive(Default)]
    struct RecordingRenderer {
        notifications: Mutex<Vec<Notified>>,
        should_fail: bool,
    }

    impl RecordingRenderer {
        fn notifications(&self) -> Vec<Notified> {
            self.notifications.lock().unwrap().clone()
        }

        fn record(&self, n: Notified) -> Result<(), String> {
            if self.should_fail {
                return Err("injected failure".to_string());
            }
            self.notifications.lock().unwrap().push(n);
            Ok(())
        }
    }

    impl SelectionRenderer for RecordingRenderer {
        fn selection_changed(&self, selection: Selection) -> Result<(), String> {
            self.record(Notified::Changed(selection.sequence.get()))
        }

        fn selection_cleared(&self) -> Result<(), String> {
            self.record(Notified::Cleared)
        }

        fn show_entry_error(&self, error: &EntryError) -> Result<(), String> {
            self.record(Notified::Error(error.clone()))
        }

        fn clear_entry_error(&self) -> Result<(), String> {
            self.record(Notified::ErrorCleared)
        }
    }

    fn make_use_case() -> (SelectLocationUseCase, Arc<RecordingRenderer>) {
        let renderer = Arc::new(RecordingRenderer::default());
        let uc = SelectLocationUseCase::new(
            DiagramGeometry::new(4, 1, 3),
            Arc::clone(&renderer) as Arc<dyn SelectionRenderer>,
        );
        (uc, renderer)
    }

    /// Diagram-local point at the centre of the slot holding `sequence`.
    fn point_over(uc: &SelectLocationUseCase, sequence: u32) -> GridPoint {
        let cell = RackLayout::to_coordinate(SequenceNumber::new(sequence).unwrap());
        uc.geometry.cell_origin(cell)
    }

    // ── Typed entry ───────────────────────────────────────────────────────────

    #[test]
    fn test_valid_entry_highlights_the_slot() {
        // Arrange
        let (mut uc, renderer) = make_use_case();

        // Act
        uc.enter_sequence("45").unwrap();

        // Assert
        let selection = uc.selection().expect("selection must be set");
        assert_eq!(selection.sequence.get(), 45);
        assert_eq!(selection.cell, RackLayout::to_coordinate(selection.sequence));
        assert_eq!(
            renderer.notifications(),
            vec![Notified::Changed(45), Notified::ErrorCleared]
        );
    }

    #[test]
    fn test_first_and_last_sequences_select_distinct_cells() {
        let (mut uc, _) = make_use_case();

        uc.enter_sequence("1").unwrap();
        let first = uc.selection().unwrap().cell;
        assert_eq!(first, CellCoordinate { rack: Rack::A, column: 1, row: 1 });

        uc.enter_sequence("180").unwrap();
        let last = uc.selection().unwrap().cell;
        assert_eq!(last, CellCoordinate { rack: Rack::B, column: 6, row: 10 });

        assert_ne!(first, last);
    }

    #[test]
    fn test_non_numeric_entry_keeps_selection_and_reports_error() {
        // Arrange
        let (mut uc, renderer) = make_use_case();
        uc.enter_sequence("45").unwrap();

        // Act
        uc.enter_sequence("abc").unwrap();

        // Assert – previous selection untouched, validation message surfaced
        assert_eq!(uc.selection().unwrap().sequence.get(), 45);
        assert_eq!(
            renderer.notifications().last(),
            Some(&Notified::Error(EntryError::NotANumber))
        );
    }

    #[test]
    fn test_out_of_range_entry_keeps_selection_and_reports_error() {
        let (mut uc, renderer) = make_use_case();
        uc.enter_sequence("45").unwrap();

        uc.enter_sequence("181").unwrap();

        assert_eq!(uc.selection().unwrap().sequence.get(), 45);
        assert_eq!(
            renderer.notifications().last(),
            Some(&Notified::Error(EntryError::OutOfRange { min: 1, max: 180 }))
        );
    }

    #[test]
    fn test_zero_entry_is_out_of_range() {
        let (mut uc, renderer) = make_use_case();
        uc.enter_sequence("0").unwrap();
        assert_eq!(uc.selection(), None);
        assert_eq!(
            renderer.notifications().last(),
            Some(&Notified::Error(EntryError::OutOfRange { min: 1, max: 180 }))
        );
    }

    #[test]
    fn test_entry_overflowing_the_integer_type_is_out_of_range() {
        let (mut uc, renderer) = make_use_case();
        uc.enter_sequence("99999999999").unwrap();
        assert_eq!(
            renderer.notifications().last(),
            Some(&Notified::Error(EntryError::OutOfRange { min: 1, max: 180 }))
        );
    }

    #[test]
    fn test_negative_entry_is_not_a_number() {
        // The entry widget feeds raw text; a leading minus never parses.
        let (mut uc, renderer) = make_use_case();
        uc.enter_sequence("-1").unwrap();
        assert_eq!(
            renderer.notifications().last(),
            Some(&Notified::Error(EntryError::NotANumber))
        );
    }

    #[test]
    fn test_empty_entry_clears_selection_and_error() {
        // Arrange
        let (mut uc, renderer) = make_use_case();
        uc.enter_sequence("45").unwrap();
        uc.enter_sequence("abc").unwrap();

        // Act – user wiped the entry box
        uc.enter_sequence("").unwrap();

        // Assert
        assert_eq!(uc.selection(), None);
        let tail: Vec<_> = renderer.notifications().into_iter().rev().take(2).collect();
        assert_eq!(tail, vec![Notified::ErrorCleared, Notified::Cleared]);
    }

    #[test]
    fn test_entry_with_surrounding_whitespace_is_accepted() {
        let (mut uc, _) = make_use_case();
        uc.enter_sequence("  90 ").unwrap();
        assert_eq!(uc.selection().unwrap().sequence.get(), 90);
    }

    // ── Pointer gestures ──────────────────────────────────────────────────────

    #[test]
    fn test_pointer_down_over_a_slot_starts_dragging_and_selects() {
        // Arrange
        let (mut uc, renderer) = make_use_case();
        let p = point_over(&uc, 45);

        // Act
        uc.handle_event(RawInputEvent::PointerDown { x: p.x, y: p.y })
            .unwrap();

        // Assert
        assert_eq!(uc.gesture_state(), GestureState::Dragging);
        assert_eq!(uc.selection().unwrap().sequence.get(), 45);
        assert_eq!(renderer.notifications().first(), Some(&Notified::Changed(45)));
    }

    #[test]
    fn test_pointer_move_while_dragging_follows_the_pointer() {
        let (mut uc, _) = make_use_case();
        let p45 = point_over(&uc, 45);
        let p177 = point_over(&uc, 177);

        uc.handle_event(RawInputEvent::PointerDown { x: p45.x, y: p45.y })
            .unwrap();
        uc.handle_event(RawInputEvent::PointerMove { x: p177.x, y: p177.y })
            .unwrap();

        assert_eq!(uc.selection().unwrap().sequence.get(), 177);
    }

    #[test]
    fn test_pointer_move_off_grid_keeps_previous_selection_silently() {
        // Arrange
        let (mut uc, renderer) = make_use_case();
        let p = point_over(&uc, 177);
        uc.handle_event(RawInputEvent::PointerDown { x: p.x, y: p.y })
            .unwrap();
        let before = renderer.notifications().len();

        // Act – drift into the pane gap, then leave the diagram entirely
        uc.handle_event(RawInputEvent::PointerMove { x: 25, y: 8 }).unwrap();
        uc.handle_event(RawInputEvent::PointerMove { x: -10, y: -10 })
            .unwrap();

        // Assert – selection untouched, no error notifications of any kind
        assert_eq!(uc.selection().unwrap().sequence.get(), 177);
        assert_eq!(renderer.notifications().len(), before);
    }

    #[test]
    fn test_pointer_down_off_grid_starts_gesture_without_selecting() {
        let (mut uc, _) = make_use_case();

        uc.handle_event(RawInputEvent::PointerDown { x: 25, y: 8 }).unwrap();

        assert_eq!(uc.gesture_state(), GestureState::Dragging);
        assert_eq!(uc.selection(), None);
    }

    #[test]
    fn test_pointer_move_while_idle_is_ignored() {
        let (mut uc, renderer) = make_use_case();
        let p = point_over(&uc, 45);

        uc.handle_event(RawInputEvent::PointerMove { x: p.x, y: p.y })
            .unwrap();

        assert_eq!(uc.selection(), None);
        assert!(renderer.notifications().is_empty());
    }

    #[test]
    fn test_gesture_origin_is_the_press_position_until_release() {
        let (mut uc, _) = make_use_case();
        let p45 = point_over(&uc, 45);
        let p177 = point_over(&uc, 177);

        assert_eq!(uc.gesture_origin(), None);
        uc.handle_event(RawInputEvent::PointerDown { x: p45.x, y: p45.y })
            .unwrap();
        uc.handle_event(RawInputEvent::PointerMove { x: p177.x, y: p177.y })
            .unwrap();

        assert_eq!(uc.gesture_origin(), Some(p45));

        uc.handle_event(RawInputEvent::PointerUp).unwrap();
        assert_eq!(uc.gesture_origin(), None);
    }

    #[test]
    fn test_pointer_up_ends_the_gesture_and_keeps_the_selection() {
        let (mut uc, _) = make_use_case();
        let p = point_over(&uc, 45);
        uc.handle_event(RawInputEvent::PointerDown { x: p.x, y: p.y })
            .unwrap();

        uc.handle_event(RawInputEvent::PointerUp).unwrap();

        assert_eq!(uc.gesture_state(), GestureState::Idle);
        assert_eq!(uc.selection().unwrap().sequence.get(), 45);
    }

    #[test]
    fn test_pointer_cancel_behaves_like_release() {
        let (mut uc, _) = make_use_case();
        let p = point_over(&uc, 12);
        uc.handle_event(RawInputEvent::PointerDown { x: p.x, y: p.y })
            .unwrap();

        uc.handle_event(RawInputEvent::PointerCancel).unwrap();

        assert_eq!(uc.gesture_state(), GestureState::Idle);
        assert_eq!(uc.selection().unwrap().sequence.get(), 12);
    }

    #[test]
    fn test_repeated_moves_over_the_same_slot_notify_once() {
        // Rapid drags deliver many moves inside one cell; only the first
        // changes anything.
        let (mut uc, renderer) = make_use_case();
        let p = point_over(&uc, 45);
        uc.handle_event(RawInputEvent::PointerDown { x: p.x, y: p.y })
            .unwrap();
        let before = renderer.notifications().len();

        for _ in 0..5 {
            uc.handle_event(RawInputEvent::PointerMove { x: p.x, y: p.y })
                .unwrap();
        }

        assert_eq!(renderer.notifications().len(), before);
    }

    // ── Failure and isolation ─────────────────────────────────────────────────

    #[test]
    fn test_renderer_failure_surfaces_as_render_error() {
        let renderer = Arc::new(RecordingRenderer {
            notifications: Mutex::new(Vec::new()),
            should_fail: true,
        });
        let mut uc = SelectLocationUseCase::new(
            DiagramGeometry::new(4, 1, 3),
            Arc::clone(&renderer) as Arc<dyn SelectionRenderer>,
        );

        let result = uc.enter_sequence("45");

        assert!(matches!(result, Err(SelectError::Render(_))));
    }

    #[test]
    fn test_quit_event_changes_nothing() {
        let (mut uc, renderer) = make_use_case();
        uc.enter_sequence("45").unwrap();
        let before = renderer.notifications().len();

        uc.handle_event(RawInputEvent::Quit).unwrap();

        assert_eq!(uc.selection().unwrap().sequence.get(), 45);
        assert_eq!(renderer.notifications().len(), before);
    }

    #[test]
    fn test_two_instances_do_not_share_selection_state() {
        let (mut first, _) = make_use_case();
        let (second, _) = make_use_case();

        first.enter_sequence("45").unwrap();

        assert_eq!(first.selection().unwrap().sequence.get(), 45);
        assert_eq!(second.selection(), None);
    }
}
