//! Interactive terminal renderer.
//!
//! Draws the whole view on every notification: header, sequence readout, the
//! two rack panes with every slot labelled by its sequence number, and the
//! validation error line.  The selected slot is drawn highlighted.  A full
//! redraw of 180 labels is constant work, far below what a terminal repaints
//! comfortably, so no damage tracking is needed.
//!
//! The diagram's top-left corner sits at ([`DIAGRAM_ORIGIN_X`],
//! [`DIAGRAM_ORIGIN_Y`]); the input capture uses the same constants to
//! translate mouse positions back into diagram-local units.

use std::io::{self, Stdout, Write};
use std::sync::Mutex;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;

use rack_core::{DiagramGeometry, Rack, RackLayout, SequenceNumber};

use crate::application::select_location::{EntryError, Selection, SelectionRenderer};

/// Screen column of the diagram's top-left corner.
pub const DIAGRAM_ORIGIN_X: u16 = 2;
/// Screen row of the diagram's top-left corner.
pub const DIAGRAM_ORIGIN_Y: u16 = 4;

/// Everything needed to repaint the view.
struct View<W> {
    out: W,
    selection: Option<Selection>,
    error: Option<String>,
}

/// Draws the locator view to a terminal-like writer.
///
/// Generic over the writer so tests can capture the byte stream; the binary
/// uses [`TerminalRenderer::stdout`].
pub struct TerminalRenderer<W: Write + Send = Stdout> {
    geometry: DiagramGeometry,
    color: bool,
    view: Mutex<View<W>>,
}

impl TerminalRenderer<Stdout> {
    /// Renderer over the process stdout.
    pub fn stdout(geometry: DiagramGeometry, color: bool) -> Self {
        Self::new(io::stdout(), geometry, color)
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(out: W, geometry: DiagramGeometry, color: bool) -> Self {
        Self {
            geometry,
            color,
            view: Mutex::new(View {
                out,
                selection: None,
                error: None,
            }),
        }
    }

    /// Paints the empty diagram.  Call once before the event loop starts.
    pub fn draw_initial(&self) -> Result<(), String> {
        self.apply(|_| {})
    }

    /// Restores the cursor before the terminal is handed back.
    pub fn release(&self) -> Result<(), String> {
        let mut view = self.lock()?;
        view.out
            .queue(Show)
            .and_then(|out| out.flush())
            .map_err(|e| e.to_string())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, View<W>>, String> {
        self.view
            .lock()
            .map_err(|_| "renderer view lock poisoned".to_string())
    }

    /// Mutates the view state, then repaints.
    fn apply(&self, change: impl FnOnce(&mut View<W>)) -> Result<(), String> {
        let mut view = self.lock()?;
        change(&mut view);
        draw(&mut view, self.geometry, self.color).map_err(|e| e.to_string())
    }
}

impl<W: Write + Send> SelectionRenderer for TerminalRenderer<W> {
    fn selection_changed(&self, selection: Selection) -> Result<(), String> {
        self.apply(|view| view.selection = Some(selection))
    }

    fn selection_cleared(&self) -> Result<(), String> {
        self.apply(|view| view.selection = None)
    }

    fn show_entry_error(&self, error: &EntryError) -> Result<(), String> {
        let message = error.to_string();
        self.apply(|view| view.error = Some(message))
    }

    fn clear_entry_error(&self) -> Result<(), String> {
        self.apply(|view| view.error = None)
    }
}

/// Repaints the full view.
fn draw<W: Write>(view: &mut View<W>, geometry: DiagramGeometry, color: bool) -> io::Result<()> {
    let selection = view.selection;
    let error = view.error.clone();
    let out = &mut view.out;

    out.queue(Hide)?;
    out.queue(Clear(ClearType::All))?;

    // Header and sequence readout.
    out.queue(MoveTo(DIAGRAM_ORIGIN_X, 0))?
        .queue(Print("Load Rack Locator"))?;
    out.queue(MoveTo(DIAGRAM_ORIGIN_X, 1))?
        .queue(Print("type a sequence or drag across the diagram; q quits"))?;
    let readout = match selection {
        Some(s) => format!(
            "Sequence {:>3}  ->  rack {}, column {}, row {}",
            s.sequence,
            s.cell.rack.number(),
            s.cell.column,
            s.cell.row
        ),
        None => "Sequence ---".to_string(),
    };
    out.queue(MoveTo(DIAGRAM_ORIGIN_X, 2))?.queue(Print(readout))?;

    // Pane labels.
    for rack in [Rack::A, Rack::B] {
        let x = DIAGRAM_ORIGIN_X + geometry.pane_origin_x(rack) as u16;
        out.queue(MoveTo(x, DIAGRAM_ORIGIN_Y - 1))?
            .queue(Print(format!("Rack {}", rack.number())))?;
    }

    // Every slot, labelled by sequence; the selected one highlighted.
    let label_width = usize::from(geometry.cell_width()).saturating_sub(1).max(3);
    for n in SequenceNumber::MIN..=SequenceNumber::MAX {
        let Ok(sequence) = SequenceNumber::new(u32::from(n)) else {
            continue;
        };
        let cell = RackLayout::to_coordinate(sequence);
        let origin = geometry.cell_origin(cell);
        let x = DIAGRAM_ORIGIN_X + origin.x as u16;
        let y = DIAGRAM_ORIGIN_Y + origin.y as u16;
        let selected = selection.map(|s| s.sequence) == Some(sequence);

        out.queue(MoveTo(x, y))?;
        if selected {
            if color {
                out.queue(SetBackgroundColor(Color::Yellow))?
                    .queue(SetForegroundColor(Color::Black))?;
            } else {
                out.queue(SetAttribute(Attribute::Reverse))?;
            }
        }
        out.queue(Print(format!("{:>label_width$}", sequence.get())))?;
        if selected {
            out.queue(ResetColor)?.queue(SetAttribute(Attribute::Reset))?;
        }
    }

    // Validation error line under the diagram.
    let error_y = DIAGRAM_ORIGIN_Y + geometry.pane_height() as u16 + 1;
    out.queue(MoveTo(DIAGRAM_ORIGIN_X, error_y))?;
    if let Some(message) = &error {
        if color {
            out.queue(SetForegroundColor(Color::Red))?;
        }
        out.queue(Print(message.clone()))?;
        if color {
            out.queue(ResetColor)?;
        }
    }

    out.queue(MoveTo(0, error_y + 1))?;
    out.flush()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
