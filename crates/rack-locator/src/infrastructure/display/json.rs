//! JSON-lines renderer: notifications for an external rendering surface.
//!
//! Each notification is one JSON object per line so the consuming surface
//! can stream-parse without framing.  The DTOs contain only
//! JSON-friendly fields; domain types never cross the bridge directly, so
//! the wire shape stays stable if internal types change.

use std::io::Write;
use std::sync::Mutex;

use serde::Serialize;

use crate::application::select_location::{EntryError, Selection, SelectionRenderer};

/// DTO for the highlighted slot sent to the external surface.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionDto {
    pub sequence: u16,
    pub rack: String,
    pub rack_number: u8,
    pub column: u8,
    pub row: u8,
}

impl From<&Selection> for SelectionDto {
    fn from(s: &Selection) -> Self {
        Self {
            sequence: s.sequence.get(),
            rack: s.cell.rack.to_string(),
            rack_number: s.cell.rack.number(),
            column: s.cell.column,
            row: s.cell.row,
        }
    }
}

/// One notification line.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum NotificationDto {
    SelectionChanged { selection: SelectionDto },
    SelectionCleared,
    EntryError { message: String },
    EntryErrorCleared,
}

/// Writes selection notifications as JSON lines to any writer.
pub struct JsonRenderer<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    fn emit(&self, notification: &NotificationDto) -> Result<(), String> {
        let line = serde_json::to_string(notification).map_err(|e| e.to_string())?;
        let mut out = self
            .out
            .lock()
            .map_err(|_| "renderer output lock poisoned".to_string())?;
        writeln!(out, "{line}").map_err(|e| e.to_string())?;
        out.flush().map_err(|e| e.to_string())
    }
}

impl<W: Write + Send> SelectionRenderer for JsonRenderer<W> {
    fn selection_changed(&self, selection: Selection) -> Result<(), String> {
        self.emit(&NotificationDto::SelectionChanged {
            selection: SelectionDto::from(&selection),
        })
    }

    fn selection_cleared(&self) -> Result<(), String> {
        self.emit(&NotificationDto::SelectionCleared)
    }

    fn show_entry_error(&self, error: &EntryError) -> Result<(), String> {
        self.emit(&NotificationDto::EntryError {
            message: error.to_string(),
        })
    }

    fn clear_entry_error(&self) -> Result<(), String> {
        self.emit(&NotificationDto::EntryErrorCleared)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
