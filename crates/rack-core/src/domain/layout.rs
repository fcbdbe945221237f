//! Load rack layout domain entity.
//!
//! A load holds up to 180 specimen tubes spread across two physical racks.
//! Tubes fill each rack column-major, bottom-to-top within a column, columns
//! filling right-to-left as the rack is rendered, 16 slots per full column.
//! Rack A fills completely before rack B receives its first tube.
//!
//! Each rack holds 90 tubes: five full columns of 16 plus a partial sixth
//! column of 10, bottom-aligned.  Rendered, one rack pane looks like this
//! (`.` marks the six padding positions of the partial column):
//!
//! ```text
//!  .  80 64 48 32 16
//!  .  79 63 47 31 15
//!  .  78 62 46 30 14
//!  .  77 61 45 29 13
//!  .  76 60 44 28 12
//!  .  75 59 43 27 11
//!  90 74 58 42 26 10
//!  .. .. .. .. .. ..
//!  82 66 50 34 18  2
//!  81 65 49 33 17  1
//! ```
//!
//! Rack B has the identical shape holding sequences 91–180.
//!
//! In cell coordinates, column 1 is the first column filled (rendered
//! rightmost) and row 1 is the bottom slot of its column.  This module is the
//! single authoritative encoding of that convention; no other call site may
//! reimplement it.

use std::fmt;

use thiserror::Error;

/// Errors produced by the layout mapping.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// The sequence number is outside the capacity of the load.
    #[error("Sequence must be between {min} and {max}.")]
    SequenceOutOfRange { seq: u32, min: u16, max: u16 },

    /// The coordinate does not address any tube slot (outside the rack shape,
    /// or a padding position in the partial column).
    #[error("no tube slot at rack {rack} column {column} row {row}")]
    InvalidCell { rack: Rack, column: u8, row: u8 },
}

/// One of the two physical racks in a load.
///
/// Rack A receives sequences 1–90, rack B sequences 91–180.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rack {
    A,
    B,
}

impl Rack {
    /// The 1-based physical rack number shown on the pagination indicator.
    pub fn number(self) -> u8 {
        match self {
            Rack::A => 1,
            Rack::B => 2,
        }
    }
}

impl fmt::Display for Rack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rack::A => write!(f, "A"),
            Rack::B => write!(f, "B"),
        }
    }
}

/// A validated 1-based tube position within a load.
///
/// Construction is the only fallible step: every `SequenceNumber` value is
/// inside `1..=180`, so the mapping functions taking one are total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequenceNumber(u16);

impl SequenceNumber {
    /// Smallest valid sequence number.
    pub const MIN: u16 = 1;
    /// Largest valid sequence number (capacity of a full load).
    pub const MAX: u16 = 180;

    /// Validates `raw` against the load capacity.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::SequenceOutOfRange`] when `raw` is 0 or exceeds
    /// [`SequenceNumber::MAX`].
    pub fn new(raw: u32) -> Result<Self, LayoutError> {
        if raw < u32::from(Self::MIN) || raw > u32::from(Self::MAX) {
            return Err(LayoutError::SequenceOutOfRange {
                seq: raw,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(raw as u16))
    }

    /// Returns the raw sequence value.
    pub fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Delegate so alignment and width specifiers keep working.
        self.0.fmt(f)
    }
}

/// The physical address of one tube slot.
///
/// `column` counts 1–6 in fill order (1 = rendered rightmost), `row` counts
/// 1–16 from the bottom of the column.  Not every representable value
/// addresses a real slot; [`RackLayout::to_sequence`] validates the shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCoordinate {
    pub rack: Rack,
    pub column: u8,
    pub row: u8,
}

/// The fixed physical arrangement of a load across its two racks.
///
/// `RackLayout` carries no state (the layout is a process-wide constant)
/// and both mapping directions are pure arithmetic, O(1) per call.
pub struct RackLayout;

impl RackLayout {
    /// Slots in a full column.
    pub const ROWS_PER_COLUMN: u8 = 16;
    /// Columns per rack, including the partial sixth.
    pub const COLUMNS_PER_RACK: u8 = 6;
    /// Slots in the partial (leftmost-rendered) column.
    pub const PARTIAL_COLUMN_ROWS: u8 = 10;
    /// Tubes held by one rack: five full columns plus the partial column.
    pub const RACK_CAPACITY: u16 = 90;
    /// Tubes held by a full load.
    pub const TOTAL_CAPACITY: u16 = 180;

    /// Number of real slots in `column`, or 0 for a column outside the rack.
    pub fn column_rows(column: u8) -> u8 {
        match column {
            c if c >= 1 && c < Self::COLUMNS_PER_RACK => Self::ROWS_PER_COLUMN,
            c if c == Self::COLUMNS_PER_RACK => Self::PARTIAL_COLUMN_ROWS,
            _ => 0,
        }
    }

    /// Maps a sequence number to the physical cell holding that tube.
    ///
    /// Total over the valid domain: `seq` is already validated, so every
    /// input produces a cell that [`RackLayout::to_sequence`] maps back.
    pub fn to_coordinate(seq: SequenceNumber) -> CellCoordinate {
        let index = seq.get() - 1;
        let rack = if index < Self::RACK_CAPACITY {
            Rack::A
        } else {
            Rack::B
        };
        let local = index % Self::RACK_CAPACITY;
        let rows = u16::from(Self::ROWS_PER_COLUMN);
        CellCoordinate {
            rack,
            column: (local / rows) as u8 + 1,
            row: (local % rows) as u8 + 1,
        }
    }

    /// Maps a physical cell back to its sequence number.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidCell`] when the coordinate falls outside
    /// the rack shape: column not in 1-6, row not in 1-16, or a padding
    /// position in the partial column.
    pub fn to_sequence(cell: CellCoordinate) -> Result<SequenceNumber, LayoutError> {
        let CellCoordinate { rack, column, row } = cell;
        if row < 1 || row > Self::column_rows(column) {
            return Err(LayoutError::InvalidCell { rack, column, row });
        }

        let base = match rack {
            Rack::A => 0,
            Rack::B => Self::RACK_CAPACITY,
        };
        let seq = base
            + u16::from(column - 1) * u16::from(Self::ROWS_PER_COLUMN)
            + u16::from(row - 1)
            + 1;
        // Shape validation above guarantees the result is in 1..=180.
        Ok(SequenceNumber(seq))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
