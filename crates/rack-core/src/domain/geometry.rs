//! Diagram geometry: pointer positions to rack cells.
//!
//! The rendering surface draws the two rack panes side by side (rack A on the
//! left) and hands pointer positions to the application in *diagram-local*
//! units, where (0, 0) is the top-left corner of rack A's pane.  This module owns
//! the arithmetic that turns such a point into the [`CellCoordinate`] under
//! it, and the inverse that renderers use to place a highlight.
//!
//! Geometry is deliberately unit-agnostic: a "unit" is a pixel in a canvas
//! frontend and a character cell in a terminal frontend.  Only the cell
//! dimensions and the gap between panes vary; the column/row convention
//! (fill column 1 rendered rightmost, fill row 1 at the bottom) comes from
//! [`RackLayout`] and is not repeated here.
//!
//! Resolution is constant-time arithmetic with no scanning, so it can run on
//! every pointer-move of a fast drag without visible lag.

use crate::domain::layout::{CellCoordinate, Rack, RackLayout};

/// A pointer position in diagram-local units.
///
/// Coordinates may be negative: the pointer can leave the diagram mid-drag,
/// which resolves to no cell rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Dimensions of the rendered diagram.
///
/// Invariant: cell dimensions are at least 1 unit; [`DiagramGeometry::new`]
/// bumps zero sizes so division is always defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagramGeometry {
    cell_width: u16,
    cell_height: u16,
    pane_gap: u16,
}

impl DiagramGeometry {
    /// Creates a geometry with the given cell size and inter-pane gap,
    /// all in diagram units.
    pub fn new(cell_width: u16, cell_height: u16, pane_gap: u16) -> Self {
        Self {
            cell_width: cell_width.max(1),
            cell_height: cell_height.max(1),
            pane_gap,
        }
    }

    pub fn cell_width(&self) -> u16 {
        self.cell_width
    }

    pub fn cell_height(&self) -> u16 {
        self.cell_height
    }

    /// Width of one rack pane.
    pub fn pane_width(&self) -> i32 {
        i32::from(self.cell_width) * i32::from(RackLayout::COLUMNS_PER_RACK)
    }

    /// Height of one rack pane.
    pub fn pane_height(&self) -> i32 {
        i32::from(self.cell_height) * i32::from(RackLayout::ROWS_PER_COLUMN)
    }

    /// Total width of the diagram, both panes and the gap between them.
    pub fn total_width(&self) -> i32 {
        self.pane_width() * 2 + i32::from(self.pane_gap)
    }

    /// X offset of a rack's pane within the diagram.
    pub fn pane_origin_x(&self, rack: Rack) -> i32 {
        match rack {
            Rack::A => 0,
            Rack::B => self.pane_width() + i32::from(self.pane_gap),
        }
    }

    /// Resolves a diagram-local point to the tube slot under it.
    ///
    /// Returns `None` when the point misses every slot: above/below the
    /// panes, in the gap between them, outside the diagram entirely, or on a
    /// padding position of a partial column.  A miss is a routine transient
    /// condition while dragging, not an error.
    pub fn resolve(&self, point: GridPoint) -> Option<CellCoordinate> {
        if point.y < 0 || point.y >= self.pane_height() {
            return None;
        }

        let (rack, local_x) = if point.x >= 0 && point.x < self.pane_width() {
            (Rack::A, point.x)
        } else {
            let b_origin = self.pane_origin_x(Rack::B);
            if point.x >= b_origin && point.x < b_origin + self.pane_width() {
                (Rack::B, point.x - b_origin)
            } else {
                return None;
            }
        };

        // Visual indices count from the top-left of the pane; the fill order
        // runs right-to-left and bottom-to-top.
        let visual_column = (local_x / i32::from(self.cell_width)) as u8;
        let visual_row = (point.y / i32::from(self.cell_height)) as u8;
        let column = RackLayout::COLUMNS_PER_RACK - visual_column;
        let row = RackLayout::ROWS_PER_COLUMN - visual_row;

        if row > RackLayout::column_rows(column) {
            return None;
        }
        Some(CellCoordinate { rack, column, row })
    }

    /// Top-left corner of a cell within the diagram.
    ///
    /// Callers pass coordinates produced by [`RackLayout`]; the inverse
    /// guarantee `resolve(cell_origin(c)) == Some(c)` holds for every valid
    /// cell.
    pub fn cell_origin(&self, cell: CellCoordinate) -> GridPoint {
        let visual_column = i32::from(RackLayout::COLUMNS_PER_RACK - cell.column);
        let visual_row = i32::from(RackLayout::ROWS_PER_COLUMN - cell.row);
        GridPoint {
            x: self.pane_origin_x(cell.rack) + visual_column * i32::from(self.cell_width),
            y: visual_row * i32::from(self.cell_height),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
