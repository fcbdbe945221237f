//! # rack-core
//!
//! Domain library for the load rack locator: the fixed physical layout of
//! T4ED specimen tube racks and the arithmetic that maps between a tube's
//! sequence number and its physical cell.
//!
//! This crate is pure business logic.  It has zero dependencies on OS APIs,
//! UI frameworks, or I/O; it can be compiled and unit-tested on any platform
//! without external setup, and every operation is safe to call from any
//! thread without synchronisation.
//!
//! # What lives here
//!
//! - **`domain::layout`** – the authoritative fill-order table: 2 racks of 90
//!   tube slots each, addressed either by a linear sequence number (1–180,
//!   assigned at load time) or by a rack/column/row cell coordinate.  The
//!   mapping is a bijection; this module is the single source of truth for
//!   the physical convention.
//!
//! - **`domain::geometry`** – pure arithmetic that resolves a pointer
//!   position over the rendered two-pane diagram to the cell underneath it,
//!   and the inverse used by renderers to place highlights.

pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `rack_core::RackLayout` instead of `rack_core::domain::layout::RackLayout`.
pub use domain::geometry::{DiagramGeometry, GridPoint};
pub use domain::layout::{CellCoordinate, LayoutError, Rack, RackLayout, SequenceNumber};
