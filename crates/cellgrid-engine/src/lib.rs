//! Cellgrid engine: cell/position/formula primitives.
//!
//! This crate provides the pieces a sheet is built from:
//!
//! - [`Position`], [`Size`] - grid coordinates and rectangles
//! - [`formula`] - the formula AST, parser, and evaluator
//! - [`Cell`], [`CellKind`] - the per-position cell variant
//! - [`FormulaError`] - first-class evaluation-time error values

pub mod cell;
pub mod error;
pub mod formula;
pub mod position;

pub use cell::{Cell, CellKind};
pub use error::FormulaError;
pub use formula::{Formula, FormulaParseError, Value, parse_formula};
pub use position::{MAX_COLS, MAX_ROWS, Position, Size};
