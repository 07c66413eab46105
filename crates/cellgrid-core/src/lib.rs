//! cellgrid-core - the sheet: grid storage, cycle detection, dependency
//! wiring, cache invalidation, and printable-area tracking.

pub mod error;
pub mod sheet;

pub use error::{Result, SheetError};
pub use sheet::Sheet;

pub use cellgrid_engine::{Cell, CellKind, FormulaError, Position, Size, Value};
