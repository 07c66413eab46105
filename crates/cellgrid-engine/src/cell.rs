//! The per-position cell variant.

use std::cell::RefCell;

use crate::formula::{Formula, FormulaParseError, Value, parse_formula};
use crate::position::Position;

const ESCAPE_MARKER: char = '\'';

/// The content stored at a single grid position.
#[derive(Clone, Debug)]
pub enum CellKind {
    Empty,
    Text(String),
    Formula(Formula),
}

/// A cell: its content plus the positions of formulas that directly
/// reference it. `dependents` is maintained by the owning sheet, not by the
/// cell itself.
#[derive(Clone, Debug)]
pub struct Cell {
    kind: CellKind,
    cache: RefCell<Option<Value>>,
    pub dependents: Vec<Position>,
}

impl Cell {
    pub fn new_empty() -> Cell {
        Cell {
            kind: CellKind::Empty,
            cache: RefCell::new(None),
            dependents: Vec::new(),
        }
    }

    /// Parse `text` and build the appropriate variant, preserving no prior
    /// `dependents` (the sheet re-wires those after a successful install).
    ///
    /// - empty string -> Empty
    /// - starts with `=` (len >= 2) -> Formula
    /// - anything else -> Text, stored verbatim (including any leading `'`)
    pub fn set(text: &str) -> Result<Cell, FormulaParseError> {
        let kind = if text.is_empty() {
            CellKind::Empty
        } else if text.len() >= 2 && text.starts_with('=') {
            let formula = parse_formula(&text[1..])?;
            CellKind::Formula(formula)
        } else {
            CellKind::Text(text.to_string())
        };

        Ok(Cell {
            kind,
            cache: RefCell::new(None),
            dependents: Vec::new(),
        })
    }

    pub fn kind(&self) -> &CellKind {
        &self.kind
    }

    /// The raw text that would reproduce this cell via `Cell::set`.
    pub fn text(&self) -> String {
        match &self.kind {
            CellKind::Empty => String::new(),
            CellKind::Text(raw) => raw.clone(),
            CellKind::Formula(f) => format!("={}", f.printed_form()),
        }
    }

    /// The evaluated value, using `lookup` to resolve any formula's cell
    /// references. Memoizes formula results until `clear_cache` is called.
    pub fn value(&self, lookup: &mut dyn FnMut(Position) -> Value) -> Value {
        match &self.kind {
            CellKind::Empty => Value::Number(0.0),
            CellKind::Text(raw) => {
                if let Some(stripped) = raw.strip_prefix(ESCAPE_MARKER) {
                    Value::String(stripped.to_string())
                } else {
                    Value::String(raw.clone())
                }
            }
            CellKind::Formula(formula) => {
                if let Some(cached) = self.cache.borrow().as_ref() {
                    return cached.clone();
                }
                let value = formula.evaluate(lookup);
                *self.cache.borrow_mut() = Some(value.clone());
                value
            }
        }
    }

    /// Drop any cached formula result; no-op on Empty/Text cells.
    pub fn clear_cache(&self) {
        if matches!(self.kind, CellKind::Formula(_)) {
            *self.cache.borrow_mut() = None;
        }
    }

    /// Positions this cell's formula reads (empty for Empty/Text).
    pub fn referenced_cells(&self) -> Vec<Position> {
        match &self.kind {
            CellKind::Formula(f) => f.referenced_cells(),
            _ => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.kind, CellKind::Empty)
    }
}
