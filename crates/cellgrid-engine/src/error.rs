//! First-class formula evaluation errors.
//!
//! These are values, not exceptions: a `FormulaError` flows through
//! arithmetic like any other [`crate::formula::Value`] and is stored as the
//! cached result of a formula cell.

use std::fmt;

/// An error value produced while evaluating a formula.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FormulaError {
    /// A reference to a position that cannot be resolved.
    Ref,
    /// A text operand could not be parsed as a number.
    Value,
    /// Division by zero, or a non-finite arithmetic result.
    Div0,
}

impl FormulaError {
    /// The canonical spreadsheet string, e.g. as embedded in a formula's
    /// printed form or compared against in tests.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormulaError::Ref => "#REF!",
            FormulaError::Value => "#VALUE!",
            FormulaError::Div0 => "#DIV0!",
        }
    }

    /// The printer form, which differs only for `Div0` (`#DIV/0!`), kept for
    /// compatibility with the conventional spreadsheet error string.
    pub fn printer_str(&self) -> &'static str {
        match self {
            FormulaError::Div0 => "#DIV/0!",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
