//! Arithmetic evaluation over the formula expression tree.

use super::ast::{BinOp, Expr, Value};
use crate::error::FormulaError;
use crate::position::Position;

pub(crate) fn eval_expr(expr: &Expr, lookup: &mut dyn FnMut(Position) -> Value) -> Value {
    match expr {
        Expr::Number(n) => Value::Number(*n),
        Expr::Ref(pos) => resolve_ref(*pos, lookup),
        Expr::Neg(inner) => {
            let v = eval_expr(inner, lookup);
            match to_number(v) {
                Ok(n) => finite_or_div0(-n),
                Err(e) => Value::Error(e),
            }
        }
        Expr::BinOp(op, lhs, rhs) => {
            let lhs = eval_expr(lhs, lookup);
            let rhs = eval_expr(rhs, lookup);
            eval_binop(*op, lhs, rhs)
        }
    }
}

fn resolve_ref(pos: Position, lookup: &mut dyn FnMut(Position) -> Value) -> Value {
    if !pos.is_valid() {
        return Value::Error(FormulaError::Ref);
    }
    lookup(pos)
}

/// Coerce a `Value` to a number the way arithmetic operands are coerced:
/// numbers pass through, strings are parsed (locale-free), errors propagate.
fn to_number(value: Value) -> Result<f64, FormulaError> {
    match value {
        Value::Number(n) => Ok(n),
        Value::Error(e) => Err(e),
        Value::String(s) => s.parse::<f64>().map_err(|_| FormulaError::Value),
    }
}

fn eval_binop(op: BinOp, lhs: Value, rhs: Value) -> Value {
    // If both sides are errors, the left one wins.
    let lhs_num = to_number(lhs);
    let rhs_num = to_number(rhs);

    let (l, r) = match (lhs_num, rhs_num) {
        (Err(e), _) => return Value::Error(e),
        (Ok(_), Err(e)) => return Value::Error(e),
        (Ok(l), Ok(r)) => (l, r),
    };

    let result = match op {
        BinOp::Add => l + r,
        BinOp::Sub => l - r,
        BinOp::Mul => l * r,
        BinOp::Div => l / r,
    };

    finite_or_div0(result)
}

fn finite_or_div0(n: f64) -> Value {
    if n.is_finite() {
        Value::Number(n)
    } else {
        Value::Error(FormulaError::Div0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::parse_formula;

    fn eval_with<F>(src: &str, mut lookup: F) -> Value
    where
        F: FnMut(Position) -> Value,
    {
        parse_formula(src).unwrap().evaluate(&mut lookup)
    }

    #[test]
    fn evaluates_literal_arithmetic() {
        let v = eval_with("1+2*3", |_| Value::Number(0.0));
        assert_eq!(v, Value::Number(7.0));
    }

    #[test]
    fn division_by_zero_is_div0() {
        let v = eval_with("1/0", |_| Value::Number(0.0));
        assert_eq!(v, Value::Error(FormulaError::Div0));
    }

    #[test]
    fn ref_to_missing_cell_is_zero() {
        let v = eval_with("A1+1", |_| Value::Number(0.0));
        assert_eq!(v, Value::Number(1.0));
    }

    #[test]
    fn ref_to_string_parses_as_number() {
        let v = eval_with("A1+1", |_| Value::String("41".to_string()));
        assert_eq!(v, Value::Number(42.0));
    }

    #[test]
    fn ref_to_unparseable_string_is_value_error() {
        let v = eval_with("A1+1", |_| Value::String("text".to_string()));
        assert_eq!(v, Value::Error(FormulaError::Value));
    }

    #[test]
    fn errors_propagate_through_arithmetic() {
        let v = eval_with("A1+1", |_| Value::Error(FormulaError::Ref));
        assert_eq!(v, Value::Error(FormulaError::Ref));
    }

    #[test]
    fn left_error_wins_when_both_sides_error() {
        let v = eval_with("A1+B1", |pos| {
            if pos.col == 0 {
                Value::Error(FormulaError::Ref)
            } else {
                Value::Error(FormulaError::Value)
            }
        });
        assert_eq!(v, Value::Error(FormulaError::Ref));
    }

    #[test]
    fn unary_minus_negates() {
        let v = eval_with("-5+2", |_| Value::Number(0.0));
        assert_eq!(v, Value::Number(-3.0));
    }
}
