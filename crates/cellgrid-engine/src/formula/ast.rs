//! The formula expression tree and the value type formulas produce.

use crate::error::FormulaError;
use crate::position::Position;
use std::collections::HashSet;

/// The result of evaluating a cell or a formula subexpression.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    String(String),
    Error(FormulaError),
}

impl Value {
    /// The user-visible text for this value, as written by the printer.
    pub fn display_string(&self) -> String {
        match self {
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Error(e) => e.printer_str().to_string(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }

    /// Higher binds tighter: `*` and `/` bind tighter than `+` and `-`.
    fn precedence(&self) -> u8 {
        match self {
            BinOp::Add | BinOp::Sub => 1,
            BinOp::Mul | BinOp::Div => 2,
        }
    }
}

/// A node in the parsed arithmetic expression tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Ref(Position),
    Neg(Box<Expr>),
    BinOp(BinOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::BinOp(op, _, _) => op.precedence(),
            Expr::Neg(_) => 3,
            Expr::Number(_) | Expr::Ref(_) => 4,
        }
    }

    fn print_into(&self, out: &mut String) {
        match self {
            Expr::Number(n) => out.push_str(&format_number(*n)),
            Expr::Ref(pos) => out.push_str(&pos.to_string()),
            Expr::Neg(inner) => {
                out.push('-');
                print_child(out, inner, self.precedence(), false);
            }
            Expr::BinOp(op, lhs, rhs) => {
                print_child(out, lhs, op.precedence(), false);
                out.push_str(op.symbol());
                print_child(out, rhs, op.precedence(), true);
            }
        }
    }

    fn collect_refs(&self, seen: &mut HashSet<Position>, out: &mut Vec<Position>) {
        match self {
            Expr::Number(_) => {}
            Expr::Ref(pos) => {
                if seen.insert(*pos) {
                    out.push(*pos);
                }
            }
            Expr::Neg(inner) => inner.collect_refs(seen, out),
            Expr::BinOp(_, lhs, rhs) => {
                lhs.collect_refs(seen, out);
                rhs.collect_refs(seen, out);
            }
        }
    }
}

/// Parenthesize `child` when printed at a position whose surrounding
/// operator has precedence `parent_prec`. `is_right` distinguishes the
/// right-hand operand of a left-associative operator, which needs parens
/// even at equal precedence (e.g. `a - (b - c)`).
fn print_child(out: &mut String, child: &Expr, parent_prec: u8, is_right: bool) {
    let needs_parens = child.precedence() < parent_prec
        || (is_right && child.precedence() == parent_prec && matches!(child, Expr::BinOp(..)));
    if needs_parens {
        out.push('(');
        child.print_into(out);
        out.push(')');
    } else {
        child.print_into(out);
    }
}

/// A parsed arithmetic formula, as stored in a `Formula` cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Formula {
    root: Expr,
}

impl Formula {
    pub(crate) fn new(root: Expr) -> Formula {
        Formula { root }
    }

    /// The positions this formula reads, deduplicated in traversal order.
    pub fn referenced_cells(&self) -> Vec<Position> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        self.root.collect_refs(&mut seen, &mut out);
        out
    }

    /// Canonical re-printing, stable under parse-then-print-then-parse.
    pub fn printed_form(&self) -> String {
        let mut out = String::new();
        self.root.print_into(&mut out);
        out
    }

    /// Evaluate this formula, resolving cell references through `lookup`.
    pub fn evaluate(&self, lookup: &mut dyn FnMut(Position) -> Value) -> Value {
        super::eval::eval_expr(&self.root, lookup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::parse_formula;

    #[test]
    fn printed_form_round_trips() {
        for src in ["3+4", "A1*B2+C3", "(1+2)*3", "-A1+2", "1-(2-3)", "(1-2)-3"] {
            let formula = parse_formula(src).unwrap();
            let printed = formula.printed_form();
            let reparsed = parse_formula(&printed).unwrap();
            assert_eq!(
                formula, reparsed,
                "round trip mismatch for {src:?} -> {printed:?}"
            );
        }
    }

    #[test]
    fn printed_form_minimizes_parens() {
        let formula = parse_formula("(1-2)-3").unwrap();
        assert_eq!(formula.printed_form(), "1-2-3");

        let formula = parse_formula("1-(2-3)").unwrap();
        assert_eq!(formula.printed_form(), "1-(2-3)");
    }

    #[test]
    fn referenced_cells_dedup_in_order() {
        let formula = parse_formula("A1+A1+B2").unwrap();
        assert_eq!(
            formula.referenced_cells(),
            vec![Position::new(0, 0), Position::new(1, 1)]
        );
    }
}
