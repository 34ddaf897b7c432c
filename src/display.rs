// Display formatting for AST
use crate::ast::{Expr, ExprKind};
use std::fmt;

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Number(n) => {
                if n.is_nan() {
                    write!(f, "NaN")
                } else if n.is_infinite() {
                    if *n > 0.0 {
                        write!(f, "Infinity")
                    } else {
                        write!(f, "-Infinity")
                    }
                } else if n.fract() == 0.0 && n.abs() < 1e10 {
                    // Display as integer if no fractional part
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }

            ExprKind::Symbol(s) => write!(f, "{}", s),

            ExprKind::Add(u, v) => {
                // Check if v is a negative term (Mul with -1) to display as subtraction
                if let ExprKind::Mul(left, right) = &v.kind {
                    if left.as_number() == Some(-1.0) {
                        return write!(f, "{} - {}", u, format_mul_operand(right));
                    }
                }
                write!(f, "{} + {}", u, v)
            }

            ExprKind::Sub(u, v) => {
                // Parenthesize RHS when it's an addition or subtraction to preserve
                // the intended grouping: `a - (b + c)` instead of `a - b + c`.
                let right_str = match v.kind {
                    ExprKind::Add(_, _) | ExprKind::Sub(_, _) => format!("({})", v),
                    _ => format!("{}", v),
                };
                write!(f, "{} - {}", u, right_str)
            }

            ExprKind::Mul(u, v) => {
                if u.as_number() == Some(-1.0) {
                    write!(f, "-{}", format_mul_operand(v))
                } else {
                    write!(f, "{}*{}", format_mul_operand(u), format_mul_operand(v))
                }
            }

            ExprKind::Div(u, v) => {
                let formatted_num = match u.kind {
                    ExprKind::Add(_, _) | ExprKind::Sub(_, _) => format!("({})", u),
                    _ => format!("{}", u),
                };
                let formatted_denom = match v.kind {
                    ExprKind::Symbol(_) | ExprKind::Number(_) | ExprKind::Pow(_, _) => {
                        format!("{}", v)
                    }
                    _ => format!("({})", v),
                };
                write!(f, "{}/{}", formatted_num, formatted_denom)
            }

            ExprKind::Pow(u, v) => {
                // Mul and Div bases must be parenthesized to avoid ambiguity:
                // (2*x)^2 should not display as 2*x^2
                let formatted_base = match u.kind {
                    ExprKind::Add(_, _)
                    | ExprKind::Sub(_, _)
                    | ExprKind::Mul(_, _)
                    | ExprKind::Div(_, _) => format!("({})", u),
                    _ => format!("{}", u),
                };
                let formatted_exp = match v.kind {
                    ExprKind::Number(_) | ExprKind::Symbol(_) => format!("{}", v),
                    _ => format!("({})", v),
                };
                write!(f, "{}^{}", formatted_base, formatted_exp)
            }
        }
    }
}

/// Format operand for multiplication to minimize parentheses
fn format_mul_operand(expr: &Expr) -> String {
    match expr.kind {
        ExprKind::Add(_, _) | ExprKind::Sub(_, _) => format!("({})", expr),
        _ => format!("{}", expr),
    }
}
