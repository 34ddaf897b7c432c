//! Abstract Syntax Tree for polynomial expressions

use std::ops::Deref;
use std::sync::Arc;

/// A parsed expression node.
///
/// Expressions are immutable once built; subtrees are `Arc`-shared so a
/// request can move them across the solver's worker thread cheaply.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
}

impl Deref for Expr {
    type Target = ExprKind;

    fn deref(&self) -> &Self::Target {
        &self.kind
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Constant number (e.g., 3.14, 1e10)
    Number(f64),

    /// Free variable symbol (e.g., "x")
    Symbol(String),

    /// Addition
    Add(Arc<Expr>, Arc<Expr>),

    /// Subtraction
    Sub(Arc<Expr>, Arc<Expr>),

    /// Multiplication
    Mul(Arc<Expr>, Arc<Expr>),

    /// Division
    Div(Arc<Expr>, Arc<Expr>),

    /// Exponentiation
    Pow(Arc<Expr>, Arc<Expr>),
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Expr { kind }
    }

    /// Check if expression is a constant number and return its value
    pub fn as_number(&self) -> Option<f64> {
        match &self.kind {
            ExprKind::Number(n) => Some(*n),
            _ => None,
        }
    }

    // Convenience constructors

    /// Create a number expression
    pub fn number(n: f64) -> Self {
        Expr::new(ExprKind::Number(n))
    }

    /// Create a symbol expression
    pub fn symbol(s: impl Into<String>) -> Self {
        Expr::new(ExprKind::Symbol(s.into()))
    }

    /// Create an addition expression
    pub fn add_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Add(Arc::new(left), Arc::new(right)))
    }

    /// Create a subtraction expression
    pub fn sub_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Sub(Arc::new(left), Arc::new(right)))
    }

    /// Create a multiplication expression
    pub fn mul_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Mul(Arc::new(left), Arc::new(right)))
    }

    /// Create a division expression
    pub fn div_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Div(Arc::new(left), Arc::new(right)))
    }

    /// Create a power expression
    pub fn pow(base: Expr, exponent: Expr) -> Self {
        Expr::new(ExprKind::Pow(Arc::new(base), Arc::new(exponent)))
    }

    /// Collect the distinct symbol names appearing in this expression,
    /// in first-appearance order
    pub fn symbols(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut Vec<String>) {
        match &self.kind {
            ExprKind::Number(_) => {}
            ExprKind::Symbol(s) => {
                if !out.iter().any(|n| n == s) {
                    out.push(s.clone());
                }
            }
            ExprKind::Add(u, v)
            | ExprKind::Sub(u, v)
            | ExprKind::Mul(u, v)
            | ExprKind::Div(u, v)
            | ExprKind::Pow(u, v) => {
                u.collect_symbols(out);
                v.collect_symbols(out);
            }
        }
    }

    /// Number of nodes in the tree (safety-limit accounting)
    pub fn node_count(&self) -> usize {
        match &self.kind {
            ExprKind::Number(_) | ExprKind::Symbol(_) => 1,
            ExprKind::Add(u, v)
            | ExprKind::Sub(u, v)
            | ExprKind::Mul(u, v)
            | ExprKind::Div(u, v)
            | ExprKind::Pow(u, v) => 1 + u.node_count() + v.node_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_deduplicated() {
        // x * x + x
        let expr = Expr::add_expr(
            Expr::mul_expr(Expr::symbol("x"), Expr::symbol("x")),
            Expr::symbol("x"),
        );
        assert_eq!(expr.symbols(), vec!["x".to_string()]);
    }

    #[test]
    fn test_symbols_first_appearance_order() {
        let expr = Expr::add_expr(Expr::symbol("y"), Expr::symbol("x"));
        assert_eq!(expr.symbols(), vec!["y".to_string(), "x".to_string()]);
    }

    #[test]
    fn test_node_count() {
        let expr = Expr::add_expr(Expr::symbol("x"), Expr::number(1.0));
        assert_eq!(expr.node_count(), 3);
    }
}
