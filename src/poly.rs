//! Univariate polynomial extraction from parsed expressions
//!
//! Converts an `Expr` into a dense coefficient representation over the
//! single free variable, rejecting anything non-polynomial (division by
//! the variable, symbolic or fractional exponents, several variables).

use crate::ast::{Expr, ExprKind};
use crate::error::QuizError;
use crate::parser;

/// Coefficients smaller than this are treated as zero when trimming
const COEFF_TOLERANCE: f64 = 1e-12;

/// Maximum supported polynomial degree (safety limit for `^`)
pub const DEFAULT_MAX_DEGREE: usize = 64;

/// A univariate polynomial: the original input text plus its dense
/// coefficient vector over the single free variable.
///
/// Immutable once built; parsing must succeed before a `Polynomial`
/// exists, so downstream stages never see unvalidated input.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    text: String,
    var: String,
    /// Ascending degree order, trailing zeros trimmed, never empty
    coeffs: Vec<f64>,
}

impl Polynomial {
    /// Sanitize, parse and convert raw polynomial text.
    ///
    /// # Errors
    /// `MalformedPolynomial` for unparseable or non-polynomial input,
    /// `MaxDegreeExceeded` past the degree safety limit.
    pub fn from_text(raw: &str) -> Result<Self, QuizError> {
        let expr = parser::parse_raw(raw)?;
        Self::from_expr(raw, &expr)
    }

    /// Convert an already-parsed expression
    pub fn from_expr(raw: &str, expr: &Expr) -> Result<Self, QuizError> {
        let symbols = expr.symbols();
        let var = match symbols.len() {
            // A constant like "5" still needs a variable for rendering
            0 => "x".to_string(),
            1 => symbols[0].clone(),
            _ => {
                return Err(QuizError::malformed(format!(
                    "plusieurs variables trouvées : {}",
                    symbols.join(", ")
                )));
            }
        };

        let mut coeffs = convert(expr)?;
        trim_trailing_zeros(&mut coeffs);

        Ok(Polynomial {
            text: raw.to_string(),
            var,
            coeffs,
        })
    }

    /// Build directly from ascending coefficients (internal: used to
    /// render deflated remainders during factoring)
    pub(crate) fn from_raw_parts(var: &str, coeffs: Vec<f64>) -> Self {
        let mut p = Polynomial {
            text: String::new(),
            var: var.to_string(),
            coeffs,
        };
        trim_trailing_zeros(&mut p.coeffs);
        p.text = format!("{}", p);
        p
    }

    /// Original input text, exactly as the caller provided it
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Name of the free variable
    pub fn var(&self) -> &str {
        &self.var
    }

    /// Degree: highest exponent with a nonzero coefficient.
    /// A constant (including the zero polynomial) has degree 0.
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Coefficients in descending degree order (leading term first),
    /// matching the order the feature builder consumes
    pub fn all_coeffs(&self) -> Vec<f64> {
        self.coeffs.iter().rev().copied().collect()
    }

    /// Leading coefficient (nonzero unless the polynomial is zero)
    pub fn leading(&self) -> f64 {
        self.coeffs[self.coeffs.len() - 1]
    }

    /// Constant term
    pub fn constant_term(&self) -> f64 {
        self.coeffs[0]
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.len() == 1 && self.coeffs[0].abs() < COEFF_TOLERANCE
    }

    pub fn is_constant(&self) -> bool {
        self.coeffs.len() == 1
    }

    /// Evaluate at a point using Horner's scheme
    pub fn eval(&self, x: f64) -> f64 {
        let mut acc = 0.0;
        for &c in self.coeffs.iter().rev() {
            acc = acc * x + c;
        }
        acc
    }

    /// Formal derivative
    pub fn derivative(&self) -> Polynomial {
        if self.coeffs.len() == 1 {
            return Polynomial {
                text: "0".to_string(),
                var: self.var.clone(),
                coeffs: vec![0.0],
            };
        }

        let coeffs: Vec<f64> = self
            .coeffs
            .iter()
            .enumerate()
            .skip(1)
            .map(|(k, &c)| c * k as f64)
            .collect();

        let mut d = Polynomial {
            text: format!("d/d{}({})", self.var, self.text),
            var: self.var.clone(),
            coeffs,
        };
        trim_trailing_zeros(&mut d.coeffs);
        d
    }
}

/// Recursive conversion to a dense ascending coefficient vector
fn convert(expr: &Expr) -> Result<Vec<f64>, QuizError> {
    match &expr.kind {
        ExprKind::Number(n) => Ok(vec![*n]),

        ExprKind::Symbol(_) => Ok(vec![0.0, 1.0]),

        ExprKind::Add(u, v) => {
            let a = convert(u)?;
            let b = convert(v)?;
            Ok(add(&a, &b, 1.0))
        }

        ExprKind::Sub(u, v) => {
            let a = convert(u)?;
            let b = convert(v)?;
            Ok(add(&a, &b, -1.0))
        }

        ExprKind::Mul(u, v) => {
            let a = convert(u)?;
            let b = convert(v)?;
            mul(&a, &b)
        }

        ExprKind::Div(u, v) => {
            let a = convert(u)?;
            let b = convert(v)?;
            if b.len() > 1 {
                return Err(QuizError::malformed(
                    "division par une expression contenant la variable",
                ));
            }
            let d = b[0];
            if d.abs() < COEFF_TOLERANCE {
                return Err(QuizError::malformed("division par zéro"));
            }
            Ok(a.iter().map(|c| c / d).collect())
        }

        ExprKind::Pow(u, v) => {
            let exponent = match v.as_number() {
                Some(e) => e,
                None => {
                    return Err(QuizError::malformed(
                        "l'exposant doit être une constante entière",
                    ));
                }
            };
            if exponent < 0.0 || exponent.fract() != 0.0 {
                return Err(QuizError::malformed(format!(
                    "exposant non polynomial : {}",
                    exponent
                )));
            }
            let e = exponent as usize;
            if e > DEFAULT_MAX_DEGREE {
                return Err(QuizError::MaxDegreeExceeded {
                    degree: e,
                    limit: DEFAULT_MAX_DEGREE,
                });
            }

            let base = convert(u)?;
            let mut acc = vec![1.0];
            for _ in 0..e {
                acc = mul(&acc, &base)?;
            }
            Ok(acc)
        }
    }
}

/// a + scale * b, elementwise over ascending coefficients
fn add(a: &[f64], b: &[f64], scale: f64) -> Vec<f64> {
    let mut out = vec![0.0; a.len().max(b.len())];
    for (i, &c) in a.iter().enumerate() {
        out[i] += c;
    }
    for (i, &c) in b.iter().enumerate() {
        out[i] += scale * c;
    }
    out
}

/// Convolution product with a degree guard
fn mul(a: &[f64], b: &[f64]) -> Result<Vec<f64>, QuizError> {
    let degree = (a.len() - 1) + (b.len() - 1);
    if degree > DEFAULT_MAX_DEGREE {
        return Err(QuizError::MaxDegreeExceeded {
            degree,
            limit: DEFAULT_MAX_DEGREE,
        });
    }

    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &ca) in a.iter().enumerate() {
        for (j, &cb) in b.iter().enumerate() {
            out[i + j] += ca * cb;
        }
    }
    Ok(out)
}

fn trim_trailing_zeros(coeffs: &mut Vec<f64>) {
    while coeffs.len() > 1 && coeffs[coeffs.len() - 1].abs() < COEFF_TOLERANCE {
        coeffs.pop();
    }
    if coeffs.is_empty() {
        coeffs.push(0.0);
    }
}

/// Format a coefficient, as an integer when it has no fractional part
pub(crate) fn format_coeff(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e10 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl std::fmt::Display for Polynomial {
    /// Canonical rendering, descending degree, `^` for exponents
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        let mut first = true;
        for (k, &c) in self.coeffs.iter().enumerate().rev() {
            if c.abs() < COEFF_TOLERANCE {
                continue;
            }

            let magnitude = c.abs();
            if first {
                if c < 0.0 {
                    write!(f, "-")?;
                }
                first = false;
            } else if c < 0.0 {
                write!(f, " - ")?;
            } else {
                write!(f, " + ")?;
            }

            let show_coeff = k == 0 || (magnitude - 1.0).abs() > COEFF_TOLERANCE;
            if show_coeff {
                write!(f, "{}", format_coeff(magnitude))?;
            }
            if k > 0 {
                if show_coeff {
                    write!(f, "*")?;
                }
                write!(f, "{}", self.var)?;
                if k > 1 {
                    write!(f, "^{}", k)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_has_degree_zero() {
        let p = Polynomial::from_text("5").unwrap();
        assert_eq!(p.degree(), 0);
        assert_eq!(p.all_coeffs(), vec![5.0]);
    }

    #[test]
    fn test_coefficients_descending() {
        // x^5 + x^2 + x -> [1, 0, 0, 1, 1, 0]
        let p = Polynomial::from_text("x^5 + x^2 + x").unwrap();
        assert_eq!(p.degree(), 5);
        assert_eq!(p.all_coeffs(), vec![1.0, 0.0, 0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_implicit_multiplication_notation() {
        let p = Polynomial::from_text("3x^2 - 2x + 1").unwrap();
        assert_eq!(p.all_coeffs(), vec![3.0, -2.0, 1.0]);
    }

    #[test]
    fn test_expansion_of_product() {
        // (x-2)*(x+2) = x^2 - 4
        let p = Polynomial::from_text("(x-2)*(x+2)").unwrap();
        assert_eq!(p.all_coeffs(), vec![1.0, 0.0, -4.0]);
    }

    #[test]
    fn test_power_of_binomial() {
        // (x+1)^2 = x^2 + 2x + 1
        let p = Polynomial::from_text("(x+1)^2").unwrap();
        assert_eq!(p.all_coeffs(), vec![1.0, 2.0, 1.0]);
    }

    #[test]
    fn test_division_by_constant() {
        let p = Polynomial::from_text("x/2").unwrap();
        assert_eq!(p.all_coeffs(), vec![0.5, 0.0]);
    }

    #[test]
    fn test_division_by_variable_rejected() {
        let err = Polynomial::from_text("1/x").unwrap_err();
        assert_eq!(err.kind(), "MalformedPolynomialError");
    }

    #[test]
    fn test_symbolic_exponent_rejected() {
        assert!(Polynomial::from_text("x^x").is_err());
        assert!(Polynomial::from_text("x^-1").is_err());
        assert!(Polynomial::from_text("x^2.5").is_err());
    }

    #[test]
    fn test_two_variables_rejected() {
        let err = Polynomial::from_text("x^2 + y").unwrap_err();
        assert_eq!(err.kind(), "MalformedPolynomialError");
    }

    #[test]
    fn test_degree_limit() {
        let err = Polynomial::from_text("x^65").unwrap_err();
        assert_eq!(err.kind(), "MaxDegreeExceededError");
    }

    #[test]
    fn test_cancellation_trims_degree() {
        // x^2 - x^2 + 1 has degree 0
        let p = Polynomial::from_text("x^2 - x^2 + 1").unwrap();
        assert_eq!(p.degree(), 0);
    }

    #[test]
    fn test_eval_horner() {
        let p = Polynomial::from_text("x^2 - 4").unwrap();
        assert_eq!(p.eval(3.0), 5.0);
        assert_eq!(p.eval(-2.0), 0.0);
    }

    #[test]
    fn test_derivative() {
        let p = Polynomial::from_text("x^3 - 2x").unwrap();
        let d = p.derivative();
        assert_eq!(d.all_coeffs(), vec![3.0, 0.0, -2.0]);
    }

    #[test]
    fn test_display_round_trip() {
        let p = Polynomial::from_text("x^2-4").unwrap();
        assert_eq!(format!("{}", p), "x^2 - 4");

        let q = Polynomial::from_text("-x^3+2x-1").unwrap();
        assert_eq!(format!("{}", q), "-x^3 + 2*x - 1");
    }
}
