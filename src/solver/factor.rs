//! Factoring over the rationals
//!
//! Uses the same rational-root decomposition as the exact solver: each
//! rational root p/q contributes a primitive linear factor (q*x - p), the
//! unfactored remainder stays as an irreducible polynomial factor, and a
//! leading rational constant absorbs the scaling.

use crate::error::QuizError;
use crate::poly::Polynomial;
use crate::solver::roots::{decompose, gcd, to_rational};

/// Factor a polynomial and render the result with `^` for exponents.
///
/// Inputs whose coefficients are not rational are returned in canonical
/// unfactored form; what cannot be factored passes through.
pub fn factor(p: &Polynomial) -> Result<String, QuizError> {
    if p.is_constant() {
        return Ok(format!("{}", p));
    }

    let decomposition = decompose(p);
    let Some(remainder) = decomposition.remainder else {
        return Ok(format!("{}", p));
    };

    if decomposition.rational_roots.is_empty() && remainder.len() > 1 {
        // Nothing split off: canonical form is the factorization
        return Ok(format!("{}", p));
    }

    // Group rational roots by multiplicity, preserving discovery order
    let mut grouped: Vec<((i128, i128), u32)> = Vec::new();
    for root in &decomposition.rational_roots {
        match grouped.iter_mut().find(|(r, _)| r == root) {
            Some((_, count)) => *count += 1,
            None => grouped.push((*root, 1)),
        }
    }

    let mut parts: Vec<String> = Vec::new();

    for &((num, den), count) in &grouped {
        // Primitive linear factor q*x - p
        let linear = Polynomial::from_raw_parts(p.var(), vec![-(num as f64), den as f64]);
        let rendered = format!("({})", linear);
        if count == 1 {
            parts.push(rendered);
        } else {
            parts.push(format!("{}^{}", rendered, count));
        }
    }

    // A non-constant remainder is rendered as a primitive irreducible
    // factor; a constant one is absorbed into the leading constant
    let mut rendered_leading = 1.0f64;
    if remainder.len() > 1 {
        let mut content = remainder.iter().fold(0i128, |g, &c| gcd(g, c)).max(1);
        if remainder[remainder.len() - 1] < 0 {
            content = -content;
        }
        let normalized: Vec<f64> = remainder.iter().map(|&c| (c / content) as f64).collect();
        rendered_leading = normalized[normalized.len() - 1];
        let rem_poly = Polynomial::from_raw_parts(p.var(), normalized);
        parts.push(format!("({})", rem_poly));
    }

    // Leading rational constant: original leading coefficient divided by
    // the product of the rendered factors' leading coefficients
    let mut factor_leading = rendered_leading;
    for &((_, q), count) in &grouped {
        factor_leading *= (q as f64).powi(count as i32);
    }
    let constant = p.leading() / factor_leading;

    let product = parts.join("*");
    Ok(apply_constant(constant, &product))
}

/// Prefix the rendered product with its leading rational constant
fn apply_constant(constant: f64, product: &str) -> String {
    if (constant - 1.0).abs() < 1e-9 {
        return product.to_string();
    }
    if (constant + 1.0).abs() < 1e-9 {
        return format!("-{}", product);
    }
    let rendered = match to_rational(constant) {
        Some((n, 1)) => format!("{}", n),
        Some((n, d)) => format!("{}/{}", n, d),
        None => format!("{}", constant),
    };
    format!("{}*{}", rendered, product)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(text: &str) -> Polynomial {
        Polynomial::from_text(text).unwrap()
    }

    #[test]
    fn test_difference_of_squares() {
        assert_eq!(factor(&poly("x^2-4")).unwrap(), "(x - 2)*(x + 2)");
    }

    #[test]
    fn test_perfect_square() {
        assert_eq!(factor(&poly("x^2+2x+1")).unwrap(), "(x + 1)^2");
    }

    #[test]
    fn test_leading_constant() {
        // 2x^2 - 8 = 2*(x - 2)*(x + 2)
        assert_eq!(factor(&poly("2x^2-8")).unwrap(), "2*(x - 2)*(x + 2)");
    }

    #[test]
    fn test_negative_leading() {
        // -x^2 + 4 = -(x - 2)*(x + 2)
        assert_eq!(factor(&poly("-x^2+4")).unwrap(), "-(x - 2)*(x + 2)");
    }

    #[test]
    fn test_irreducible_quadratic_passthrough() {
        assert_eq!(factor(&poly("x^2+1")).unwrap(), "x^2 + 1");
    }

    #[test]
    fn test_mixed_rational_and_irreducible() {
        // x^3 - 1 = (x - 1)*(x^2 + x + 1)
        assert_eq!(factor(&poly("x^3-1")).unwrap(), "(x - 1)*(x^2 + x + 1)");
    }

    #[test]
    fn test_constant_input() {
        assert_eq!(factor(&poly("5")).unwrap(), "5");
    }

    #[test]
    fn test_root_at_zero() {
        // x^3 - x = (x)*(x - 1)*(x + 1)
        let result = factor(&poly("x^3-x")).unwrap();
        assert!(result.contains("(x - 1)"));
        assert!(result.contains("(x + 1)"));
        assert!(result.contains("(x)"));
    }

    #[test]
    fn test_fractional_leading_constant() {
        // x^2/2 - 2 = 1/2*(x - 2)*(x + 2)
        assert_eq!(factor(&poly("x^2/2 - 2")).unwrap(), "1/2*(x - 2)*(x + 2)");
    }
}
