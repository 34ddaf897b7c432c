//! Newton iteration for numeric root approximation

use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::poly::Polynomial;

/// Default initial estimate, configurable through `NewtonOptions`
pub const DEFAULT_SEED: f64 = 1.0;

/// Default convergence tolerance on |f(x)|
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default iteration cap
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Derivative magnitudes below this abort the iteration as divergent
const DERIVATIVE_FLOOR: f64 = 1e-14;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewtonOptions {
    pub seed: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for NewtonOptions {
    fn default() -> Self {
        NewtonOptions {
            seed: DEFAULT_SEED,
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Approximate one root of `p` by Newton's method.
///
/// Either converges to within `tolerance` or fails with
/// `NumericDivergence`; an unconverged estimate is never returned as if
/// it were a root.
pub fn newton_root(p: &Polynomial, options: &NewtonOptions) -> Result<f64, QuizError> {
    if p.is_constant() {
        return Err(QuizError::NumericDivergence {
            guess: options.seed,
            iterations: 0,
            reason: "le polynôme est constant, aucune racine à approximer".to_string(),
        });
    }

    let derivative = p.derivative();
    let mut x = options.seed;

    for iteration in 0..options.max_iterations {
        let fx = p.eval(x);
        if fx.abs() <= options.tolerance {
            return Ok(x);
        }

        let fpx = derivative.eval(x);
        if fpx.abs() < DERIVATIVE_FLOOR {
            return Err(QuizError::NumericDivergence {
                guess: options.seed,
                iterations: iteration,
                reason: format!("dérivée nulle au point {}", x),
            });
        }

        x -= fx / fpx;
        if !x.is_finite() {
            return Err(QuizError::NumericDivergence {
                guess: options.seed,
                iterations: iteration,
                reason: "l'itération a divergé vers une valeur non finie".to_string(),
            });
        }
    }

    // One final acceptance check after the cap
    if p.eval(x).abs() <= options.tolerance {
        return Ok(x);
    }

    Err(QuizError::NumericDivergence {
        guess: options.seed,
        iterations: options.max_iterations,
        reason: "pas de convergence dans la limite d'itérations".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(text: &str) -> Polynomial {
        Polynomial::from_text(text).unwrap()
    }

    #[test]
    fn test_converges_on_quintic() {
        // x^5 - 1: the default seed is the root itself
        let root = newton_root(&poly("x^5-1"), &NewtonOptions::default()).unwrap();
        assert!((root - 1.0).abs() < 1e-8);
    }

    #[test]
    fn test_converges_on_quadratic() {
        let root = newton_root(&poly("x^2-4"), &NewtonOptions::default()).unwrap();
        assert!((root - 2.0).abs() < 1e-8);
    }

    #[test]
    fn test_no_real_root_diverges() {
        let err = newton_root(&poly("x^2+1"), &NewtonOptions::default()).unwrap_err();
        assert_eq!(err.kind(), "NumericDivergenceError");
    }

    #[test]
    fn test_zero_derivative_at_seed() {
        // f(x) = x^2 + 1 with seed 0: f'(0) = 0
        let options = NewtonOptions {
            seed: 0.0,
            ..NewtonOptions::default()
        };
        let err = newton_root(&poly("x^2+1"), &options).unwrap_err();
        match err {
            QuizError::NumericDivergence { iterations, .. } => assert_eq!(iterations, 0),
            other => panic!("expected NumericDivergence, got {:?}", other),
        }
    }

    #[test]
    fn test_constant_polynomial_diverges() {
        let err = newton_root(&poly("5"), &NewtonOptions::default()).unwrap_err();
        assert_eq!(err.kind(), "NumericDivergenceError");
    }

    #[test]
    fn test_custom_seed_reaches_other_root() {
        let options = NewtonOptions {
            seed: -5.0,
            ..NewtonOptions::default()
        };
        let root = newton_root(&poly("x^2-4"), &options).unwrap();
        assert!((root + 2.0).abs() < 1e-8);
    }
}
