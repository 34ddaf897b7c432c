//! Solver dispatch: one method label, four terminal strategies
//!
//! Each branch produces a question prompt, the solution text and a
//! multi-step explanation, all derived from the same solved expression.

mod factor;
mod newton;
pub(crate) mod roots;

pub use newton::{NewtonOptions, DEFAULT_MAX_ITERATIONS, DEFAULT_SEED, DEFAULT_TOLERANCE};
pub use roots::Root;

use serde::{Deserialize, Serialize};

use crate::classifier::MethodLabel;
use crate::error::QuizError;
use crate::poly::Polynomial;

/// A generated quiz item. Request-scoped, never persisted, and never
/// partially built: a failure anywhere aborts the whole request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub question: String,
    pub solution: String,
    pub explanation: String,
}

/// Solver tuning shared by the dispatch branches
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolveOptions {
    pub newton: NewtonOptions,
}

/// Dispatch to the strategy selected by `label`.
///
/// Errors are returned raw; the engine wraps them into the
/// `QuizGeneration` umbrella at its call site.
pub fn solve(
    poly: &Polynomial,
    label: MethodLabel,
    options: &SolveOptions,
) -> Result<QuizResult, QuizError> {
    match label {
        MethodLabel::Factorisation => {
            let solution = factor::factor(poly)?;
            Ok(QuizResult {
                question: format!("Factorisez le polynôme : {}", poly),
                explanation: format!(
                    "Pour factoriser le polynôme {} :\n\
                     1. On identifie les racines en résolvant {} = 0.\n\
                     2. Les racines permettent de construire les facteurs.\n\
                     Le résultat est : {}.",
                    poly.text(),
                    poly.text(),
                    solution
                ),
                solution,
            })
        }

        MethodLabel::Racines => {
            // The zero polynomial vanishes everywhere: the solution set
            // is the whole real line, not a root enumeration
            let solution = if poly.is_zero() {
                "Reals".to_string()
            } else {
                render_root_set(&roots::real_roots(poly)?)
            };
            Ok(QuizResult {
                question: format!("Trouvez les racines du polynôme : {}", poly),
                explanation: format!(
                    "Pour trouver les racines du polynôme {} :\n\
                     1. On résout {} = 0.\n\
                     Les racines trouvées sont : {}.",
                    poly.text(),
                    poly.text(),
                    solution
                ),
                solution,
            })
        }

        MethodLabel::Quadratique => {
            let roots = roots::solve_all(poly)?;
            let solution = render_root_list(&roots);
            Ok(QuizResult {
                question: format!("Résolvez le polynôme quadratique : {} = 0", poly),
                explanation: format!(
                    "Pour résoudre le polynôme {} :\n\
                     1. On applique la formule quadratique (ou équivalent).\n\
                     Les solutions sont : {}.",
                    poly.text(),
                    solution
                ),
                solution,
            })
        }

        MethodLabel::Newton => {
            let root = newton::newton_root(poly, &options.newton)?;
            let solution = render_value(root);
            Ok(QuizResult {
                question: format!(
                    "Utilisez la méthode de Newton pour approximer les racines de : {}",
                    poly
                ),
                explanation: format!(
                    "Pour approximer les racines de {} avec la méthode de Newton :\n\
                     1. On choisit une estimation initiale.\n\
                     2. On utilise des itérations pour affiner les racines.\n\
                     La solution approximée est : {}.",
                    poly.text(),
                    solution
                ),
                solution,
            })
        }
    }
}

/// Distinct root texts in solver order; multiplicities collapse since
/// the roots arrive sorted
fn distinct_texts(roots: &[Root]) -> Vec<&str> {
    let mut items: Vec<&str> = Vec::with_capacity(roots.len());
    for root in roots {
        if items.last() != Some(&root.text.as_str()) {
            items.push(&root.text);
        }
    }
    items
}

/// Render a real solution set: `{-2, 2}`, or `EmptySet` when empty
fn render_root_set(roots: &[Root]) -> String {
    if roots.is_empty() {
        return "EmptySet".to_string();
    }
    format!("{{{}}}", distinct_texts(roots).join(", "))
}

/// Render a distinct root list the way the exact general solver reports it
fn render_root_list(roots: &[Root]) -> String {
    format!("[{}]", distinct_texts(roots).join(", "))
}

/// Render a numeric approximation with the trailing noise rounded away
fn render_value(value: f64) -> String {
    let rounded = (value * 1e10).round() / 1e10;
    format!("{}", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(text: &str) -> Polynomial {
        Polynomial::from_text(text).unwrap()
    }

    #[test]
    fn test_racines_branch() {
        let result = solve(
            &poly("x^2-4"),
            MethodLabel::Racines,
            &SolveOptions::default(),
        )
        .unwrap();
        assert_eq!(result.solution, "{-2, 2}");
        assert!(result.question.contains("Trouvez les racines"));
        assert!(result.explanation.contains("x^2-4 = 0"));
    }

    #[test]
    fn test_quadratique_branch() {
        let result = solve(
            &poly("x^2-4"),
            MethodLabel::Quadratique,
            &SolveOptions::default(),
        )
        .unwrap();
        assert_eq!(result.solution, "[-2, 2]");
        assert!(result.question.ends_with("= 0"));
    }

    #[test]
    fn test_factorisation_branch() {
        let result = solve(
            &poly("x^2-4"),
            MethodLabel::Factorisation,
            &SolveOptions::default(),
        )
        .unwrap();
        assert_eq!(result.solution, "(x - 2)*(x + 2)");
        assert!(result.explanation.contains("racines"));
    }

    #[test]
    fn test_newton_branch() {
        let result = solve(
            &poly("x^5-1"),
            MethodLabel::Newton,
            &SolveOptions::default(),
        )
        .unwrap();
        assert_eq!(result.solution, "1");
    }

    #[test]
    fn test_constant_racines_empty_set() {
        let result = solve(&poly("5"), MethodLabel::Racines, &SolveOptions::default()).unwrap();
        assert_eq!(result.solution, "EmptySet");
    }

    #[test]
    fn test_newton_divergence_propagates() {
        let err = solve(
            &poly("x^2+1"),
            MethodLabel::Newton,
            &SolveOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "NumericDivergenceError");
    }

    #[test]
    fn test_question_uses_canonical_rendering() {
        // Input notation is normalized in the prompt
        let result = solve(
            &poly("4 + x^2 + 4x"),
            MethodLabel::Factorisation,
            &SolveOptions::default(),
        )
        .unwrap();
        assert_eq!(
            result.question,
            "Factorisez le polynôme : x^2 + 4*x + 4"
        );
    }

    #[test]
    fn test_explanation_echoes_caller_text() {
        // The explanation repeats the polynomial exactly as the caller
        // wrote it, unnormalized
        let result = solve(
            &poly("4 + x^2 + 4x"),
            MethodLabel::Factorisation,
            &SolveOptions::default(),
        )
        .unwrap();
        assert!(result.explanation.contains("4 + x^2 + 4x"));
        assert!(!result.explanation.contains("4*x + 4 :"));
    }

    #[test]
    fn test_zero_polynomial_full_real_line() {
        let result = solve(
            &poly("x - x"),
            MethodLabel::Racines,
            &SolveOptions::default(),
        )
        .unwrap();
        assert_eq!(result.solution, "Reals");
    }
}
