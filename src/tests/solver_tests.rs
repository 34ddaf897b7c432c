//! Cross-method solver tests: the same polynomial through every branch

use crate::classifier::MethodLabel;
use crate::poly::Polynomial;
use crate::solver::{solve, NewtonOptions, SolveOptions};

fn poly(text: &str) -> Polynomial {
    Polynomial::from_text(text).unwrap()
}

fn run(text: &str, label: MethodLabel) -> String {
    solve(&poly(text), label, &SolveOptions::default())
        .unwrap()
        .solution
}

#[test]
fn test_same_polynomial_three_ways() {
    assert_eq!(run("x^2 - 4", MethodLabel::Factorisation), "(x - 2)*(x + 2)");
    assert_eq!(run("x^2 - 4", MethodLabel::Racines), "{-2, 2}");
    assert_eq!(run("x^2 - 4", MethodLabel::Quadratique), "[-2, 2]");
}

#[test]
fn test_constant_polynomial() {
    assert_eq!(run("5", MethodLabel::Racines), "EmptySet");
    assert_eq!(run("5", MethodLabel::Quadratique), "[]");
    assert_eq!(run("5", MethodLabel::Factorisation), "5");
}

#[test]
fn test_linear_polynomial() {
    assert_eq!(run("2x - 6", MethodLabel::Racines), "{3}");
    assert_eq!(run("2x - 6", MethodLabel::Quadratique), "[3]");
}

#[test]
fn test_quadratic_without_real_roots() {
    assert_eq!(run("x^2 + 1", MethodLabel::Racines), "EmptySet");
    assert_eq!(run("x^2 + 1", MethodLabel::Quadratique), "[-i, i]");
}

#[test]
fn test_irrational_quadratic_solutions() {
    assert_eq!(
        run("x^2 - x - 1", MethodLabel::Quadratique),
        "[(1 - sqrt(5))/2, (1 + sqrt(5))/2]"
    );
}

#[test]
fn test_cubic_with_rational_and_irreducible_parts() {
    assert_eq!(
        run("x^3 - 1", MethodLabel::Factorisation),
        "(x - 1)*(x^2 + x + 1)"
    );
    assert_eq!(run("x^3 - 1", MethodLabel::Racines), "{1}");
}

#[test]
fn test_repeated_roots_grouped() {
    assert_eq!(run("x^2 + 2x + 1", MethodLabel::Factorisation), "(x + 1)^2");
    assert_eq!(run("x^2 + 2x + 1", MethodLabel::Racines), "{-1}");
}

#[test]
fn test_leading_constant_preserved() {
    assert_eq!(
        run("2x^2 - 8", MethodLabel::Factorisation),
        "2*(x - 2)*(x + 2)"
    );
}

#[test]
fn test_newton_on_quintic() {
    let result = solve(
        &poly("x^5 - 1"),
        MethodLabel::Newton,
        &SolveOptions::default(),
    )
    .unwrap();
    assert_eq!(result.solution, "1");
}

#[test]
fn test_newton_custom_seed_picks_nearby_root() {
    let options = SolveOptions {
        newton: NewtonOptions {
            seed: -5.0,
            ..NewtonOptions::default()
        },
    };
    let result = solve(&poly("x^2 - 4"), MethodLabel::Newton, &options).unwrap();
    assert_eq!(result.solution, "-2");
}

#[test]
fn test_newton_divergence_reports_seed_and_iterations() {
    let err = solve(
        &poly("x^2 + 1"),
        MethodLabel::Newton,
        &SolveOptions::default(),
    )
    .unwrap_err();
    match err {
        crate::error::QuizError::NumericDivergence {
            guess, iterations, ..
        } => {
            assert_eq!(guess, 1.0);
            assert!(iterations > 0);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_explanations_are_french_and_reference_input() {
    let result = solve(
        &poly("x^2 - 9"),
        MethodLabel::Factorisation,
        &SolveOptions::default(),
    )
    .unwrap();
    assert!(result.explanation.starts_with("Pour factoriser le polynôme"));
    assert!(result.explanation.contains("x^2 - 9"));
    assert!(result.explanation.contains(&result.solution));
}

#[test]
fn test_zero_polynomial_solution_sets() {
    // 0 = 0 holds for every x, so the root set is the whole real line,
    // while the quadratic formula yields no finite solutions
    assert_eq!(run("x - x", MethodLabel::Racines), "Reals");
    assert_eq!(run("x - x", MethodLabel::Quadratique), "[]");
}
