//! Polynomial Quiz Engine
//!
//! A focused Rust library that turns raw polynomial text into solved
//! quiz items: parse, featurize, pick a solution method, solve.
//!
//! # Features
//! - Whitespace-tolerant sanitizing with implicit multiplication
//! - Dense coefficient extraction with a fixed-width feature vector
//! - Pluggable method classifiers (degree rules or a serialized forest)
//! - Four solution strategies: factoring, root finding, the quadratic
//!   formula and Newton iteration
//! - Quiz text generated in French, matching the classroom material
//!
//! # Usage Examples
//!
//! ## One-shot API
//! ```ignore
//! use polyquiz::generate_quiz;
//! let quiz = generate_quiz("x^2 - 4").unwrap();
//! assert_eq!(quiz.solution, "[-2, 2]");
//! ```
//!
//! ## Engine API
//! ```ignore
//! use polyquiz::{Engine, ClassifierPolicy, MethodLabel};
//! let engine = Engine::builder()
//!     .policy(ClassifierPolicy::DegreeOverride)
//!     .build()
//!     .unwrap();
//! let quiz = engine.generate_quiz("x^3 - 1", Some(MethodLabel::Factorisation)).unwrap();
//! ```

mod ast;
mod classifier;
mod display;
mod engine;
mod error;
mod features;
mod parser;
mod poly;
mod solver;

#[cfg(feature = "parallel")]
pub mod parallel;

#[cfg(test)]
mod tests;

// Re-export key types for easier usage
pub use ast::{Expr, ExprKind};
pub use classifier::{
    DecisionTree, DegreeRuleClassifier, ForestClassifier, MethodClassifier, MethodLabel, TreeNode,
};
pub use engine::{ClassifierPolicy, Engine, EngineBuilder, EngineConfig, Recommendation};
pub use error::{QuizError, Span};
pub use features::{FeatureVector, DEFAULT_COEFF_LEN, DERIVED_FEATURES};
pub use parser::{parse, sanitize};
pub use poly::{Polynomial, DEFAULT_MAX_DEGREE};
pub use solver::{
    solve, NewtonOptions, QuizResult, Root, SolveOptions, DEFAULT_MAX_ITERATIONS, DEFAULT_SEED,
    DEFAULT_TOLERANCE,
};

/// Hard cap on parsed expression size. Inputs whose syntax tree grows
/// past this many nodes are rejected before conversion.
pub const DEFAULT_MAX_NODES: usize = 10_000;

/// Recommend a solution method for a polynomial using the default
/// engine (degree rules, ten coefficient slots).
///
/// # Example
/// ```ignore
/// let rec = polyquiz::recommend_method("x^3 - 2x").unwrap();
/// assert_eq!(rec.label.as_str(), "Racines");
/// ```
///
/// # Note
/// For a trained classifier, timeouts or a custom policy, use the
/// `Engine` builder:
/// ```ignore
/// Engine::builder().classifier(forest).build()
/// ```
pub fn recommend_method(raw: &str) -> Result<Recommendation, QuizError> {
    Engine::with_defaults().recommend(raw)
}

/// Generate a full quiz item for a polynomial using the default engine.
pub fn generate_quiz(raw: &str) -> Result<QuizResult, QuizError> {
    Engine::with_defaults().generate_quiz(raw, None)
}
