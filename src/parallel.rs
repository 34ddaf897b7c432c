//! Parallel batch quiz generation using Rayon
//!
//! Enable with the `parallel` feature:
//! ```toml
//! polyquiz = { version = "0.2", features = ["parallel"] }
//! ```

use rayon::prelude::*;

use crate::classifier::MethodLabel;
use crate::engine::Engine;
use crate::error::QuizError;
use crate::solver::QuizResult;

/// Generate quizzes for a batch of expressions in parallel.
///
/// Results line up with the inputs; each entry is independent, so a
/// malformed expression fails its own slot without touching the rest.
///
/// # Examples
/// ```ignore
/// use polyquiz::Engine;
/// use polyquiz::parallel::generate_quiz_batch;
///
/// let engine = Engine::with_defaults();
/// let results = generate_quiz_batch(&engine, &["x^2 - 4", "x^3 - 1"], None);
/// assert!(results.iter().all(|r| r.is_ok()));
/// ```
pub fn generate_quiz_batch(
    engine: &Engine,
    inputs: &[&str],
    forced: Option<MethodLabel>,
) -> Vec<Result<QuizResult, QuizError>> {
    inputs
        .par_iter()
        .map(|raw| engine.generate_quiz(raw, forced))
        .collect()
}

/// Variant taking per-input labels, for callers that already classified.
pub fn generate_quiz_batch_with(
    engine: &Engine,
    inputs: &[(&str, Option<MethodLabel>)],
) -> Vec<Result<QuizResult, QuizError>> {
    inputs
        .par_iter()
        .map(|(raw, forced)| engine.generate_quiz(raw, *forced))
        .collect()
}
