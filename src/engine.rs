//! Quiz engine: parse, featurize, classify, solve
//!
//! The engine owns a classifier and the pipeline settings, and exposes
//! the two request-level operations: method recommendation and full
//! quiz generation. Built once, shared freely (`Engine` is cheap to
//! clone and `Send + Sync`).

use std::fmt;
use std::path::Path;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classifier::{DegreeRuleClassifier, ForestClassifier, MethodClassifier, MethodLabel};
use crate::error::QuizError;
use crate::features::{FeatureVector, DEFAULT_COEFF_LEN, DERIVED_FEATURES};
use crate::poly::Polynomial;
use crate::solver::{self, NewtonOptions, QuizResult, SolveOptions};

/// How the classifier verdict interacts with the polynomial's degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierPolicy {
    /// The classifier's verdict is final.
    #[default]
    ModelOnly,
    /// Degree-keyed rules take precedence: quadratics get the quadratic
    /// formula, anything of higher degree goes to Newton, and only
    /// constants and linear inputs reach the classifier.
    DegreeOverride,
}

/// A method recommendation with a human-readable justification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub label: MethodLabel,
    pub explanation: String,
}

/// Serializable engine settings, e.g. loaded from a deployment file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of coefficient slots in the feature vector
    pub coeff_len: usize,
    pub policy: ClassifierPolicy,
    pub newton: NewtonOptions,
    /// Per-request wall-clock budget in milliseconds; 0 disables it
    pub timeout_ms: u64,
    /// Optional path to a serialized forest; the built-in degree rules
    /// are used when absent
    pub model_path: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            coeff_len: DEFAULT_COEFF_LEN,
            policy: ClassifierPolicy::default(),
            newton: NewtonOptions::default(),
            timeout_ms: 0,
            model_path: None,
        }
    }
}

/// The assembled pipeline. Construct via [`Engine::builder`].
#[derive(Clone)]
pub struct Engine {
    classifier: Arc<dyn MethodClassifier>,
    policy: ClassifierPolicy,
    coeff_len: usize,
    options: SolveOptions,
    timeout: Option<Duration>,
}

// The classifier is a trait object, so Debug is spelled out by hand
impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("input_dim", &self.classifier.input_dim())
            .field("policy", &self.policy)
            .field("coeff_len", &self.coeff_len)
            .field("options", &self.options)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Default engine: degree rules, ten coefficient slots, no timeout
    pub fn with_defaults() -> Self {
        Engine::builder()
            .build()
            .unwrap_or_else(|_| unreachable!("default dimensions always agree"))
    }

    /// Build an engine from a config, loading the forest when a path
    /// is given.
    pub fn from_config(config: &EngineConfig) -> Result<Self, QuizError> {
        let mut builder = Engine::builder()
            .coeff_len(config.coeff_len)
            .policy(config.policy)
            .newton_options(config.newton.clone());
        if config.timeout_ms > 0 {
            builder = builder.timeout(Duration::from_millis(config.timeout_ms));
        }
        if let Some(ref path) = config.model_path {
            let forest = ForestClassifier::from_path(Path::new(path))?;
            builder = builder.classifier(Arc::new(forest));
        }
        builder.build()
    }

    /// Parse an expression and recommend a solution method for it.
    pub fn recommend(&self, raw: &str) -> Result<Recommendation, QuizError> {
        let poly = Polynomial::from_text(raw)?;
        let features = self.featurize(&poly)?;
        let label = self.classify(&poly, &features)?;
        info!(input = raw, label = %label, "method recommended");
        Ok(Recommendation {
            label,
            explanation: format!(
                "La méthode recommandée pour le polynôme {} est : {}.",
                poly, label
            ),
        })
    }

    /// Full pipeline: parse, classify (unless `forced` is given) and
    /// solve. Every failure surfaces as a `QuizGeneration` error, the
    /// way a request handler reports it.
    pub fn generate_quiz(
        &self,
        raw: &str,
        forced: Option<MethodLabel>,
    ) -> Result<QuizResult, QuizError> {
        match self.timeout {
            None => self.generate_inner(raw, forced),
            Some(budget) => self.generate_with_timeout(raw, forced, budget),
        }
    }

    fn generate_inner(
        &self,
        raw: &str,
        forced: Option<MethodLabel>,
    ) -> Result<QuizResult, QuizError> {
        let poly = Polynomial::from_text(raw).map_err(|e| QuizError::generation(&e))?;
        let label = match forced {
            Some(label) => label,
            None => {
                let features = self
                    .featurize(&poly)
                    .map_err(|e| QuizError::generation(&e))?;
                self.classify(&poly, &features)
                    .map_err(|e| QuizError::generation(&e))?
            }
        };
        info!(input = raw, label = %label, "generating quiz");
        solver::solve(&poly, label, &self.options).map_err(|e| QuizError::generation(&e))
    }

    fn generate_with_timeout(
        &self,
        raw: &str,
        forced: Option<MethodLabel>,
        budget: Duration,
    ) -> Result<QuizResult, QuizError> {
        let engine = self.clone();
        let input = raw.to_string();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(engine.generate_inner(&input, forced));
        });
        match rx.recv_timeout(budget) {
            Ok(result) => result,
            Err(_) => Err(QuizError::generation(&format!(
                "délai de génération dépassé ({} ms)",
                budget.as_millis()
            ))),
        }
    }

    fn featurize(&self, poly: &Polynomial) -> Result<FeatureVector, QuizError> {
        let coeffs = poly.all_coeffs();
        debug!(?coeffs, degree = poly.degree(), "coefficients extracted");
        let features = FeatureVector::build(&coeffs, self.coeff_len);
        debug!(values = ?features.values(), "feature vector built");
        Ok(features)
    }

    fn classify(
        &self,
        poly: &Polynomial,
        features: &FeatureVector,
    ) -> Result<MethodLabel, QuizError> {
        let label = match self.policy {
            ClassifierPolicy::ModelOnly => self.classifier.predict(features)?,
            ClassifierPolicy::DegreeOverride => match poly.degree() {
                2 => MethodLabel::Quadratique,
                d if d > 2 => MethodLabel::Newton,
                _ => self.classifier.predict(features)?,
            },
        };
        debug!(label = %label, policy = ?self.policy, "method classified");
        Ok(label)
    }
}

/// Fluent builder mirroring the rest of the crate's call style
pub struct EngineBuilder {
    classifier: Option<Arc<dyn MethodClassifier>>,
    policy: ClassifierPolicy,
    coeff_len: usize,
    options: SolveOptions,
    timeout: Option<Duration>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        EngineBuilder {
            classifier: None,
            policy: ClassifierPolicy::default(),
            coeff_len: DEFAULT_COEFF_LEN,
            options: SolveOptions::default(),
            timeout: None,
        }
    }

    pub fn classifier(mut self, classifier: Arc<dyn MethodClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn policy(mut self, policy: ClassifierPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn coeff_len(mut self, coeff_len: usize) -> Self {
        self.coeff_len = coeff_len;
        self
    }

    pub fn newton_options(mut self, newton: NewtonOptions) -> Self {
        self.options.newton = newton;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Assemble the engine, checking that the classifier's input
    /// dimension matches the configured feature vector length.
    pub fn build(self) -> Result<Engine, QuizError> {
        let expected = self.coeff_len + DERIVED_FEATURES;
        let classifier = self
            .classifier
            .unwrap_or_else(|| Arc::new(DegreeRuleClassifier::new(expected)));
        if classifier.input_dim() != expected {
            return Err(QuizError::DimensionMismatch {
                expected,
                actual: classifier.input_dim(),
            });
        }
        Ok(Engine {
            classifier,
            policy: self.policy,
            coeff_len: self.coeff_len,
            options: self.options,
            timeout: self.timeout,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        EngineBuilder::new()
    }
}
