//! Method classification: mapping a feature vector to a solving strategy
//!
//! The classifier is a capability interface: the engine only ever calls
//! `predict(feature_vector) -> label`, so the pre-trained ensemble can be
//! swapped for a rule-based implementation without touching the pipeline.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::features::FeatureVector;

/// The categorical solving strategy chosen for a polynomial.
///
/// Labels keep their French wire names for model-file compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodLabel {
    /// Exact solve via the quadratic formula (degree <= 2)
    Quadratique,
    /// Exact real-root search
    Racines,
    /// Factoring over the rationals
    Factorisation,
    /// Newton iteration from a fixed initial guess
    Newton,
}

impl MethodLabel {
    /// All labels, in a stable order used for deterministic vote tie-breaks
    pub const ALL: [MethodLabel; 4] = [
        MethodLabel::Quadratique,
        MethodLabel::Racines,
        MethodLabel::Factorisation,
        MethodLabel::Newton,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MethodLabel::Quadratique => "Quadratique",
            MethodLabel::Racines => "Racines",
            MethodLabel::Factorisation => "Factorisation",
            MethodLabel::Newton => "Newton",
        }
    }
}

impl fmt::Display for MethodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MethodLabel {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Quadratique" => Ok(MethodLabel::Quadratique),
            "Racines" => Ok(MethodLabel::Racines),
            "Factorisation" => Ok(MethodLabel::Factorisation),
            "Newton" => Ok(MethodLabel::Newton),
            other => Err(QuizError::UnsupportedMethod {
                label: other.to_string(),
            }),
        }
    }
}

/// Capability interface consumed by the engine.
///
/// Implementations must be pure per call; the engine shares one instance
/// immutably across requests.
pub trait MethodClassifier: Send + Sync {
    /// Feature-vector dimensionality the model was trained on
    fn input_dim(&self) -> usize;

    /// Map a feature vector to a method label.
    ///
    /// # Errors
    /// `DimensionMismatch` when the vector length differs from
    /// `input_dim()`.
    fn predict(&self, features: &FeatureVector) -> Result<MethodLabel, QuizError>;
}

/// Shared length check for implementations
fn check_dim(expected: usize, features: &FeatureVector) -> Result<(), QuizError> {
    if features.len() != expected {
        return Err(QuizError::DimensionMismatch {
            expected,
            actual: features.len(),
        });
    }
    Ok(())
}

// =============================================================================
// RULE-BASED CLASSIFIER
// =============================================================================

/// Rule-based substitute reproducing the labeling rule the ensemble was
/// trained against: degree <= 2 -> Quadratique, degree == 3 -> Racines,
/// degree >= 4 -> Factorisation.
///
/// Default classifier for the out-of-the-box engine, so the pipeline works
/// without an external artifact.
#[derive(Debug, Clone)]
pub struct DegreeRuleClassifier {
    input_dim: usize,
}

impl DegreeRuleClassifier {
    pub fn new(input_dim: usize) -> Self {
        DegreeRuleClassifier { input_dim }
    }
}

impl MethodClassifier for DegreeRuleClassifier {
    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn predict(&self, features: &FeatureVector) -> Result<MethodLabel, QuizError> {
        check_dim(self.input_dim, features)?;

        // The degree feature sits right after the coefficient slots
        let degree = features.values()[self.input_dim - 3];
        Ok(if degree <= 2.0 {
            MethodLabel::Quadratique
        } else if degree == 3.0 {
            MethodLabel::Racines
        } else {
            MethodLabel::Factorisation
        })
    }
}

// =============================================================================
// DECISION-TREE ENSEMBLE
// =============================================================================

/// A node of a serialized decision tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Branch: go left when `features[feature] <= threshold`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Terminal label
    Leaf(MethodLabel),
}

/// One decision tree, nodes stored flat with index 0 as the root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Walk the tree; node indices are validated at load time
    fn predict(&self, values: &[f64]) -> MethodLabel {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf(label) => return *label,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if values[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

/// Majority-vote ensemble of decision trees, deserialized from the JSON
/// artifact the offline training step exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestClassifier {
    input_dim: usize,
    trees: Vec<DecisionTree>,
}

impl ForestClassifier {
    /// Load an artifact from a reader and validate its internal structure
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, QuizError> {
        let forest: ForestClassifier =
            serde_json::from_reader(BufReader::new(reader)).map_err(|e| {
                QuizError::InvalidModel {
                    msg: e.to_string(),
                }
            })?;
        forest.validate()?;
        Ok(forest)
    }

    /// Load an artifact from a JSON string
    pub fn from_json(json: &str) -> Result<Self, QuizError> {
        let forest: ForestClassifier =
            serde_json::from_str(json).map_err(|e| QuizError::InvalidModel {
                msg: e.to_string(),
            })?;
        forest.validate()?;
        Ok(forest)
    }

    /// Load an artifact from a file path
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, QuizError> {
        let file = File::open(path.as_ref()).map_err(|e| QuizError::InvalidModel {
            msg: format!("{}: {}", path.as_ref().display(), e),
        })?;
        Self::from_reader(file)
    }

    /// Structural validation so `predict` can walk trees without checks
    fn validate(&self) -> Result<(), QuizError> {
        if self.trees.is_empty() {
            return Err(QuizError::InvalidModel {
                msg: "forest has no trees".to_string(),
            });
        }
        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(QuizError::InvalidModel {
                    msg: format!("tree {} has no nodes", t),
                });
            }
            for (n, node) in tree.nodes.iter().enumerate() {
                if let TreeNode::Split {
                    feature,
                    left,
                    right,
                    ..
                } = node
                {
                    if *feature >= self.input_dim {
                        return Err(QuizError::InvalidModel {
                            msg: format!(
                                "tree {} node {} splits on feature {} (input_dim {})",
                                t, n, feature, self.input_dim
                            ),
                        });
                    }
                    // Children must point forward to rule out cycles
                    if *left <= n || *right <= n || *left >= tree.nodes.len()
                        || *right >= tree.nodes.len()
                    {
                        return Err(QuizError::InvalidModel {
                            msg: format!("tree {} node {} has invalid children", t, n),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

impl MethodClassifier for ForestClassifier {
    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn predict(&self, features: &FeatureVector) -> Result<MethodLabel, QuizError> {
        check_dim(self.input_dim, features)?;

        let mut votes: FxHashMap<MethodLabel, usize> = FxHashMap::default();
        for tree in &self.trees {
            *votes.entry(tree.predict(features.values())).or_insert(0) += 1;
        }

        // Deterministic tie-break: stable label order
        let winner = MethodLabel::ALL
            .iter()
            .copied()
            .max_by_key(|label| votes.get(label).copied().unwrap_or(0))
            .unwrap_or(MethodLabel::Quadratique);
        Ok(winner)
    }
}
