//! Prediction interface shared by every trained model kind, plus the serialized artifact format.
//!
//! Artifacts are JSON documents tagged by `kind`. Each kind declares the dimensionality it was
//! trained with so the catalogue can reject a feature contract of the wrong length before any
//! evaluation runs.

mod forest;
mod logistic;
mod stumps;

pub use forest::{DecisionForest, TreeNode};
pub use logistic::LogisticModel;
pub use stumps::{Stump, StumpEnsemble};

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Tolerance applied when checking that a probability pair sums to one.
const PROBABILITY_SUM_TOLERANCE: f64 = 1e-6;

/// A trained binary classifier over a fixed-length feature vector.
pub trait Classifier: Send + Sync + fmt::Debug {
    /// Number of features the model was trained with.
    fn dimension(&self) -> usize;

    /// Predict for exactly one vector of length [`Classifier::dimension`].
    fn predict(&self, features: &[f64]) -> Result<Prediction, ClassifierError>;
}

/// Raw model output: a label and, when supported, `[not_at_risk, at_risk]` probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub at_risk: bool,
    pub probabilities: Option<[f64; 2]>,
}

impl Prediction {
    pub fn label(at_risk: bool) -> Self {
        Self {
            at_risk,
            probabilities: None,
        }
    }

    pub fn with_risk_probability(risk: f64) -> Self {
        Self {
            at_risk: risk >= 0.5,
            probabilities: Some([1.0 - risk, risk]),
        }
    }

    /// Probability of the at-risk class. Label-only models degrade to 0.0 or 1.0.
    pub fn risk_probability(&self) -> f64 {
        match self.probabilities {
            Some([_, risk]) => risk,
            None if self.at_risk => 1.0,
            None => 0.0,
        }
    }

    /// Reject probability pairs that are non-finite, out of range, or do not sum to one.
    pub fn validate(self) -> Result<Self, ClassifierError> {
        if let Some([healthy, risk]) = self.probabilities {
            let in_range = |p: f64| p.is_finite() && (0.0..=1.0).contains(&p);
            if !in_range(healthy)
                || !in_range(risk)
                || (healthy + risk - 1.0).abs() > PROBABILITY_SUM_TOLERANCE
            {
                return Err(ClassifierError::MalformedOutput(format!(
                    "probability pair [{healthy}, {risk}] is not a distribution"
                )));
            }
        }
        Ok(self)
    }
}

/// Failure raised while invoking a single model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    #[error("expected {expected} features, received {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("model output is malformed: {0}")]
    MalformedOutput(String),
    #[error("model parameters are corrupt: {0}")]
    Corrupt(String),
    #[error("model panicked: {0}")]
    Panicked(String),
}

pub(crate) fn check_dimension(expected: usize, features: &[f64]) -> Result<(), ClassifierError> {
    if features.len() == expected {
        Ok(())
    } else {
        Err(ClassifierError::DimensionMismatch {
            expected,
            actual: features.len(),
        })
    }
}

/// Baseline model that always reports the same at-risk probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantModel {
    pub dimension: usize,
    pub risk_probability: f64,
}

impl Classifier for ConstantModel {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn predict(&self, features: &[f64]) -> Result<Prediction, ClassifierError> {
        check_dimension(self.dimension, features)?;
        Prediction::with_risk_probability(self.risk_probability).validate()
    }
}

/// Serialized model parameters as stored under the models directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Logistic(LogisticModel),
    BoostedStumps(StumpEnsemble),
    Forest(DecisionForest),
    Constant(ConstantModel),
}

impl ModelArtifact {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn into_classifier(self) -> Arc<dyn Classifier> {
        match self {
            ModelArtifact::Logistic(model) => Arc::new(model),
            ModelArtifact::BoostedStumps(model) => Arc::new(model),
            ModelArtifact::Forest(model) => Arc::new(model),
            ModelArtifact::Constant(model) => Arc::new(model),
        }
    }
}
