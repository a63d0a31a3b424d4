use serde::{Deserialize, Serialize};

use super::{check_dimension, Classifier, ClassifierError, Prediction};

/// One weak learner: votes "at risk" when the answer at `feature` equals `risk_when`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stump {
    pub feature: usize,
    pub risk_when: bool,
    pub alpha: f64,
}

/// Boosted decision stumps. Exposes a label only, no calibrated probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StumpEnsemble {
    pub dimension: usize,
    pub stumps: Vec<Stump>,
}

impl Classifier for StumpEnsemble {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn predict(&self, features: &[f64]) -> Result<Prediction, ClassifierError> {
        check_dimension(self.dimension, features)?;
        if self.stumps.is_empty() {
            return Err(ClassifierError::Corrupt("ensemble has no stumps".to_string()));
        }

        let mut margin = 0.0;
        for stump in &self.stumps {
            let value = features.get(stump.feature).ok_or_else(|| {
                ClassifierError::Corrupt(format!(
                    "stump references feature {} of {}",
                    stump.feature, self.dimension
                ))
            })?;
            if !stump.alpha.is_finite() {
                return Err(ClassifierError::Corrupt(format!(
                    "stump on feature {} has non-finite alpha",
                    stump.feature
                )));
            }

            let answered_yes = *value != 0.0;
            if answered_yes == stump.risk_when {
                margin += stump.alpha;
            } else {
                margin -= stump.alpha;
            }
        }

        Ok(Prediction::label(margin > 0.0))
    }
}
