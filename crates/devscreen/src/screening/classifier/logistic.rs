use serde::{Deserialize, Serialize};

use super::{check_dimension, Classifier, ClassifierError, Prediction};

/// Logistic regression over binary answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl Classifier for LogisticModel {
    fn dimension(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, features: &[f64]) -> Result<Prediction, ClassifierError> {
        check_dimension(self.coefficients.len(), features)?;

        let logit = self
            .coefficients
            .iter()
            .zip(features)
            .fold(self.intercept, |acc, (weight, value)| acc + weight * value);
        if !logit.is_finite() {
            return Err(ClassifierError::Corrupt(format!(
                "logit evaluated to {logit}"
            )));
        }

        let risk = 1.0 / (1.0 + (-logit).exp());
        Prediction::with_risk_probability(risk).validate()
    }
}
