use serde::{Deserialize, Serialize};

use super::{check_dimension, Classifier, ClassifierError, Prediction};

/// Binary decision tree node over yes/no answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        yes: Box<TreeNode>,
        no: Box<TreeNode>,
    },
    Leaf {
        at_risk: bool,
    },
}

impl TreeNode {
    fn vote(&self, features: &[f64]) -> Result<bool, ClassifierError> {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { at_risk } => return Ok(*at_risk),
                TreeNode::Split { feature, yes, no } => {
                    let value = features.get(*feature).ok_or_else(|| {
                        ClassifierError::Corrupt(format!(
                            "tree splits on feature {feature} of {}",
                            features.len()
                        ))
                    })?;
                    node = if *value != 0.0 { yes.as_ref() } else { no.as_ref() };
                }
            }
        }
    }
}

/// Forest of voting trees; the at-risk probability is the share of trees voting at risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionForest {
    pub dimension: usize,
    pub trees: Vec<TreeNode>,
}

impl Classifier for DecisionForest {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn predict(&self, features: &[f64]) -> Result<Prediction, ClassifierError> {
        check_dimension(self.dimension, features)?;
        if self.trees.is_empty() {
            return Err(ClassifierError::Corrupt("forest has no trees".to_string()));
        }

        let mut risk_votes = 0usize;
        for tree in &self.trees {
            if tree.vote(features)? {
                risk_votes += 1;
            }
        }

        let risk = risk_votes as f64 / self.trees.len() as f64;
        Prediction::with_risk_probability(risk).validate()
    }
}
