use super::domain::{AnswerSet, QuestionId};

/// Numeric input for one unit plus the questions that fell back to the "no" default.
#[derive(Debug, Clone, PartialEq)]
pub struct Vectorized {
    pub values: Vec<f64>,
    pub defaulted: Vec<QuestionId>,
}

/// Map answers onto an ordered feature list: yes is 1.0, no or unanswered is 0.0.
pub fn vectorize(answers: &AnswerSet, features: &[QuestionId]) -> Vectorized {
    let mut defaulted = Vec::new();
    let values = features
        .iter()
        .map(|question| match answers.get(question) {
            Some(true) => 1.0,
            Some(false) => 0.0,
            None => {
                defaulted.push(question.clone());
                0.0
            }
        })
        .collect();

    Vectorized { values, defaulted }
}
