use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a questionnaire item, e.g. `Q42`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub String);

/// Developmental skill or disorder a classifier votes for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(pub String);

/// Identifier of a single trained classifier within the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(QuestionId);
string_id!(Category);
string_id!(UnitId);

/// Reference data for a single yes/no question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    /// Answer a typically developing child is expected to give.
    pub expected: bool,
    pub categories: Vec<Category>,
}

impl Question {
    pub fn is_tagged(&self, category: &Category) -> bool {
        self.categories.iter().any(|tag| tag == category)
    }
}

/// Caregiver answers keyed by question. Not required to be exhaustive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<QuestionId, bool>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, question: impl Into<QuestionId>, answer: bool) -> Option<bool> {
        self.0.insert(question.into(), answer)
    }

    pub fn with(mut self, question: impl Into<QuestionId>, answer: bool) -> Self {
        self.insert(question, answer);
        self
    }

    pub fn get(&self, question: &QuestionId) -> Option<bool> {
        self.0.get(question).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, bool)> {
        self.0.iter().map(|(id, answer)| (id, *answer))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for QuestionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<Q: Into<QuestionId>> FromIterator<(Q, bool)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (Q, bool)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(question, answer)| (question.into(), answer))
                .collect(),
        )
    }
}
