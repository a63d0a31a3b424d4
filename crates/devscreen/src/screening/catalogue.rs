use std::collections::HashSet;
use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use super::classifier::{Classifier, ClassifierError, Prediction};
use super::domain::{AnswerSet, Category, QuestionId, UnitId};
use super::questions::{QuestionCatalogue, QuestionCatalogueError};
use super::vectorizer::{vectorize, Vectorized};

/// A trained classifier bound to its feature contract and historical performance weight.
#[derive(Clone)]
pub struct ClassifierUnit {
    id: UnitId,
    category: Category,
    algorithm: String,
    features: Vec<QuestionId>,
    weight: f64,
    model: Arc<dyn Classifier>,
}

impl ClassifierUnit {
    /// Bind a model to its features. The feature list must match the model's trained dimension.
    pub fn new(
        id: UnitId,
        category: Category,
        algorithm: impl Into<String>,
        features: Vec<QuestionId>,
        weight: f64,
        model: Arc<dyn Classifier>,
    ) -> Result<Self, CatalogueError> {
        if features.is_empty() {
            return Err(CatalogueError::EmptyFeatureList { unit: id });
        }
        if features.len() != model.dimension() {
            return Err(CatalogueError::DimensionMismatch {
                unit: id,
                features: features.len(),
                model: model.dimension(),
            });
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(CatalogueError::InvalidWeight { unit: id, weight });
        }

        Ok(Self {
            id,
            category,
            algorithm: algorithm.into(),
            features,
            weight,
            model,
        })
    }

    pub fn id(&self) -> &UnitId {
        &self.id
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn features(&self) -> &[QuestionId] {
        &self.features
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Vectorize the answers against this unit's contract and run the model once.
    ///
    /// A model that panics is reported as [`ClassifierError::Panicked`]; the panic never reaches
    /// the caller.
    pub fn invoke(&self, answers: &AnswerSet) -> UnitInvocation {
        let Vectorized { values, defaulted } = vectorize(answers, &self.features);
        let prediction = catch_unwind(AssertUnwindSafe(|| self.model.predict(&values)))
            .unwrap_or_else(|payload| Err(ClassifierError::Panicked(panic_message(payload))))
            .and_then(Prediction::validate);
        UnitInvocation {
            defaulted,
            prediction,
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

impl fmt::Debug for ClassifierUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierUnit")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("algorithm", &self.algorithm)
            .field("features", &self.features)
            .field("weight", &self.weight)
            .finish_non_exhaustive()
    }
}

/// Result of a single unit invocation, kept alongside the answers that were defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitInvocation {
    pub defaulted: Vec<QuestionId>,
    pub prediction: Result<Prediction, ClassifierError>,
}

/// Every loaded unit, in declaration order, grouped by the category it votes for.
#[derive(Debug, Clone)]
pub struct ClassifierCatalogue {
    units: Vec<ClassifierUnit>,
    categories: Vec<Category>,
}

impl ClassifierCatalogue {
    /// Category order follows the first unit declared for each category.
    pub fn new(units: Vec<ClassifierUnit>) -> Result<Self, CatalogueError> {
        if units.is_empty() {
            return Err(CatalogueError::NoUnits);
        }

        let mut seen = HashSet::with_capacity(units.len());
        let mut categories: Vec<Category> = Vec::new();
        for unit in &units {
            if !seen.insert(unit.id.clone()) {
                return Err(CatalogueError::DuplicateUnit(unit.id.clone()));
            }
            if !categories.contains(&unit.category) {
                categories.push(unit.category.clone());
            }
        }

        Ok(Self { units, categories })
    }

    pub fn units(&self) -> &[ClassifierUnit] {
        &self.units
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }
}

/// Question reference data and classifier units, validated against each other.
#[derive(Debug, Clone)]
pub struct ScreeningCatalogue {
    questions: QuestionCatalogue,
    classifiers: ClassifierCatalogue,
}

impl ScreeningCatalogue {
    /// Every feature of every unit must name a question in the question catalogue.
    pub fn new(
        questions: QuestionCatalogue,
        classifiers: ClassifierCatalogue,
    ) -> Result<Self, CatalogueError> {
        for unit in classifiers.units() {
            if let Some(question) = unit
                .features()
                .iter()
                .find(|question| !questions.contains(question))
            {
                return Err(CatalogueError::UnknownQuestion {
                    unit: unit.id().clone(),
                    question: question.clone(),
                });
            }
        }

        Ok(Self {
            questions,
            classifiers,
        })
    }

    pub fn questions(&self) -> &QuestionCatalogue {
        &self.questions
    }

    pub fn classifiers(&self) -> &ClassifierCatalogue {
        &self.classifiers
    }

    pub fn summary(&self) -> CatalogueSummary {
        CatalogueSummary {
            questions: self.questions.len(),
            units: self.classifiers.units().len(),
            categories: self.classifiers.categories().to_vec(),
        }
    }
}

/// Counts reported once the catalogue is resident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogueSummary {
    pub questions: usize,
    pub units: usize,
    pub categories: Vec<Category>,
}

/// Fatal error raised while constructing the catalogue.
#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid table {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error(transparent)]
    Questions(#[from] QuestionCatalogueError),
    #[error("model artifact '{artifact}' is invalid: {source}")]
    Artifact {
        artifact: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unit '{unit}' references unknown feature set '{feature_set}'")]
    UnknownFeatureSet { unit: UnitId, feature_set: String },
    #[error("feature set '{feature_set}' lists question '{question}' twice")]
    DuplicateFeature {
        feature_set: String,
        question: QuestionId,
    },
    #[error("unit '{unit}' declares no features")]
    EmptyFeatureList { unit: UnitId },
    #[error("unit '{unit}' lists {features} features but its model was trained on {model}")]
    DimensionMismatch {
        unit: UnitId,
        features: usize,
        model: usize,
    },
    #[error("unit '{unit}' has invalid performance weight {weight}")]
    InvalidWeight { unit: UnitId, weight: f64 },
    #[error("unit '{0}' is declared more than once")]
    DuplicateUnit(UnitId),
    #[error("unit '{unit}' uses question '{question}' which is not in the question catalogue")]
    UnknownQuestion { unit: UnitId, question: QuestionId },
    #[error("no classifier units could be loaded")]
    NoUnits,
}
