//! Multi-model weighted ensemble scoring for the developmental screening questionnaire.
//!
//! Answers flow through a fixed pipeline: each classifier unit vectorizes the answers against its
//! own feature contract and predicts, votes are combined per category by historical performance
//! weight, flagged categories are explained by the answers that deviate from the expected healthy
//! pattern, and everything is assembled into an [`EvaluationReport`].

pub mod aggregate;
pub mod catalogue;
pub mod classifier;
pub mod domain;
mod engine;
pub mod explain;
pub mod loader;
pub mod questions;
pub mod report;
pub mod router;
pub mod vectorizer;

#[cfg(test)]
mod tests;

pub use aggregate::{weighted_score, CategoryScore, UnitVote, RISK_THRESHOLD};
pub use catalogue::{
    CatalogueError, CatalogueSummary, ClassifierCatalogue, ClassifierUnit, ScreeningCatalogue,
};
pub use classifier::{
    Classifier, ClassifierError, ConstantModel, DecisionForest, LogisticModel, ModelArtifact,
    Prediction, Stump, StumpEnsemble, TreeNode,
};
pub use domain::{AnswerSet, Category, Question, QuestionId, UnitId};
pub use engine::{evaluate, ScreeningEngine};
pub use explain::SkillGap;
pub use loader::CatalogueLoader;
pub use questions::{QuestionCatalogue, QuestionCatalogueError};
pub use report::{CategoryVerdict, EvaluationReport, UnitWarning};
pub use router::{screening_router, EvaluateRequest};
