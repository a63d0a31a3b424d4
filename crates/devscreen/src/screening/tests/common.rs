use std::io::Cursor;
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::screening::classifier::{
    Classifier, ClassifierError, ConstantModel, LogisticModel, Prediction,
};
use crate::screening::{
    AnswerSet, Category, ClassifierCatalogue, ClassifierUnit, QuestionCatalogue, QuestionId,
    ScreeningCatalogue, UnitId,
};

pub(super) const SHEET: &str = "id;text;expected;Social;Motor;Language\n\
Q1;Walks without support;yes;no;yes;no\n\
Q2;Loses words they used to say;no;no;no;yes\n\
Q3;Points to show something interesting;yes;yes;no;yes\n\
Q4;Responds when called by name;yes;yes;no;no\n\
Q5;Uses at least three words;yes;no;no;yes\n\
Q6;Stacks two blocks;yes;no;yes;no\n\
Q9;Imitates clapping or waving;yes;yes;no;no\n";

pub(super) fn questions() -> QuestionCatalogue {
    QuestionCatalogue::from_reader(Cursor::new(SHEET)).expect("fixture sheet parses")
}

pub(super) fn ids(raw: &[&str]) -> Vec<QuestionId> {
    raw.iter().map(|id| QuestionId::from(*id)).collect()
}

/// Answers matching every expected healthy answer in the fixture sheet.
pub(super) fn healthy_answers() -> AnswerSet {
    AnswerSet::new()
        .with("Q1", true)
        .with("Q2", false)
        .with("Q3", true)
        .with("Q4", true)
        .with("Q5", true)
        .with("Q6", true)
        .with("Q9", true)
}

/// Model whose invocation always fails, standing in for a corrupted artifact.
#[derive(Debug)]
pub(super) struct BrokenModel {
    pub(super) dimension: usize,
}

impl Classifier for BrokenModel {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn predict(&self, _features: &[f64]) -> Result<Prediction, ClassifierError> {
        Err(ClassifierError::Corrupt("artifact truncated".to_string()))
    }
}

/// Model with a buggy feature lookup that panics on every invocation.
#[derive(Debug)]
pub(super) struct PanickingModel {
    pub(super) dimension: usize,
}

impl Classifier for PanickingModel {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn predict(&self, features: &[f64]) -> Result<Prediction, ClassifierError> {
        let value = features[self.dimension + 4];
        Ok(Prediction::label(value != 0.0))
    }
}

pub(super) fn panicking(dimension: usize) -> Arc<dyn Classifier> {
    Arc::new(PanickingModel { dimension })
}

pub(super) fn constant(dimension: usize, risk_probability: f64) -> Arc<dyn Classifier> {
    Arc::new(ConstantModel {
        dimension,
        risk_probability,
    })
}

pub(super) fn broken(dimension: usize) -> Arc<dyn Classifier> {
    Arc::new(BrokenModel { dimension })
}

pub(super) fn logistic(coefficients: Vec<f64>, intercept: f64) -> Arc<dyn Classifier> {
    Arc::new(LogisticModel {
        coefficients,
        intercept,
    })
}

pub(super) fn unit(
    id: &str,
    category: &str,
    features: &[&str],
    weight: f64,
    model: Arc<dyn Classifier>,
) -> ClassifierUnit {
    ClassifierUnit::new(
        UnitId::from(id),
        Category::from(category),
        "Fixture",
        ids(features),
        weight,
        model,
    )
    .expect("fixture unit is valid")
}

pub(super) fn catalogue(units: Vec<ClassifierUnit>) -> ScreeningCatalogue {
    let classifiers = ClassifierCatalogue::new(units).expect("fixture catalogue builds");
    ScreeningCatalogue::new(questions(), classifiers).expect("fixture features are known")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
