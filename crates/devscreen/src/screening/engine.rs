use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, warn};

use super::aggregate::{weighted_score, UnitVote};
use super::catalogue::{ClassifierUnit, ScreeningCatalogue, UnitInvocation};
use super::domain::{AnswerSet, QuestionId};
use super::explain::{implicated_questions, skill_gaps};
use super::report::{CategoryVerdict, EvaluationReport, UnitWarning};

/// Score one answer set against the catalogue.
///
/// Pure with respect to its inputs: units are invoked in parallel, but results are joined in
/// declaration order so identical inputs always produce an identical report.
pub fn evaluate(answers: &AnswerSet, catalogue: &ScreeningCatalogue) -> EvaluationReport {
    let units = catalogue.classifiers().units();
    let invocations: Vec<UnitInvocation> = units
        .par_iter()
        .map(|unit| unit.invoke(answers))
        .collect();

    let mut warnings = Vec::new();
    let mut votes: Vec<Option<UnitVote>> = Vec::with_capacity(units.len());
    for (unit, invocation) in units.iter().zip(invocations) {
        if !invocation.defaulted.is_empty() {
            debug!(
                unit = %unit.id(),
                defaulted = ?invocation.defaulted,
                "unanswered questions vectorized as no"
            );
        }

        match invocation.prediction {
            Ok(prediction) => votes.push(Some(UnitVote {
                unit: unit.id().clone(),
                probability: prediction.risk_probability(),
                weight: unit.weight(),
            })),
            Err(err) => {
                warn!(
                    unit = %unit.id(),
                    category = %unit.category(),
                    algorithm = unit.algorithm(),
                    error = %err,
                    "classifier unit skipped"
                );
                warnings.push(UnitWarning {
                    unit: unit.id().clone(),
                    category: unit.category().clone(),
                    reason: err.to_string(),
                });
                votes.push(None);
            }
        }
    }

    let mut verdicts = Vec::new();
    let mut omitted = Vec::new();
    for category in catalogue.classifiers().categories() {
        let contributing: Vec<(&ClassifierUnit, &UnitVote)> = units
            .iter()
            .zip(&votes)
            .filter(|(unit, _)| unit.category() == category)
            .filter_map(|(unit, vote)| vote.as_ref().map(|vote| (unit, vote)))
            .collect();

        let category_votes: Vec<UnitVote> =
            contributing.iter().map(|(_, vote)| (*vote).clone()).collect();
        let Some(score) = weighted_score(&category_votes) else {
            warn!(%category, "no classifier produced a prediction; category omitted");
            omitted.push(category.clone());
            continue;
        };

        let implicated = if score.at_risk {
            let features = contributing
                .iter()
                .flat_map(|(unit, _)| unit.features().iter());
            implicated_questions(features, answers, catalogue.questions())
        } else {
            Vec::<QuestionId>::new()
        };

        verdicts.push(CategoryVerdict {
            category: category.clone(),
            risk_probability: score.score,
            at_risk: score.at_risk,
            implicated_questions: implicated,
            contributing_units: category_votes.into_iter().map(|vote| vote.unit).collect(),
        });
    }

    let gaps = skill_gaps(answers, catalogue.questions());
    EvaluationReport::assemble(verdicts, omitted, warnings, gaps)
}

/// Shared, read-only handle used by the service layer across concurrent requests.
#[derive(Debug, Clone)]
pub struct ScreeningEngine {
    catalogue: Arc<ScreeningCatalogue>,
}

impl ScreeningEngine {
    pub fn new(catalogue: ScreeningCatalogue) -> Self {
        Self {
            catalogue: Arc::new(catalogue),
        }
    }

    pub fn catalogue(&self) -> &ScreeningCatalogue {
        &self.catalogue
    }

    pub fn evaluate(&self, answers: &AnswerSet) -> EvaluationReport {
        evaluate(answers, &self.catalogue)
    }

    /// Answer ids that do not exist in the question catalogue.
    pub fn unknown_questions(&self, answers: &AnswerSet) -> Vec<QuestionId> {
        answers
            .iter()
            .map(|(id, _)| id)
            .filter(|id| !self.catalogue.questions().contains(id))
            .cloned()
            .collect()
    }
}
