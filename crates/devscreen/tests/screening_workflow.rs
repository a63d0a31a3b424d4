//! End-to-end scenarios against the bundled question sheet, performance table and model
//! artifacts under `data/`, driven only through the public catalogue loader and engine.

mod common {
    use devscreen::screening::{AnswerSet, CatalogueLoader, ScreeningEngine};

    pub(super) const DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data");

    pub(super) fn engine() -> ScreeningEngine {
        let catalogue = CatalogueLoader::from_data_dir(DATA_DIR)
            .load()
            .expect("bundled catalogue loads");
        ScreeningEngine::new(catalogue)
    }

    /// Every question answered with its expected healthy answer.
    pub(super) fn healthy(engine: &ScreeningEngine) -> AnswerSet {
        engine
            .catalogue()
            .questions()
            .questions()
            .iter()
            .map(|question| (question.id.clone(), question.expected))
            .collect()
    }

    /// Every question answered against its expected healthy answer.
    pub(super) fn inverted(engine: &ScreeningEngine) -> AnswerSet {
        engine
            .catalogue()
            .questions()
            .questions()
            .iter()
            .map(|question| (question.id.clone(), !question.expected))
            .collect()
    }

    pub(super) fn ids(verdict_ids: &[devscreen::screening::QuestionId]) -> Vec<&str> {
        verdict_ids.iter().map(|id| id.as_str()).collect()
    }
}

use common::*;
use devscreen::screening::{Category, EvaluateRequest};

#[test]
fn bundled_catalogue_declares_four_categories() {
    let engine = engine();
    let summary = engine.catalogue().summary();

    assert_eq!(summary.questions, 12);
    assert_eq!(summary.units, 9);
    let categories: Vec<&str> = summary.categories.iter().map(Category::as_str).collect();
    assert_eq!(categories, vec!["Motor", "Language", "Social", "Autism"]);
}

#[test]
fn healthy_answers_raise_no_risk() {
    let engine = engine();
    let report = engine.evaluate(&healthy(&engine));

    assert!(!report.any_risk);
    assert_eq!(report.verdicts.len(), 4);
    assert!(report.omitted_categories.is_empty());
    assert!(report.warnings.is_empty());
    assert!(report.skill_gaps.is_empty());
    for verdict in &report.verdicts {
        assert!(
            verdict.risk_probability < 0.5,
            "{} scored {}",
            verdict.category,
            verdict.risk_probability
        );
        assert!(verdict.implicated_questions.is_empty());
    }
}

#[test]
fn inverted_answers_flag_every_category_with_explanations() {
    let engine = engine();
    let report = engine.evaluate(&inverted(&engine));

    assert!(report.any_risk);
    assert_eq!(report.flagged().count(), 4);

    let motor = report.verdict(&Category::from("Motor")).expect("motor verdict");
    assert_eq!(
        ids(&motor.implicated_questions),
        vec!["Q1", "Q6", "Q10", "Q12", "Q8"]
    );

    let autism = report.verdict(&Category::from("Autism")).expect("autism verdict");
    assert_eq!(
        ids(&autism.implicated_questions),
        vec!["Q3", "Q4", "Q7", "Q11", "Q8", "Q2"]
    );
    assert_eq!(autism.contributing_units.len(), 3);

    let gaps: Vec<&str> = report
        .skill_gaps
        .iter()
        .map(|gap| gap.category.as_str())
        .collect();
    assert_eq!(
        gaps,
        vec![
            "Social",
            "Sensory",
            "Motor",
            "Language",
            "Joint Attention",
            "Communication"
        ]
    );
}

#[test]
fn motor_deviations_flag_only_motor() {
    let engine = engine();
    let mut answers = healthy(&engine);
    for question in ["Q1", "Q6", "Q10", "Q12"] {
        answers.insert(question, false);
    }
    answers.insert("Q8", true);

    let report = engine.evaluate(&answers);
    let flagged: Vec<&str> = report
        .flagged()
        .map(|verdict| verdict.category.as_str())
        .collect();
    assert_eq!(flagged, vec!["Motor"]);
}

#[test]
fn empty_answer_set_still_produces_every_category() {
    let engine = engine();
    let report = engine.evaluate(&Default::default());

    assert_eq!(report.verdicts.len(), 4);
    for verdict in &report.verdicts {
        assert!(verdict.implicated_questions.is_empty());
    }
    assert!(report.skill_gaps.is_empty());
}

#[test]
fn request_payloads_use_plain_answer_maps() {
    let engine = engine();
    let request: EvaluateRequest = serde_json::from_str(
        r#"{ "answers": { "Q1": true, "Q2": false, "Q4": true, "Q9": true } }"#,
    )
    .expect("request parses");

    assert!(engine.unknown_questions(&request.answers).is_empty());
    let first = serde_json::to_value(engine.evaluate(&request.answers)).expect("serialize");
    let second = serde_json::to_value(engine.evaluate(&request.answers)).expect("serialize");
    assert_eq!(first, second);
}
