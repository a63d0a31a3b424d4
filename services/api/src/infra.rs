use devscreen::config::{AppConfig, CatalogueConfig};
use devscreen::error::AppError;
use devscreen::screening::{AnswerSet, CatalogueLoader, EvaluateRequest, ScreeningEngine};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Answer files may hold either a request body or the bare id-to-answer map.
#[derive(Deserialize)]
#[serde(untagged)]
enum AnswerDocument {
    Request(EvaluateRequest),
    Plain(AnswerSet),
}

/// Catalogue locations from the environment, with an optional data directory override.
pub(crate) fn catalogue_config(data_dir: Option<PathBuf>) -> Result<CatalogueConfig, AppError> {
    match data_dir {
        Some(dir) => Ok(CatalogueConfig::from_data_dir(dir)),
        None => Ok(AppConfig::load()?.catalogue),
    }
}

pub(crate) fn load_engine(config: CatalogueConfig) -> Result<Arc<ScreeningEngine>, AppError> {
    let catalogue = CatalogueLoader::new(config).load()?;
    Ok(Arc::new(ScreeningEngine::new(catalogue)))
}

pub(crate) fn parse_answers(raw: &str) -> Result<AnswerSet, AppError> {
    let answers = match serde_json::from_str::<AnswerDocument>(raw)? {
        AnswerDocument::Request(request) => request.answers,
        AnswerDocument::Plain(answers) => answers,
    };
    Ok(answers)
}

pub(crate) fn read_answers(path: &Path) -> Result<AnswerSet, AppError> {
    let raw = std::fs::read_to_string(path)?;
    parse_answers(&raw)
}

/// Reject answer sets that name questions the catalogue does not know.
pub(crate) fn ensure_known(engine: &ScreeningEngine, answers: &AnswerSet) -> Result<(), AppError> {
    let unknown = engine.unknown_questions(answers);
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(AppError::UnknownQuestions(unknown))
    }
}

#[cfg(test)]
pub(crate) fn bundled_engine() -> Arc<ScreeningEngine> {
    let data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data");
    load_engine(CatalogueConfig::from_data_dir(data_dir)).expect("bundled catalogue loads")
}

#[cfg(test)]
mod tests {
    use super::*;
    use devscreen::screening::QuestionId;

    #[test]
    fn answer_files_accept_both_layouts() {
        let wrapped = parse_answers(r#"{ "answers": { "Q1": true, "Q2": false } }"#)
            .expect("wrapped answers parse");
        let plain = parse_answers(r#"{ "Q1": true, "Q2": false }"#).expect("plain answers parse");

        assert_eq!(wrapped, plain);
        assert_eq!(plain.get(&QuestionId::from("Q2")), Some(false));
    }

    #[test]
    fn non_boolean_answers_are_rejected() {
        let err = parse_answers(r#"{ "Q1": "often" }"#).expect_err("text answer");
        assert!(matches!(err, AppError::Answers(_)));
    }

    #[test]
    fn unknown_questions_are_reported_before_scoring() {
        let engine = bundled_engine();
        let answers = AnswerSet::new().with("Q1", true).with("Q404", false);

        match ensure_known(&engine, &answers) {
            Err(AppError::UnknownQuestions(ids)) => assert_eq!(ids, vec![QuestionId::from("Q404")]),
            other => panic!("expected unknown questions, got {other:?}"),
        }
        assert!(ensure_known(&engine, &AnswerSet::new().with("Q1", true)).is_ok());
    }

    #[test]
    fn missing_data_directory_fails_to_load() {
        let err = load_engine(CatalogueConfig::from_data_dir("does-not-exist"))
            .expect_err("no catalogue files");
        assert!(matches!(err, AppError::Catalogue(_)));
    }
}
