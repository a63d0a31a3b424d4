use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use super::domain::AnswerSet;
use super::engine::ScreeningEngine;
use super::questions::QuestionCatalogue;
use crate::error::AppError;

/// Body of an evaluation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateRequest {
    pub answers: AnswerSet,
}

/// Router exposing the question battery and the evaluation endpoint.
pub fn screening_router(engine: Arc<ScreeningEngine>) -> Router {
    Router::new()
        .route("/api/v1/screening/questions", get(questions_handler))
        .route("/api/v1/screening/evaluate", post(evaluate_handler))
        .with_state(engine)
}

pub(crate) async fn questions_handler(State(engine): State<Arc<ScreeningEngine>>) -> Response {
    let questions: &QuestionCatalogue = engine.catalogue().questions();
    (StatusCode::OK, axum::Json(questions)).into_response()
}

pub(crate) async fn evaluate_handler(
    State(engine): State<Arc<ScreeningEngine>>,
    axum::Json(request): axum::Json<EvaluateRequest>,
) -> Response {
    let unknown = engine.unknown_questions(&request.answers);
    if !unknown.is_empty() {
        return AppError::UnknownQuestions(unknown).into_response();
    }

    let answers = request.answers;
    match tokio::task::spawn_blocking(move || engine.evaluate(&answers)).await {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(err) => AppError::Evaluation(err).into_response(),
    }
}
