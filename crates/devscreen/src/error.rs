use crate::config::ConfigError;
use crate::screening::{CatalogueError, QuestionId};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Catalogue(CatalogueError),
    Answers(serde_json::Error),
    UnknownQuestions(Vec<QuestionId>),
    Evaluation(tokio::task::JoinError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Catalogue(err) => write!(f, "catalogue error: {}", err),
            AppError::Answers(err) => write!(f, "invalid answer set: {}", err),
            AppError::Evaluation(err) => write!(f, "evaluation did not complete: {}", err),
            AppError::UnknownQuestions(ids) => {
                let ids: Vec<&str> = ids.iter().map(QuestionId::as_str).collect();
                write!(
                    f,
                    "answers reference questions outside the battery: {}",
                    ids.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Catalogue(err) => Some(err),
            AppError::Answers(err) => Some(err),
            AppError::Evaluation(err) => Some(err),
            AppError::UnknownQuestions(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::UnknownQuestions(ids) = &self {
            let body = Json(json!({
                "error": self.to_string(),
                "unknown_questions": ids,
            }));
            return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
        }

        let status = match self {
            AppError::Answers(_) => StatusCode::BAD_REQUEST,
            AppError::UnknownQuestions(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Catalogue(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Evaluation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<CatalogueError> for AppError {
    fn from(value: CatalogueError) -> Self {
        Self::Catalogue(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Answers(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_questions_are_listed_in_the_message() {
        let err = AppError::UnknownQuestions(vec![QuestionId::from("Q40"), QuestionId::from("Q41")]);
        assert_eq!(
            err.to_string(),
            "answers reference questions outside the battery: Q40, Q41"
        );
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn interrupted_evaluations_map_to_internal_error() {
        let join_error = tokio::spawn(async { panic!("worker lost") })
            .await
            .expect_err("task panics");
        let err = AppError::Evaluation(join_error);
        assert!(err.to_string().starts_with("evaluation did not complete"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn catalogue_failures_map_to_service_unavailable() {
        let err = AppError::from(CatalogueError::NoUnits);
        assert!(err.to_string().starts_with("catalogue error"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
