use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
///
/// Feature modules translate underlying failures into one of these variants with a
/// user-readable message. Implements `IntoResponse` so the actions service can
/// return `Result<T, AppError>` directly.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request failed, timed out, or the backend answered with a non-success status.
    #[error("{message}")]
    Network {
        message: String,
        status: Option<u16>,
    },

    /// The completion API or the backend returned an unexpected shape.
    #[error("{0}")]
    Parse(String),

    /// A required form field is missing or malformed.
    #[error("{0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("{0}")]
    Llm(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn network(message: impl Into<String>) -> Self {
        AppError::Network {
            message: message.into(),
            status: None,
        }
    }

    /// Re-labels a failure with a generic message while keeping its kind.
    ///
    /// Validation and authorization failures keep their own message since it is
    /// already meant for the user.
    pub fn context(self, message: &str) -> Self {
        match self {
            AppError::Network { status, .. } => match status {
                Some(401) => AppError::Unauthorized,
                Some(404) => AppError::NotFound(message.to_string()),
                _ => AppError::Network {
                    message: message.to_string(),
                    status,
                },
            },
            AppError::Parse(_) => AppError::Parse(message.to_string()),
            AppError::Llm(_) => AppError::Llm(message.to_string()),
            AppError::Internal(_) => AppError::Internal(anyhow::anyhow!(message.to_string())),
            other => other,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Network { message, status } => {
                tracing::error!("Network error ({status:?}): {message}");
                (StatusCode::BAD_GATEWAY, "NETWORK_ERROR", message.clone())
            }
            AppError::Parse(msg) => {
                tracing::error!("Parse error: {msg}");
                (StatusCode::BAD_GATEWAY, "PARSE_ERROR", msg.clone())
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    msg.clone(),
                )
            }
            AppError::Session(msg) => {
                tracing::error!("Session error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SESSION_ERROR",
                    "A session error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_maps_unauthorized_status() {
        let err = AppError::Network {
            message: "HTTP 401".to_string(),
            status: Some(401),
        };
        assert!(matches!(
            err.context("Failed to fetch resume"),
            AppError::Unauthorized
        ));
    }

    #[test]
    fn test_context_replaces_network_message() {
        let err = AppError::network("connection refused (os error 111)");
        let err = err.context("Failed to fetch cover letters");
        assert_eq!(err.to_string(), "Failed to fetch cover letters");
    }

    #[test]
    fn test_context_keeps_validation_message() {
        let err = AppError::Validation("Please select a resume file".to_string());
        let err = err.context("Failed to analyze resume");
        assert_eq!(err.to_string(), "Please select a resume file");
    }

    #[test]
    fn test_validation_renders_bad_request() {
        let response = AppError::Validation("jobTitle is required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_network_renders_bad_gateway() {
        let response = AppError::network("Failed to fetch cover letter").into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
