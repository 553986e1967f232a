use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use promptsd_core::{CoreError, ResolveError};
use serde_json::json;
use std::fmt;
use tracing::{error, warn};

pub type AppResult<T> = Result<T, AppError>;

/// Error returned by route handlers, rendered as `{ "error": message }`
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<ResolveError> for AppError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::InvalidReference | ResolveError::UnresolvableReference => {
                Self::bad_request(err.to_string())
            }
            ResolveError::InFlight => Self::conflict(err.to_string()),
            ResolveError::ResolutionFailed { reason } => {
                // Upstream detail stays in the log
                warn!("Resolution failed: {reason}");
                Self::internal("Failed to resolve URL")
            }
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        error!("Content source error: {err}");
        Self::internal("Failed to load content")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_error_statuses() {
        let cases = [
            (ResolveError::InvalidReference, StatusCode::BAD_REQUEST, "Invalid Suno URL"),
            (
                ResolveError::UnresolvableReference,
                StatusCode::BAD_REQUEST,
                "Could not resolve song ID",
            ),
            (
                ResolveError::ResolutionFailed {
                    reason: "dns error".into(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to resolve URL",
            ),
            (ResolveError::InFlight, StatusCode::CONFLICT, "A resolution for this URL is already in progress"),
        ];

        for (err, status, message) in cases {
            let app = AppError::from(err);
            assert_eq!(app.status, status);
            assert_eq!(app.message, message);
        }
    }

    #[test]
    fn test_core_errors_hide_detail() {
        let app = AppError::from(CoreError::DataSource {
            source_name: "supabase".into(),
            reason: "Supabase returned status: 401".into(),
        });
        assert_eq!(app.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(app.message, "Failed to load content");
    }
}
