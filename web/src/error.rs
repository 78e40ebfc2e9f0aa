//! Error types for web handlers.
//!
//! [`AppError`] bridges domain errors and HTTP responses. Client errors
//! render as `JSend` `fail`, server errors as `JSend` `error`; internal
//! details are logged and never sent to the client.

use crate::jsend::{Envelope, Status};
use audio_guide_core::GuideError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;

/// Application error type for web handlers.
///
/// # Examples
///
/// ```
/// use audio_guide_web::AppError;
/// use axum::http::StatusCode;
///
/// let err = AppError::forbidden("ticket already activated");
/// assert_eq!(err.status(), StatusCode::FORBIDDEN);
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String) -> Self {
        Self {
            status,
            message,
            source: None,
        }
    }

    /// Attach the underlying error for logging.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// User-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message.into())
    }

    /// Create a 401 Unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message.into())
    }

    /// Create a 403 Forbidden error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message.into())
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(resource: impl fmt::Display, id: impl fmt::Display) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{resource} {id} not found"))
    }

    /// Create a 409 Conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message.into())
    }

    /// Create a 416 Range Not Satisfiable error.
    #[must_use]
    pub fn range_not_satisfiable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::RANGE_NOT_SATISFIABLE, message.into())
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message.into())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    message = %self.message,
                    "Internal server error"
                );
            }

            let body: Envelope<()> = Envelope {
                status: Status::Error,
                data: None,
                message: Some(self.message),
            };
            return (self.status, Json(body)).into_response();
        }

        let body = Envelope {
            status: Status::Fail,
            data: Some(self.message),
            message: None,
        };

        (self.status, Json(body)).into_response()
    }
}

/// Map domain errors onto HTTP statuses.
///
/// Transient collaborator failures become a generic 500; their details go
/// to the log only.
impl From<GuideError> for AppError {
    fn from(err: GuideError) -> Self {
        match err {
            GuideError::Validation(message) => Self::bad_request(message),
            GuideError::Conflict(message) => Self::conflict(message),
            GuideError::NotFound { resource, id } => Self::not_found(resource, id),
            GuideError::RangeNotSatisfiable(message) => Self::range_not_satisfiable(message),
            GuideError::Credential(message) => Self::unauthorized(message),
            err @ (GuideError::Storage(_) | GuideError::Blob(_) | GuideError::Transport(_)) => {
                Self::internal("An internal error occurred").with_source(err.into())
            }
        }
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("An internal error occurred").with_source(err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[400] Invalid input");
    }

    #[test]
    fn test_domain_error_mapping() {
        let cases = [
            (GuideError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (GuideError::Conflict("x".into()), StatusCode::CONFLICT),
            (GuideError::not_found("object", "a1"), StatusCode::NOT_FOUND),
            (
                GuideError::RangeNotSatisfiable("x".into()),
                StatusCode::RANGE_NOT_SATISFIABLE,
            ),
            (GuideError::Credential("x".into()), StatusCode::UNAUTHORIZED),
            (GuideError::Storage("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (GuideError::Blob("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (GuideError::Transport("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[tokio::test]
    async fn test_client_error_renders_fail() {
        let (status, body) = body_json(AppError::forbidden("ticket already activated")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            body,
            serde_json::json!({"status": "fail", "data": "ticket already activated"})
        );
    }

    #[tokio::test]
    async fn test_server_error_hides_details() {
        let err = AppError::from(GuideError::Storage("password=hunter2".into()));
        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert!(!body.to_string().contains("hunter2"));
    }
}
