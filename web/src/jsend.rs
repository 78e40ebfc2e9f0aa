//! `JSend` response envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Envelope status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The request succeeded.
    Success,
    /// The request was rejected because of the client's input.
    Fail,
    /// The server failed to process a valid request.
    Error,
}

/// Wire form of the envelope.
#[derive(Debug, Serialize)]
pub(crate) struct Envelope<T> {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Successful `JSend` response.
///
/// ```
/// use audio_guide_web::JSend;
/// use axum::http::StatusCode;
///
/// let created = JSend::created(42);
/// assert_eq!(created.status(), StatusCode::CREATED);
/// ```
#[derive(Debug)]
pub struct JSend<T> {
    status: StatusCode,
    data: Option<T>,
}

impl<T: Serialize> JSend<T> {
    /// 200 with data.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            data: Some(data),
        }
    }

    /// 201 with data.
    #[must_use]
    pub const fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            data: Some(data),
        }
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl JSend<()> {
    /// 200 without data.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            status: StatusCode::OK,
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for JSend<T> {
    fn into_response(self) -> Response {
        let body = Envelope {
            status: Status::Success,
            data: self.data,
            message: None,
        };

        (self.status, Json(body)).into_response()
    }
}
