//! Axum plumbing for the audio guide HTTP surface.
//!
//! Handlers in the server crate stay thin: they parse input, call the core
//! and return either a [`JSend`] success or an [`AppError`]. Everything that
//! is about HTTP rather than tickets or media lives here.
//!
//! # Response envelope
//!
//! Every JSON body follows `JSend`:
//!
//! ```text
//! 2xx              {"status": "success", "data": ...}
//! 4xx (client)     {"status": "fail",    "data": "<reason>"}
//! 5xx (server)     {"status": "error",   "message": "<reason>"}
//! ```
//!
//! # Example
//!
//! ```
//! use audio_guide_web::{request_id_layer, AppError, JSend};
//! use axum::{routing::get, Router};
//!
//! async fn handler() -> Result<JSend<&'static str>, AppError> {
//!     Ok(JSend::ok("hello"))
//! }
//!
//! let app: Router = Router::new()
//!     .route("/hello", get(handler))
//!     .layer(request_id_layer());
//! ```

#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod jsend;
pub mod middleware;

pub use error::AppError;
pub use extractors::{AuthorizationToken, QueryAccessToken, RangeHeader, RequestId};
pub use jsend::JSend;
pub use middleware::{REQUEST_ID_HEADER, RequestIdExt, request_id_layer};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
