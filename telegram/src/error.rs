//! Error types for the Telegram Bot API client

use audio_guide_core::GuideError;
use thiserror::Error;

/// Errors that can occur when calling the Bot API
#[derive(Debug, Error)]
pub enum TelegramError {
    /// HTTP request failed before a response arrived
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response body was not a Bot API envelope
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// The Bot API answered `ok: false`
    #[error("API error ({code}): {description}")]
    ApiError {
        /// `error_code` from the envelope, or the HTTP status
        code: i64,
        /// `description` from the envelope
        description: String,
    },

    /// A method that answers `true` on success answered something else
    #[error("{0} returned false")]
    Rejected(&'static str),
}

impl From<TelegramError> for GuideError {
    fn from(error: TelegramError) -> Self {
        Self::Transport(error.to_string())
    }
}
