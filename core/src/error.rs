//! Error taxonomy shared by every audio guide component.

use thiserror::Error;

/// Result type alias for audio guide operations.
pub type Result<T> = std::result::Result<T, GuideError>;

/// Errors surfaced by the ticket ledger, commerce gate and media delivery.
///
/// Variants are grouped by how a caller should react:
///
/// - `Validation`, `NotFound`, `RangeNotSatisfiable`, `Credential`: client
///   errors, never retried.
/// - `Conflict`: the specific operation is rejected, the service is fine.
/// - `Storage`, `Blob`, `Transport`: transient collaborator failures. The
///   caller may retry the whole request; nothing here retries internally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuideError {
    /// Malformed input (unparseable ticket code, malformed range syntax).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A record already exists where it must not.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Requested resource does not exist.
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Kind of resource (object, cover, blob).
        resource: &'static str,
        /// Identifier that was looked up.
        id: String,
    },

    /// Range unit or range set cannot be served.
    #[error("Range not satisfiable: {0}")]
    RangeNotSatisfiable(String),

    /// Access credential is missing, expired or forged.
    #[error("Invalid credential: {0}")]
    Credential(String),

    /// Relational storage failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Blob storage failed.
    #[error("Blob error: {0}")]
    Blob(String),

    /// Chat transport failed.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl GuideError {
    /// Shorthand for a [`GuideError::NotFound`].
    #[must_use]
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Whether the failure came from a collaborator and the request may be retried.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Blob(_) | Self::Transport(_))
    }
}
