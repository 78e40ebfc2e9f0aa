//! Access credential minting.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims carried by an access credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Instant after which the credential is rejected.
    pub expires_at: DateTime<Utc>,
}

/// Mints and verifies the credential handed out after a redemption.
pub trait CredentialIssuer: Send + Sync {
    /// Mint a credential valid from `now`.
    ///
    /// # Errors
    ///
    /// Returns `Credential` if signing fails.
    fn issue(&self, now: DateTime<Utc>) -> Result<String>;

    /// Verify a credential presented at `now`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for tokens that cannot be parsed, `Credential`
    /// for forged or expired ones.
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<AccessClaims>;
}
