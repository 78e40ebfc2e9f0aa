//! Unsigned credential issuer.

use audio_guide_core::providers::{AccessClaims, CredentialIssuer};
use audio_guide_core::{GuideError, Result};
use chrono::{DateTime, Duration, Utc};

const PREFIX: &str = "access:";

/// Issues `access:<unix-expiry>` tokens valid for a fixed lifetime.
///
/// Not signed; only for tests that do not care about the token format.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    lifetime: Duration,
}

impl Default for StaticCredentials {
    fn default() -> Self {
        Self::new(Duration::hours(24))
    }
}

impl StaticCredentials {
    /// Issuer whose tokens live for `lifetime`.
    #[must_use]
    pub const fn new(lifetime: Duration) -> Self {
        Self { lifetime }
    }
}

impl CredentialIssuer for StaticCredentials {
    fn issue(&self, now: DateTime<Utc>) -> Result<String> {
        Ok(format!("{PREFIX}{}", (now + self.lifetime).timestamp()))
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<AccessClaims> {
        let expires_at = token
            .strip_prefix(PREFIX)
            .and_then(|ts| ts.parse::<i64>().ok())
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .ok_or_else(|| GuideError::Validation("malformed access token".to_string()))?;

        if expires_at <= now {
            return Err(GuideError::Credential("access token expired".to_string()));
        }

        Ok(AccessClaims { expires_at })
    }
}
