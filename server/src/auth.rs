//! Signed access tokens.
//!
//! A redeemed ticket buys access for the rest of the day: tokens are HS256
//! JWTs that expire at the next UTC midnight after issue.

use audio_guide_core::providers::{AccessClaims, CredentialIssuer};
use audio_guide_core::{GuideError, Result};
use chrono::{DateTime, NaiveTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    iat: i64,
    exp: i64,
}

/// HS256 credential issuer.
#[derive(Clone)]
pub struct JwtCredentials {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for JwtCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtCredentials").finish_non_exhaustive()
    }
}

impl JwtCredentials {
    /// Create an issuer from a shared secret.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the secret is empty.
    pub fn new(secret: &str) -> Result<Self> {
        if secret.is_empty() {
            return Err(GuideError::Validation("JWT secret must not be empty".to_string()));
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        })
    }
}

/// First instant of the UTC day after `now`.
///
/// # Errors
///
/// Returns `Credential` at the end of the representable calendar.
pub fn next_utc_midnight(now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    now.date_naive()
        .succ_opt()
        .map(|day| day.and_time(NaiveTime::MIN).and_utc())
        .ok_or_else(|| GuideError::Credential("date out of range".to_string()))
}

impl CredentialIssuer for JwtCredentials {
    fn issue(&self, now: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            iat: now.timestamp(),
            exp: next_utc_midnight(now)?.timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| GuideError::Credential(format!("failed to sign token: {e}")))
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<AccessClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock below.
        validation.validate_exp = false;
        validation.leeway = 0;

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidToken
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_) => GuideError::Validation("malformed access token".to_string()),
                _ => GuideError::Credential(format!("invalid access token: {e}")),
            },
        )?;

        let expires_at = DateTime::from_timestamp(data.claims.exp, 0)
            .ok_or_else(|| GuideError::Credential("invalid expiry".to_string()))?;

        if expires_at <= now {
            return Err(GuideError::Credential("access token expired".to_string()));
        }

        Ok(AccessClaims { expires_at })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 14, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_expires_at_next_midnight() {
        let credentials = JwtCredentials::new("secret").unwrap();
        let token = credentials.issue(at(9, 30)).unwrap();

        let claims = credentials.verify(&token, at(23, 59)).unwrap();
        assert_eq!(claims.expires_at, Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let credentials = JwtCredentials::new("secret").unwrap();
        let token = credentials.issue(at(23, 59)).unwrap();

        let err = credentials.verify(&token, at(23, 59) + Duration::minutes(1)).unwrap_err();
        assert!(matches!(err, GuideError::Credential(_)));
    }

    #[test]
    fn test_forged_token_is_rejected() {
        let issuer = JwtCredentials::new("secret").unwrap();
        let other = JwtCredentials::new("other").unwrap();
        let token = other.issue(at(10, 0)).unwrap();

        let err = issuer.verify(&token, at(10, 1)).unwrap_err();
        assert!(matches!(err, GuideError::Credential(_)));
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let credentials = JwtCredentials::new("secret").unwrap();
        let err = credentials.verify("not-a-jwt", at(10, 0)).unwrap_err();
        assert!(matches!(err, GuideError::Validation(_)));
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        assert!(JwtCredentials::new("").is_err());
    }

    proptest::proptest! {
        #[test]
        fn prop_token_lives_until_next_midnight(secs in 0i64..4_000_000_000) {
            let credentials = JwtCredentials::new("secret").unwrap();
            let now = DateTime::from_timestamp(secs, 0).unwrap();
            let token = credentials.issue(now).unwrap();
            let midnight = next_utc_midnight(now).unwrap();

            proptest::prop_assert!(midnight > now);
            proptest::prop_assert!(midnight - now <= Duration::days(1));
            proptest::prop_assert_eq!(credentials.verify(&token, now).unwrap().expires_at, midnight);
            proptest::prop_assert!(credentials.verify(&token, midnight).is_err());
        }
    }
}
