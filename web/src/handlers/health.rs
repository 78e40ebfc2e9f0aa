//! Health check endpoints.
//!
//! These endpoints are used by load balancers and monitoring systems
//! to verify service health.

use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Component health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    /// Component answers.
    Healthy,
    /// Component does not answer.
    Unhealthy,
}

/// Result of probing one dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    /// Dependency name.
    pub component: &'static str,
    /// Probe outcome.
    pub status: HealthStatus,
    /// Failure detail, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthCheck {
    /// Build a check from a probe result.
    pub fn from_result<E: std::fmt::Display>(
        component: &'static str,
        result: Result<(), E>,
    ) -> Self {
        match result {
            Ok(()) => Self {
                component,
                status: HealthStatus::Healthy,
                message: None,
            },
            Err(e) => Self {
                component,
                status: HealthStatus::Unhealthy,
                message: Some(e.to_string()),
            },
        }
    }
}

/// Simple health check endpoint (for basic liveness).
///
/// Returns 200 OK to indicate the service is running.
/// This endpoint does NOT check dependencies (database, etc.).
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// Readiness response over a set of dependency checks.
///
/// # Status Codes
///
/// - 200 OK: every check is healthy
/// - 503 Service Unavailable: at least one check failed
#[must_use]
pub fn readiness_response(checks: Vec<HealthCheck>) -> (StatusCode, Json<Vec<HealthCheck>>) {
    let ready = checks
        .iter()
        .all(|check| check.status == HealthStatus::Healthy);

    if !ready {
        tracing::warn!(?checks, "Readiness check failed");
    }

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(checks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simple_health_check() {
        let (status, body) = health_check().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[test]
    fn test_readiness_fails_when_any_check_fails() {
        let checks = vec![
            HealthCheck::from_result::<String>("database", Ok(())),
            HealthCheck::from_result("blob", Err("permission denied")),
        ];

        let (status, Json(body)) = readiness_response(checks);
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body[1].message.as_deref(), Some("permission denied"));
    }

    #[test]
    fn test_readiness_ok_when_all_healthy() {
        let checks = vec![HealthCheck::from_result::<String>("database", Ok(()))];
        let (status, _) = readiness_response(checks);
        assert_eq!(status, StatusCode::OK);
    }
}
