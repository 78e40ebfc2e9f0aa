//! Health check endpoints for the audio guide.

use super::state::AppState;
use async_trait::async_trait;
use audio_guide_postgres::PostgresStorage;
use audio_guide_web::handlers::{readiness_response, HealthCheck};
use axum::{extract::State, http::StatusCode, Json};

/// A dependency the service needs before it can take traffic.
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Probe every dependency once.
    async fn check(&self) -> Vec<HealthCheck>;
}

#[async_trait]
impl ReadinessProbe for PostgresStorage {
    async fn check(&self) -> Vec<HealthCheck> {
        vec![HealthCheck::from_result("database", self.ping().await)]
    }
}

/// Readiness check endpoint.
///
/// Returns 200 when the database answers, 503 otherwise.
///
/// # Example
///
/// ```bash
/// curl http://localhost:3000/ready
/// # [{"component":"database","status":"Healthy"}]
/// ```
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<Vec<HealthCheck>>) {
    readiness_response(state.readiness.check().await)
}

/// Prometheus scrape endpoint.
#[allow(clippy::unused_async)]
pub async fn metrics_endpoint(State(state): State<AppState>) -> String {
    state.metrics.render()
}
