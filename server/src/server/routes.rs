//! Router configuration for the audio guide.
//!
//! Builds the complete Axum router with all endpoints.

use super::health::{metrics_endpoint, readiness_check};
use super::state::AppState;
use crate::api::{bot, objects, tickets};
use audio_guide_web::handlers::health_check;
use audio_guide_web::request_id_layer;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// Configures all routes including:
/// - Health, readiness and metrics
/// - Ticket redemption
/// - Guide objects, covers and audio
/// - The Telegram webhook
///
/// # Arguments
///
/// - `state`: Application state to share with handlers
/// - `cors_origins`: Allowed origins, `*` for any
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    let api_routes = Router::new()
        .route("/tickets/token", post(tickets::create_token))
        .route("/objects/:code", get(objects::get_object))
        .route("/objects/:code/covers/:index", get(objects::get_cover))
        .route("/objects/:code/audio", get(objects::get_audio))
        .route("/bot", post(bot::webhook));

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_endpoint))
        .merge(api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .layer(request_id_layer())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(origins)
}
