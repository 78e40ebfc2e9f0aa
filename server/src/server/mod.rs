//! HTTP server for the audio guide.
//!
//! Provides the Axum router, shared state and health endpoints.

pub mod health;
pub mod routes;
pub mod state;

pub use health::ReadinessProbe;
pub use routes::build_router;
pub use state::AppState;
