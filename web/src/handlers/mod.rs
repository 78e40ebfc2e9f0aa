//! HTTP request handlers shared by every deployment.

pub mod health;

pub use health::{HealthCheck, HealthStatus, health_check, readiness_response};
