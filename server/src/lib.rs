//! # Audio Guide Server
//!
//! The deployable service around the audio guide core:
//!
//! - **HTTP API**: ticket redemption, guide objects, covers and seekable
//!   audio, all behind day-scoped access tokens
//! - **Telegram webhook**: invoice, pre-checkout gate and purchase messages
//! - **Operations**: health, readiness, Prometheus metrics, graceful shutdown
//!
//! # Architecture
//!
//! ```text
//!   Telegram ──POST /bot──┐          ┌── GET /objects/...  ◄── web app
//!                         ▼          ▼
//!                    ┌──────────────────┐
//!                    │   Axum router    │  request id, CORS, tracing
//!                    └────────┬─────────┘
//!              ┌──────────────┼───────────────┐
//!              ▼              ▼               ▼
//!        CommerceGate    CatalogStore    MediaDelivery
//!              │              │               │
//!              ▼              ▼               ▼
//!          PostgreSQL     PostgreSQL      filesystem
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod i18n;
pub mod metrics;
pub mod server;

pub use config::{Config, ConfigError};
pub use server::{build_router, AppState};
