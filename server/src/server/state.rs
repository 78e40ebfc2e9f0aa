//! Application state for the audio guide HTTP server.
//!
//! Contains all shared resources needed by HTTP handlers:
//! - Commerce gate (ticket sale and redemption)
//! - Object catalog and media delivery
//! - Credential issuer and clock
//! - Bot transport for webhook replies

use super::health::ReadinessProbe;
use crate::i18n::Translator;
use audio_guide_core::environment::Clock;
use audio_guide_core::providers::{BotGateway, CatalogStore, CredentialIssuer};
use audio_guide_core::{CommerceGate, MediaDelivery};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned (cheaply, every field is an `Arc` or a handle) for each request.
#[derive(Clone)]
pub struct AppState {
    /// Ticket sale and redemption
    pub gate: CommerceGate,

    /// Guide object metadata
    pub catalog: Arc<dyn CatalogStore>,

    /// Cover and audio streaming
    pub media: MediaDelivery,

    /// Access token minting and verification
    pub credentials: Arc<dyn CredentialIssuer>,

    /// Time source for token issue and expiry
    pub clock: Arc<dyn Clock>,

    /// Outbound chat calls
    pub bot: Arc<dyn BotGateway>,

    /// Localized bot messages
    pub translator: Translator,

    /// Companion web app URL used by bot buttons
    pub web_app_url: String,

    /// Dependency probe for `/ready`
    pub readiness: Arc<dyn ReadinessProbe>,

    /// Prometheus exporter handle for `/metrics`
    pub metrics: PrometheusHandle,
}
