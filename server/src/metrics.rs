//! Business metrics for the audio guide.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `audio_guide_checkout_total{outcome}` - Pre-checkout answers (accepted or a reject reason)
//! - `audio_guide_tickets_sold_total` - Tickets recorded after a captured payment
//! - `audio_guide_redemptions_total{outcome}` - Redemption attempts (activated, refused)
//! - `audio_guide_media_responses_total{kind}` - Media responses (full, partial, rejected)

use metrics::describe_counter;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Initialize and register all business metrics descriptions.
///
/// This should be called once at application startup, before any metrics are recorded.
pub fn register_business_metrics() {
    describe_counter!(
        "audio_guide_checkout_total",
        "Pre-checkout answers by outcome (accepted or reject reason)"
    );
    describe_counter!(
        "audio_guide_tickets_sold_total",
        "Total number of tickets sold"
    );
    describe_counter!(
        "audio_guide_redemptions_total",
        "Ticket redemption attempts by outcome (activated, refused)"
    );
    describe_counter!(
        "audio_guide_media_responses_total",
        "Media responses by kind (full, partial, rejected)"
    );

    tracing::info!("Business metrics registered");
}

/// Install the global Prometheus recorder.
///
/// # Errors
///
/// Returns an error if a recorder is already installed.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    register_business_metrics();
    Ok(handle)
}

// ============================================================================
// Metric Recording Functions
// ============================================================================

/// Record a pre-checkout answer.
///
/// # Arguments
///
/// * `outcome` - `accepted`, a reject reason, or `error`
pub fn record_checkout(outcome: &'static str) {
    metrics::counter!("audio_guide_checkout_total", "outcome" => outcome).increment(1);
}

/// Record a ticket sale.
pub fn record_ticket_sold() {
    metrics::counter!("audio_guide_tickets_sold_total").increment(1);
}

/// Record a redemption attempt.
pub fn record_redemption(activated: bool) {
    let outcome = if activated { "activated" } else { "refused" };
    metrics::counter!("audio_guide_redemptions_total", "outcome" => outcome).increment(1);
}

/// Record a media response.
///
/// # Arguments
///
/// * `kind` - `full`, `partial` or `rejected`
pub fn record_media_response(kind: &'static str) {
    metrics::counter!("audio_guide_media_responses_total", "kind" => kind).increment(1);
}
