//! Ticket redemption endpoint.
//!
//! - POST /tickets/token - Exchange a sold ticket for an access token

use crate::metrics;
use crate::server::state::AppState;
use audio_guide_core::TicketCode;
use audio_guide_web::{AppError, JSend, WebResult};
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

/// Request to redeem a ticket.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    /// Ticket code as printed in the purchase message
    pub ticket: String,
}

/// Access token handed out after a redemption.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// Signed token, valid until the next UTC midnight
    pub token: String,
}

/// Redeem a ticket.
///
/// # Endpoint
///
/// ```text
/// POST /tickets/token
/// Content-Type: application/json
///
/// {"ticket": "3f2b6c1e-..."}
/// ```
///
/// # Errors
///
/// - 400: body is not JSON or the code is not a UUID
/// - 403: ticket unknown or already activated
/// - 500: storage failure
pub async fn create_token(
    State(state): State<AppState>,
    body: Result<Json<TokenRequest>, JsonRejection>,
) -> WebResult<JSend<TokenResponse>> {
    let Json(request) = body.map_err(|e| AppError::bad_request(e.body_text()))?;
    let code: TicketCode = request.ticket.parse()?;

    let activated = state.gate.redeem(code).await?;
    metrics::record_redemption(activated);

    if !activated {
        // Unknown and used codes get the same answer.
        return Err(AppError::forbidden("ticket already activated"));
    }

    let token = state.credentials.issue(state.clock.now())?;
    tracing::info!(ticket = %code, "Access token issued");

    Ok(JSend::created(TokenResponse { token }))
}
