//! Commerce gate: money-state transitions around a ticket sale.
//!
//! ```text
//! UNISSUED ──issue_code──► PENDING ──confirm_purchase──► SOLD ──redeem──► REDEEMED
//!                         (invoice out,                 (ledger row,    (ledger
//!                          not persisted)                used = false)   used = true)
//! ```
//!
//! `PENDING` only exists as the payment provider's outstanding transaction.
//! Before the provider captures funds it asks for a pre-checkout answer;
//! [`CommerceGate::validate_pending_purchase`] is fail-closed and accepts
//! only when every check passes.

use crate::error::Result;
use crate::ledger::TicketLedger;
use crate::providers::ConfigStore;
use crate::ticket::{TICKET_CURRENCY_KEY, TICKET_PRICE_KEY, TicketCode, TicketPrice};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Payment pre-authorization request as seen at pre-checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPurchase {
    /// Invoice payload, expected to be a ticket code.
    pub payload: String,
    /// Currency the provider is about to charge.
    pub currency: String,
    /// Total amount the provider is about to charge.
    pub total_amount: i64,
}

/// Why a pending purchase was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// No complete published price: payments are disabled.
    PaymentsDisabled,
    /// Currency differs from the published one.
    CurrencyMismatch,
    /// Amount differs from the published one.
    AmountMismatch,
    /// Payload is not a ticket code.
    MalformedCode,
    /// A ticket with this code was already sold (replayed payload).
    DuplicateCode,
}

impl RejectReason {
    /// Stable label for logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PaymentsDisabled => "payments_disabled",
            Self::CurrencyMismatch => "currency_mismatch",
            Self::AmountMismatch => "amount_mismatch",
            Self::MalformedCode => "malformed_code",
            Self::DuplicateCode => "duplicate_code",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pre-checkout answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutDecision {
    /// Let the provider capture the payment.
    Accept,
    /// Refuse the payment.
    Reject(RejectReason),
}

impl CheckoutDecision {
    /// Whether the payment may proceed.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accept)
    }

    /// Rejection reason, if rejected.
    #[must_use]
    pub const fn reason(&self) -> Option<RejectReason> {
        match self {
            Self::Accept => None,
            Self::Reject(reason) => Some(*reason),
        }
    }
}

/// Gatekeeper for ticket sale and redemption.
#[derive(Clone)]
pub struct CommerceGate {
    ledger: TicketLedger,
    config: Arc<dyn ConfigStore>,
}

impl CommerceGate {
    /// Create a commerce gate.
    #[must_use]
    pub fn new(ledger: TicketLedger, config: Arc<dyn ConfigStore>) -> Self {
        Self { ledger, config }
    }

    /// Read the published price. `None` means payments are disabled.
    ///
    /// # Errors
    ///
    /// Returns `Storage` on I/O failure.
    pub async fn published_price(&self) -> Result<Option<TicketPrice>> {
        let currency = self.config.get_value(TICKET_CURRENCY_KEY).await?;
        let amount = self.config.get_value(TICKET_PRICE_KEY).await?;

        let price = TicketPrice::from_config(currency, amount);
        if price.is_none() {
            tracing::warn!("Ticket price is not configured, payments are disabled");
        }

        Ok(price)
    }

    /// Mint the code for a new invoice (UNISSUED → PENDING).
    #[must_use]
    pub fn issue_code(&self) -> TicketCode {
        TicketCode::generate()
    }

    /// Decide whether a pending purchase may be charged.
    ///
    /// Checks, in order: price published, currency, amount, payload is a
    /// ticket code, code not already sold. The first failing check decides.
    ///
    /// # Errors
    ///
    /// Returns `Storage` when the price or the ledger cannot be read. The
    /// caller must treat an error as a rejection.
    pub async fn validate_pending_purchase(&self, purchase: &PendingPurchase) -> Result<CheckoutDecision> {
        let Some(price) = self.published_price().await? else {
            return Ok(reject(purchase, RejectReason::PaymentsDisabled));
        };

        if purchase.currency != price.currency {
            return Ok(reject(purchase, RejectReason::CurrencyMismatch));
        }

        if purchase.total_amount != price.amount {
            return Ok(reject(purchase, RejectReason::AmountMismatch));
        }

        let Ok(code) = purchase.payload.parse::<TicketCode>() else {
            return Ok(reject(purchase, RejectReason::MalformedCode));
        };

        if self.ledger.lookup(code).await?.is_some() {
            return Ok(reject(purchase, RejectReason::DuplicateCode));
        }

        tracing::info!(ticket = %code, "Pending purchase accepted");
        Ok(CheckoutDecision::Accept)
    }

    /// Record the sale after the provider reported a successful capture
    /// (PENDING → SOLD). This is the only way a ticket comes into existence.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` on a duplicate confirmation, `Storage` on I/O
    /// failure. Not retried here: a retry without upstream idempotency could
    /// double-record a sale.
    pub async fn confirm_purchase(&self, code: TicketCode) -> Result<()> {
        self.ledger.create(code).await
    }

    /// Redeem a ticket (SOLD → REDEEMED). The caller mints an access
    /// credential only when this returns `true`.
    ///
    /// # Errors
    ///
    /// Returns `Storage` on I/O failure.
    pub async fn redeem(&self, code: TicketCode) -> Result<bool> {
        let activated = self.ledger.activate(code).await?;
        if activated {
            tracing::info!(ticket = %code, "Ticket redeemed");
        } else {
            tracing::info!(ticket = %code, "Ticket redemption refused");
        }

        Ok(activated)
    }
}

fn reject(purchase: &PendingPurchase, reason: RejectReason) -> CheckoutDecision {
    tracing::warn!(
        payload = %purchase.payload,
        currency = %purchase.currency,
        amount = purchase.total_amount,
        %reason,
        "Pending purchase rejected"
    );
    CheckoutDecision::Reject(reason)
}
