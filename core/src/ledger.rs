//! Ticket ledger: the single source of truth for ticket existence and use.
//!
//! # Exactly-once activation
//!
//! ```text
//! Redeem(c) ──► UPDATE tickets SET used = true
//!               WHERE code = c AND used = false   ──► rows affected
//!                                                      1 → true  (this call won)
//!                                                      0 → false (used or unknown)
//! ```
//!
//! The flag is never read and written back in two steps. Concurrent
//! redemptions (possibly from different service instances) race on the one
//! conditional statement and the storage engine picks exactly one winner.

use crate::error::{GuideError, Result};
use crate::providers::TicketStore;
use crate::ticket::{Ticket, TicketCode};
use std::sync::Arc;

/// Ticket ledger over a [`TicketStore`].
#[derive(Clone)]
pub struct TicketLedger {
    store: Arc<dyn TicketStore>,
}

impl TicketLedger {
    /// Create a ledger over a storage gateway.
    #[must_use]
    pub fn new(store: Arc<dyn TicketStore>) -> Self {
        Self { store }
    }

    /// Record a sold ticket with `used = false`.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the code already exists (a duplicate
    /// payment confirmation, or an integrity violation), `Storage` on I/O
    /// failure.
    pub async fn create(&self, code: TicketCode) -> Result<()> {
        match self.store.insert_ticket(code).await {
            Ok(()) => {
                tracing::info!(ticket = %code, "Ticket recorded");
                Ok(())
            }
            Err(err @ GuideError::Conflict(_)) => {
                tracing::warn!(ticket = %code, "Ticket code already recorded");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Read-only lookup.
    ///
    /// # Errors
    ///
    /// Returns `Storage` on I/O failure.
    pub async fn lookup(&self, code: TicketCode) -> Result<Option<Ticket>> {
        self.store.find_ticket(code).await
    }

    /// Flip the ticket to used, exactly once.
    ///
    /// Returns `true` iff this call performed the transition. Unknown codes
    /// and already-used codes both return `false` so existence is not leaked.
    ///
    /// # Errors
    ///
    /// Returns `Storage` on I/O failure; a storage failure is never reported
    /// as "not activated".
    pub async fn activate(&self, code: TicketCode) -> Result<bool> {
        let affected = self.store.mark_used(code).await?;
        if affected > 1 {
            tracing::error!(ticket = %code, affected, "Activation changed more than one row");
        }

        Ok(affected == 1)
    }
}
