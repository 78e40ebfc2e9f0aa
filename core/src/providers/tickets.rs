//! Ticket storage gateway.

use crate::error::Result;
use crate::ticket::{Ticket, TicketCode};
use async_trait::async_trait;

/// Row-level access to the `tickets` relation.
///
/// # Implementation Notes
///
/// - `insert_ticket` must fail with `GuideError::Conflict` when the code
///   already exists (unique constraint), never overwrite.
/// - **CRITICAL**: `mark_used` must be a single conditional write
///   (`UPDATE tickets SET used = true WHERE code = $1 AND used = false`)
///   and return the affected-row count. Implementations must not read the
///   flag and write it back in two steps: concurrent redemptions of the
///   same code race on this statement and exactly one may win.
/// - Connectivity failures surface as `GuideError::Storage`.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Insert a new unused ticket.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the code exists, `Storage` on I/O failure.
    async fn insert_ticket(&self, code: TicketCode) -> Result<()>;

    /// Fetch a ticket by code.
    ///
    /// # Errors
    ///
    /// Returns `Storage` on I/O failure.
    async fn find_ticket(&self, code: TicketCode) -> Result<Option<Ticket>>;

    /// Conditionally flip `used` from `false` to `true`.
    ///
    /// Returns the number of rows changed: `1` when this call performed the
    /// transition, `0` when the ticket is already used or does not exist.
    ///
    /// # Errors
    ///
    /// Returns `Storage` on I/O failure.
    async fn mark_used(&self, code: TicketCode) -> Result<u64>;
}
