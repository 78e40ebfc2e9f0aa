//! In-memory ticket storage gateway.

use async_trait::async_trait;
use audio_guide_core::providers::TicketStore;
use audio_guide_core::{GuideError, Result, Ticket, TicketCode};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Default)]
struct Inner {
    tickets: HashMap<TicketCode, Ticket>,
    next_id: i64,
    unavailable: bool,
}

/// In-memory ticket store.
///
/// The conditional update runs under one mutex, which gives it the same
/// compare-and-swap semantics as the SQL statement it stands in for.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTicketStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryTicketStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `GuideError::Storage`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Snapshot of a ticket (for assertions).
    #[must_use]
    pub fn get(&self, code: TicketCode) -> Option<Ticket> {
        self.lock().tickets.get(&code).cloned()
    }

    /// Number of recorded tickets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().tickets.len()
    }

    /// Whether no ticket was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn checked(&self) -> Result<std::sync::MutexGuard<'_, Inner>> {
        let inner = self.lock();
        if inner.unavailable {
            return Err(GuideError::Storage("connection refused".to_string()));
        }
        Ok(inner)
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn insert_ticket(&self, code: TicketCode) -> Result<()> {
        let mut inner = self.checked()?;
        if inner.tickets.contains_key(&code) {
            return Err(GuideError::Conflict(format!("ticket {code} already exists")));
        }

        inner.next_id += 1;
        let id = inner.next_id;
        inner.tickets.insert(code, Ticket { id, code, used: false });
        Ok(())
    }

    async fn find_ticket(&self, code: TicketCode) -> Result<Option<Ticket>> {
        Ok(self.checked()?.tickets.get(&code).cloned())
    }

    async fn mark_used(&self, code: TicketCode) -> Result<u64> {
        let mut inner = self.checked()?;
        match inner.tickets.get_mut(&code) {
            Some(ticket) if !ticket.used => {
                ticket.used = true;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}
