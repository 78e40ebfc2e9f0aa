//! # Audio Guide Testing
//!
//! In-memory collaborators for the audio guide core.
//!
//! This crate provides:
//! - One fake per collaborator trait (tickets, config, catalog, blobs, bot,
//!   credentials), each usable behind an `Arc<dyn Trait>`
//! - A fixed clock for deterministic credential expiry
//! - Failure injection for exercising transient-error paths
//!
//! ## Example
//!
//! ```
//! use audio_guide_core::{CommerceGate, TicketLedger};
//! use audio_guide_testing::mocks::{InMemoryConfigStore, InMemoryTicketStore};
//! use std::sync::Arc;
//!
//! # futures::executor::block_on(async {
//! let tickets = Arc::new(InMemoryTicketStore::new());
//! let config = Arc::new(InMemoryConfigStore::with_price("EUR", 500));
//! let gate = CommerceGate::new(TicketLedger::new(tickets), config);
//!
//! let code = gate.issue_code();
//! gate.confirm_purchase(code).await.unwrap();
//! assert!(gate.redeem(code).await.unwrap());
//! assert!(!gate.redeem(code).await.unwrap());
//! # });
//! ```

pub mod mocks;

pub use mocks::{
    BotCall, FixedClock, InMemoryBlobStore, InMemoryCatalog, InMemoryConfigStore,
    InMemoryTicketStore, RecordingBot, StaticCredentials,
};

/// Install a test subscriber that prints `tracing` output for failing tests.
///
/// Safe to call from every test; only the first call installs.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "audio_guide=debug".into()),
        )
        .try_init();
}
