//! # Audio Guide Core
//!
//! The two correctness-critical mechanisms of the audio guide service:
//!
//! - **Ticket redemption**: a sold ticket converts into an access credential
//!   exactly once, even under concurrent redemption attempts, and a
//!   fail-closed pre-checkout gate rejects forged, stale, reused or
//!   mispriced purchases before money moves.
//! - **Range-addressable media**: `Range` headers are resolved against the
//!   real object size so an audio player can seek inside a remote file
//!   without downloading it.
//!
//! ## Components
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ CommerceGate │──►│ TicketLedger │──►│ TicketStore  │  (storage gateway)
//! └──────┬───────┘   └──────────────┘   └──────────────┘
//!        └─────────────────────────────►┌──────────────┐
//!                                       │ ConfigStore  │  (published price)
//!                                       └──────────────┘
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ MediaDelivery│──►│ range        │   │ BlobStore    │  (blob gateway)
//! └──────┬───────┘   └──────────────┘   └──────────────┘
//!        └─────────────────────────────────────▲
//! ```
//!
//! No in-process locks guard any of this: cross-request correctness lives
//! in the storage layer's single-statement conditional update.

pub mod commerce;
pub mod environment;
pub mod error;
pub mod ledger;
pub mod media;
pub mod providers;
pub mod range;
pub mod ticket;

pub use commerce::{CheckoutDecision, CommerceGate, PendingPurchase, RejectReason};
pub use error::{GuideError, Result};
pub use ledger::TicketLedger;
pub use media::{Delivery, MediaDelivery, MediaResponse};
pub use range::{ByteRange, RangeSet};
pub use ticket::{Ticket, TicketCode, TicketPrice};
