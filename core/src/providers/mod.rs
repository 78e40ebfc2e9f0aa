//! Collaborator interfaces.
//!
//! Every external dependency of the core is a trait defined here. The core
//! logic depends only on these traits; the runtime wires in concrete
//! implementations.
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐
//! │ TicketLedger     │   │ CommerceGate     │   │ MediaDelivery    │
//! └────────┬─────────┘   └───┬──────────┬───┘   └────────┬─────────┘
//!          │                 │          │                │
//!          ▼                 ▼          ▼                ▼
//!   TicketStore        TicketLedger  ConfigStore     BlobStore
//!   (postgres / mem)                 (postgres/mem)  (fs / mem)
//! ```
//!
//! This enables:
//! - **Testing**: in-memory fakes from `audio-guide-testing`
//! - **Production**: `PostgreSQL`, filesystem blobs, Telegram Bot API

pub mod blob;
pub mod bot;
pub mod catalog;
pub mod config;
pub mod credentials;
pub mod tickets;

pub use blob::{BlobStat, BlobStore, BlobStream};
pub use bot::{BotGateway, InlineButton, InlineKeyboard, Invoice, LabeledPrice};
pub use catalog::{CatalogStore, Cover, GuideObject};
pub use config::ConfigStore;
pub use credentials::{AccessClaims, CredentialIssuer};
pub use tickets::TicketStore;
