//! In-memory implementations of every collaborator trait.

mod blob;
mod bot;
mod catalog;
mod clock;
mod config;
mod credentials;
mod tickets;

pub use blob::{BlobRead, InMemoryBlobStore};
pub use bot::{BotCall, RecordingBot};
pub use catalog::InMemoryCatalog;
pub use clock::FixedClock;
pub use config::InMemoryConfigStore;
pub use credentials::StaticCredentials;
pub use tickets::InMemoryTicketStore;
