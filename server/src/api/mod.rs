//! HTTP API handlers.
//!
//! - `tickets`: ticket redemption for an access token
//! - `objects`: guide object metadata, covers and audio
//! - `bot`: Telegram webhook

pub mod bot;
pub mod objects;
pub mod tickets;
