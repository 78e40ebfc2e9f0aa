//! Telegram Bot API gateway for the audio guide.
//!
//! - [`TelegramBot`]: outbound calls (`sendMessage`, `sendInvoice`, query
//!   answers) implementing the core `BotGateway` trait
//! - [`types`]: the subset of the webhook `Update` payload the commerce flow
//!   reads, plus the wire shapes of outbound requests

pub mod client;
pub mod error;
pub mod types;

pub use client::{DEFAULT_API_URL, TelegramBot};
pub use error::TelegramError;
pub use types::{CallbackQuery, Chat, Message, PreCheckoutQuery, SuccessfulPayment, Update, User};
