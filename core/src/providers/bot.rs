//! Chat-bot transport.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One button of an inline keyboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InlineButton {
    /// Opens the companion web app at the given URL.
    WebApp {
        /// Button label.
        text: String,
        /// Web app URL.
        url: String,
    },
    /// Sends a callback query with the given data back to the bot.
    Callback {
        /// Button label.
        text: String,
        /// Callback payload.
        data: String,
    },
    /// Opens a plain URL.
    Url {
        /// Button label.
        text: String,
        /// Target URL.
        url: String,
    },
}

/// Inline keyboard attached to a message, as rows of buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboard {
    /// Button rows, top to bottom.
    pub rows: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    /// Keyboard with one button per row.
    #[must_use]
    pub fn column(buttons: Vec<InlineButton>) -> Self {
        Self {
            rows: buttons.into_iter().map(|button| vec![button]).collect(),
        }
    }
}

/// Price component shown on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledPrice {
    /// Line label.
    pub label: String,
    /// Amount in the smallest currency unit.
    pub amount: i64,
}

/// Invoice sent to a chat. Payment is captured by the chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Product title.
    pub title: String,
    /// Product description.
    pub description: String,
    /// Opaque payload echoed back in pre-checkout and payment events.
    pub payload: String,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Price breakdown.
    pub prices: Vec<LabeledPrice>,
}

/// Outbound chat operations used by the commerce flow.
#[async_trait]
pub trait BotGateway: Send + Sync {
    /// Send a text message.
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the platform rejects the call.
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<()>;

    /// Acknowledge a callback query so the client stops its spinner.
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the platform rejects the call.
    async fn answer_callback_query(&self, query_id: &str) -> Result<()>;

    /// Accept or reject a pending payment. Must be answered promptly: the
    /// platform holds the charge until it receives this answer.
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the platform rejects the call.
    async fn answer_pre_checkout_query(
        &self,
        query_id: &str,
        ok: bool,
        error_message: Option<&str>,
    ) -> Result<()>;

    /// Send an invoice.
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the platform rejects the call.
    async fn send_invoice(&self, chat_id: i64, invoice: Invoice) -> Result<()>;
}
