//! Bot API payloads.
//!
//! Inbound types cover only the fields the webhook handler reads; unknown
//! fields are ignored. Outbound types mirror the JSON bodies of the methods
//! [`TelegramBot`](crate::TelegramBot) calls.

use audio_guide_core::providers::{InlineButton, InlineKeyboard, Invoice, LabeledPrice};
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
// Inbound (webhook)
// ═══════════════════════════════════════════════════════════════════════

/// Webhook update. At most one of the optional fields is set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Update {
    /// Monotonic update identifier.
    pub update_id: i64,
    /// New incoming message.
    #[serde(default)]
    pub message: Option<Message>,
    /// Inline keyboard button press.
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
    /// Payment about to be captured.
    #[serde(default)]
    pub pre_checkout_query: Option<PreCheckoutQuery>,
}

/// Chat message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    /// Message identifier inside the chat.
    pub message_id: i64,
    /// Chat the message belongs to.
    pub chat: Chat,
    /// Sender, absent for channel posts.
    #[serde(default)]
    pub from: Option<User>,
    /// Text, for text messages.
    #[serde(default)]
    pub text: Option<String>,
    /// Set on the service message sent after a captured payment.
    #[serde(default)]
    pub successful_payment: Option<SuccessfulPayment>,
}

/// Chat identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Chat {
    /// Chat identifier.
    pub id: i64,
}

/// Telegram user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    /// User identifier.
    pub id: i64,
    /// IETF language tag of the user's client.
    #[serde(default)]
    pub language_code: Option<String>,
}

/// Inline keyboard button press.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CallbackQuery {
    /// Query identifier, to be answered.
    pub id: String,
    /// User who pressed the button.
    pub from: User,
    /// Message the button was attached to.
    #[serde(default)]
    pub message: Option<Message>,
    /// Callback data of the button.
    #[serde(default)]
    pub data: Option<String>,
}

/// Pending payment awaiting an accept/reject answer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PreCheckoutQuery {
    /// Query identifier, to be answered.
    pub id: String,
    /// Paying user.
    pub from: User,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Total in the smallest currency unit.
    pub total_amount: i64,
    /// Payload of the invoice being paid.
    pub invoice_payload: String,
}

/// Captured payment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SuccessfulPayment {
    /// ISO 4217 currency code.
    pub currency: String,
    /// Total in the smallest currency unit.
    pub total_amount: i64,
    /// Payload of the paid invoice.
    pub invoice_payload: String,
    /// Telegram's charge identifier.
    #[serde(default)]
    pub telegram_payment_charge_id: Option<String>,
}

impl Update {
    /// Language of whoever triggered the update.
    #[must_use]
    pub fn language_code(&self) -> Option<&str> {
        let user = self
            .callback_query
            .as_ref()
            .map(|query| &query.from)
            .or_else(|| self.pre_checkout_query.as_ref().map(|query| &query.from))
            .or_else(|| self.message.as_ref().and_then(|message| message.from.as_ref()));

        user.and_then(|user| user.language_code.as_deref())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Outbound (method bodies)
// ═══════════════════════════════════════════════════════════════════════

/// Bot API response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    pub ok: bool,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub(crate) struct WebAppInfo {
    pub url: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub(crate) struct InlineKeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_app: Option<WebAppInfo>,
}

impl From<InlineButton> for InlineKeyboardButton {
    fn from(button: InlineButton) -> Self {
        match button {
            InlineButton::WebApp { text, url } => Self {
                text,
                url: None,
                callback_data: None,
                web_app: Some(WebAppInfo { url }),
            },
            InlineButton::Callback { text, data } => Self {
                text,
                url: None,
                callback_data: Some(data),
                web_app: None,
            },
            InlineButton::Url { text, url } => Self {
                text,
                url: Some(url),
                callback_data: None,
                web_app: None,
            },
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub(crate) struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl From<InlineKeyboard> for InlineKeyboardMarkup {
    fn from(keyboard: InlineKeyboard) -> Self {
        Self {
            inline_keyboard: keyboard
                .rows
                .into_iter()
                .map(|row| row.into_iter().map(InlineKeyboardButton::from).collect())
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SendMessage<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerCallbackQuery<'a> {
    pub callback_query_id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerPreCheckoutQuery<'a> {
    pub pre_checkout_query_id: &'a str,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SendInvoice<'a> {
    pub chat_id: i64,
    pub title: String,
    pub description: String,
    pub payload: String,
    pub provider_token: &'a str,
    pub currency: String,
    pub prices: Vec<LabeledPrice>,
}

impl<'a> SendInvoice<'a> {
    pub(crate) fn new(chat_id: i64, invoice: Invoice, provider_token: &'a str) -> Self {
        Self {
            chat_id,
            title: invoice.title,
            description: invoice.description,
            payload: invoice.payload,
            provider_token,
            currency: invoice.currency,
            prices: invoice.prices,
        }
    }
}
