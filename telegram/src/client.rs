//! Telegram Bot API client implementation

use crate::error::TelegramError;
use crate::types::{
    AnswerCallbackQuery, AnswerPreCheckoutQuery, ApiResponse, InlineKeyboardMarkup, SendInvoice,
    SendMessage,
};
use async_trait::async_trait;
use audio_guide_core::providers::{BotGateway, InlineKeyboard, Invoice};
use audio_guide_core::Result;
use reqwest::Client;
use serde::Serialize;

/// Public Bot API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Telegram Bot API client
///
/// Calls are `POST {api_url}/bot{token}/{method}` with a JSON body. The
/// token is part of the URL, so URLs are never logged.
#[derive(Clone)]
pub struct TelegramBot {
    client: Client,
    token: String,
    payments_token: String,
    api_url: String,
}

impl std::fmt::Debug for TelegramBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramBot")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl TelegramBot {
    /// Create a client against the public Bot API.
    #[must_use]
    pub fn new(token: String, payments_token: String) -> Self {
        Self {
            client: Client::new(),
            token,
            payments_token,
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    /// Point the client at another Bot API server (local server, tests).
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Call a Bot API method and return its `result`.
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, non-envelope bodies, or
    /// `ok: false` answers.
    pub async fn call<B: Serialize + Sync>(
        &self,
        method: &'static str,
        body: &B,
    ) -> std::result::Result<serde_json::Value, TelegramError> {
        let response = self
            .client
            .post(format!("{}/bot{}/{method}", self.api_url, self.token))
            .json(body)
            .send()
            .await
            .map_err(|e| TelegramError::RequestFailed(e.without_url().to_string()))?;

        let status = response.status();
        let envelope = response
            .json::<ApiResponse>()
            .await
            .map_err(|e| TelegramError::ResponseParseFailed(e.without_url().to_string()))?;

        if !envelope.ok {
            let error = TelegramError::ApiError {
                code: envelope.error_code.unwrap_or_else(|| i64::from(status.as_u16())),
                description: envelope.description.unwrap_or_default(),
            };
            tracing::warn!(method, %error, "Bot API call failed");
            return Err(error);
        }

        tracing::debug!(method, "Bot API call succeeded");
        Ok(envelope.result.unwrap_or(serde_json::Value::Null))
    }

    async fn call_expecting_true<B: Serialize + Sync>(
        &self,
        method: &'static str,
        body: &B,
    ) -> std::result::Result<(), TelegramError> {
        match self.call(method, body).await? {
            serde_json::Value::Bool(true) => Ok(()),
            _ => Err(TelegramError::Rejected(method)),
        }
    }
}

#[async_trait]
impl BotGateway for TelegramBot {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<()> {
        let body = SendMessage {
            chat_id,
            text,
            reply_markup: keyboard.map(InlineKeyboardMarkup::from),
        };
        self.call("sendMessage", &body).await?;
        Ok(())
    }

    async fn answer_callback_query(&self, query_id: &str) -> Result<()> {
        let body = AnswerCallbackQuery {
            callback_query_id: query_id,
        };
        self.call_expecting_true("answerCallbackQuery", &body).await?;
        Ok(())
    }

    async fn answer_pre_checkout_query(
        &self,
        query_id: &str,
        ok: bool,
        error_message: Option<&str>,
    ) -> Result<()> {
        let body = AnswerPreCheckoutQuery {
            pre_checkout_query_id: query_id,
            ok,
            error_message,
        };
        self.call_expecting_true("answerPreCheckoutQuery", &body).await?;
        Ok(())
    }

    async fn send_invoice(&self, chat_id: i64, invoice: Invoice) -> Result<()> {
        let body = SendInvoice::new(chat_id, invoice, &self.payments_token);
        self.call("sendInvoice", &body).await?;
        Ok(())
    }
}
