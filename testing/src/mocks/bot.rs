//! Recording chat-bot gateway.

use async_trait::async_trait;
use audio_guide_core::providers::{BotGateway, InlineKeyboard, Invoice};
use audio_guide_core::{GuideError, Result};
use std::sync::{Arc, Mutex, PoisonError};

/// An outbound bot call captured by [`RecordingBot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCall {
    /// `send_message`
    Message {
        /// Target chat.
        chat_id: i64,
        /// Message text.
        text: String,
        /// Attached keyboard.
        keyboard: Option<InlineKeyboard>,
    },
    /// `answer_callback_query`
    CallbackAnswer {
        /// Callback query id.
        query_id: String,
    },
    /// `answer_pre_checkout_query`
    PreCheckoutAnswer {
        /// Pre-checkout query id.
        query_id: String,
        /// Whether the payment was accepted.
        ok: bool,
        /// Message shown to the payer on rejection.
        error_message: Option<String>,
    },
    /// `send_invoice`
    Invoice {
        /// Target chat.
        chat_id: i64,
        /// Invoice sent.
        invoice: Invoice,
    },
}

/// Bot gateway that records calls instead of talking to a platform.
#[derive(Debug, Clone, Default)]
pub struct RecordingBot {
    calls: Arc<Mutex<Vec<BotCall>>>,
    remaining: Arc<Mutex<Option<usize>>>,
}

impl RecordingBot {
    /// Create a recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded so far.
    #[must_use]
    pub fn calls(&self) -> Vec<BotCall> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Make every subsequent call fail with `GuideError::Transport`.
    pub fn set_failing(&self, failing: bool) {
        *self.remaining.lock().unwrap_or_else(PoisonError::into_inner) = failing.then_some(0);
    }

    /// Let the next `successes` calls through, then fail every call after them.
    pub fn fail_after(&self, successes: usize) {
        *self.remaining.lock().unwrap_or_else(PoisonError::into_inner) = Some(successes);
    }

    fn record(&self, call: BotCall) -> Result<()> {
        if let Some(remaining) = self
            .remaining
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_mut()
        {
            if *remaining == 0 {
                return Err(GuideError::Transport("Bad Gateway".to_string()));
            }
            *remaining -= 1;
        }
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        Ok(())
    }
}

#[async_trait]
impl BotGateway for RecordingBot {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<()> {
        self.record(BotCall::Message {
            chat_id,
            text: text.to_string(),
            keyboard,
        })
    }

    async fn answer_callback_query(&self, query_id: &str) -> Result<()> {
        self.record(BotCall::CallbackAnswer {
            query_id: query_id.to_string(),
        })
    }

    async fn answer_pre_checkout_query(
        &self,
        query_id: &str,
        ok: bool,
        error_message: Option<&str>,
    ) -> Result<()> {
        self.record(BotCall::PreCheckoutAnswer {
            query_id: query_id.to_string(),
            ok,
            error_message: error_message.map(str::to_string),
        })
    }

    async fn send_invoice(&self, chat_id: i64, invoice: Invoice) -> Result<()> {
        self.record(BotCall::Invoice { chat_id, invoice })
    }
}
