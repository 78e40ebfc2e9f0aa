//! Telegram webhook.
//!
//! - POST /bot - Dispatch one `Update`
//!
//! ```text
//! callback "buy_ticket" ──► invoice (payload = fresh ticket code)
//! pre_checkout_query    ──► validate pending purchase, answer ok / error
//! successful_payment    ──► confirm purchase, send code + web app button
//! any other message     ──► welcome with "start" and "buy" buttons
//! ```

use crate::i18n::{Language, MessageId};
use crate::metrics;
use crate::server::state::AppState;
use audio_guide_core::providers::{InlineButton, InlineKeyboard, Invoice, LabeledPrice};
use audio_guide_core::{CheckoutDecision, GuideError, PendingPurchase, RejectReason, TicketCode};
use audio_guide_telegram::{CallbackQuery, Message, PreCheckoutQuery, SuccessfulPayment, Update};
use audio_guide_web::{AppError, JSend, WebResult};
use axum::{extract::rejection::JsonRejection, extract::State, Json};

/// Callback data of the "buy a ticket" button.
pub const BUY_TICKET: &str = "buy_ticket";

/// Handle one webhook update.
///
/// # Errors
///
/// - 400: body is not an update, or a callback carries no data
/// - 500: storage or transport failure (Telegram redelivers the update)
pub async fn webhook(
    State(state): State<AppState>,
    body: Result<Json<Update>, JsonRejection>,
) -> WebResult<JSend<()>> {
    let Json(update) = body.map_err(|e| AppError::bad_request(e.body_text()))?;
    let language = Language::from_code(update.language_code());
    tracing::debug!(update_id = update.update_id, ?language, "Webhook update");

    if let Some(query) = update.callback_query {
        handle_callback(&state, query, language).await?;
    } else if let Some(query) = update.pre_checkout_query {
        handle_pre_checkout(&state, query, language).await?;
    } else if let Some(message) = update.message {
        handle_message(&state, message, language).await?;
    } else {
        tracing::debug!(update_id = update.update_id, "Ignoring update");
    }

    Ok(JSend::empty())
}

async fn handle_callback(
    state: &AppState,
    query: CallbackQuery,
    language: Language,
) -> WebResult<()> {
    let Some(data) = query.data.as_deref() else {
        return Err(AppError::bad_request("callback query without data"));
    };

    state.bot.answer_callback_query(&query.id).await?;

    if data != BUY_TICKET {
        tracing::debug!(%data, "Ignoring callback");
        return Ok(());
    }

    let chat_id = query
        .message
        .as_ref()
        .map_or(query.from.id, |message| message.chat.id);

    let Some(price) = state.gate.published_price().await? else {
        let text = state
            .translator
            .translate(MessageId::PaymentsUnavailable, language, &[]);
        state.bot.send_message(chat_id, &text, None).await?;
        return Ok(());
    };

    let code = state.gate.issue_code();
    let invoice = Invoice {
        title: state.translator.translate(MessageId::InvoiceTitle, language, &[]),
        description: state
            .translator
            .translate(MessageId::InvoiceDescription, language, &[]),
        payload: code.to_string(),
        currency: price.currency,
        prices: vec![LabeledPrice {
            label: state
                .translator
                .translate(MessageId::InvoicePriceLabel, language, &[]),
            amount: price.amount,
        }],
    };

    state.bot.send_invoice(chat_id, invoice).await?;
    tracing::info!(ticket = %code, chat_id, "Invoice sent");
    Ok(())
}

async fn handle_pre_checkout(
    state: &AppState,
    query: PreCheckoutQuery,
    language: Language,
) -> WebResult<()> {
    let purchase = PendingPurchase {
        payload: query.invoice_payload,
        currency: query.currency,
        total_amount: query.total_amount,
    };

    let decision = match state.gate.validate_pending_purchase(&purchase).await {
        Ok(decision) => {
            metrics::record_checkout(decision.reason().map_or("accepted", RejectReason::as_str));
            decision
        }
        Err(e) => {
            // Storage failures reject.
            tracing::error!(error = %e, payload = %purchase.payload, "Pre-checkout validation failed");
            metrics::record_checkout("error");
            CheckoutDecision::Reject(RejectReason::PaymentsDisabled)
        }
    };

    let error_message = match decision {
        CheckoutDecision::Accept => None,
        CheckoutDecision::Reject(RejectReason::PaymentsDisabled) => Some(
            state
                .translator
                .translate(MessageId::PaymentsUnavailable, language, &[]),
        ),
        CheckoutDecision::Reject(_) => Some(
            state
                .translator
                .translate(MessageId::CheckoutRejected, language, &[]),
        ),
    };

    state
        .bot
        .answer_pre_checkout_query(&query.id, decision.is_accepted(), error_message.as_deref())
        .await?;
    Ok(())
}

async fn handle_message(state: &AppState, message: Message, language: Language) -> WebResult<()> {
    let chat_id = message.chat.id;
    if let Some(payment) = message.successful_payment {
        return handle_payment(state, chat_id, payment, language).await;
    }

    let keyboard = InlineKeyboard::column(vec![
        InlineButton::WebApp {
            text: state
                .translator
                .translate(MessageId::StartTourButton, language, &[]),
            url: state.web_app_url.clone(),
        },
        InlineButton::Callback {
            text: state
                .translator
                .translate(MessageId::BuyTicketButton, language, &[]),
            data: BUY_TICKET.to_string(),
        },
    ]);

    let text = state.translator.translate(MessageId::Welcome, language, &[]);
    state.bot.send_message(chat_id, &text, Some(keyboard)).await?;
    Ok(())
}

async fn handle_payment(
    state: &AppState,
    chat_id: i64,
    payment: SuccessfulPayment,
    language: Language,
) -> WebResult<()> {
    let Ok(code) = payment.invoice_payload.parse::<TicketCode>() else {
        tracing::error!(
            payload = %payment.invoice_payload,
            charge_id = ?payment.telegram_payment_charge_id,
            "Captured payment carries no ticket code"
        );
        return Ok(());
    };

    match state.gate.confirm_purchase(code).await {
        Ok(()) => {
            metrics::record_ticket_sold();
            tracing::info!(
                ticket = %code,
                currency = %payment.currency,
                amount = payment.total_amount,
                "Ticket sold"
            );
        }
        // Redelivery: the sale exists, the previous send may not have reached the buyer.
        Err(GuideError::Conflict(_)) => {
            tracing::info!(ticket = %code, "Duplicate payment notification, resending ticket");
        }
        Err(e) => return Err(e.into()),
    }

    let code = code.to_string();
    let text = state
        .translator
        .translate(MessageId::PurchaseComplete, language, &[("code", &code)]);
    let keyboard = InlineKeyboard::column(vec![InlineButton::WebApp {
        text: state
            .translator
            .translate(MessageId::StartTourButton, language, &[]),
        url: ticket_url(&state.web_app_url, &code),
    }]);

    state.bot.send_message(chat_id, &text, Some(keyboard)).await?;
    Ok(())
}

fn ticket_url(web_app_url: &str, code: &str) -> String {
    let separator = if web_app_url.contains('?') { '&' } else { '?' };
    format!("{web_app_url}{separator}ticket={code}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_url_appends_query() {
        assert_eq!(
            ticket_url("https://guide.example/app", "abc"),
            "https://guide.example/app?ticket=abc"
        );
        assert_eq!(
            ticket_url("https://guide.example/app?lang=ru", "abc"),
            "https://guide.example/app?lang=ru&ticket=abc"
        );
    }
}
