//! `TelegramBot` against a mock Bot API server.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use audio_guide_core::providers::{BotGateway, InlineButton, InlineKeyboard, Invoice, LabeledPrice};
use audio_guide_core::GuideError;
use audio_guide_telegram::TelegramBot;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn bot(server: &MockServer) -> TelegramBot {
    TelegramBot::new("123:abc".to_string(), "provider-token".to_string()).with_api_url(server.uri())
}

#[tokio::test]
async fn test_send_message_posts_keyboard() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123:abc/sendMessage"))
        .and(body_json(json!({
            "chat_id": 42,
            "text": "hello",
            "reply_markup": {
                "inline_keyboard": [[{"text": "Buy", "callback_data": "buy_ticket"}]]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": {"message_id": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let keyboard = InlineKeyboard::column(vec![InlineButton::Callback {
        text: "Buy".into(),
        data: "buy_ticket".into(),
    }]);

    bot(&server)
        .send_message(42, "hello", Some(keyboard))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_send_invoice_carries_provider_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123:abc/sendInvoice"))
        .and(body_json(json!({
            "chat_id": 42,
            "title": "Tour ticket",
            "description": "Ticket that starts the tour",
            "payload": "code",
            "provider_token": "provider-token",
            "currency": "EUR",
            "prices": [{"label": "Price", "amount": 500}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let invoice = Invoice {
        title: "Tour ticket".into(),
        description: "Ticket that starts the tour".into(),
        payload: "code".into(),
        currency: "EUR".into(),
        prices: vec![LabeledPrice {
            label: "Price".into(),
            amount: 500,
        }],
    };

    bot(&server).send_invoice(42, invoice).await.unwrap();
}

#[tokio::test]
async fn test_pre_checkout_answer_with_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123:abc/answerPreCheckoutQuery"))
        .and(body_json(json!({
            "pre_checkout_query_id": "pcq",
            "ok": false,
            "error_message": "Price changed"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": true})))
        .expect(1)
        .mount(&server)
        .await;

    bot(&server)
        .answer_pre_checkout_query("pcq", false, Some("Price changed"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_api_error_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123:abc/answerCallbackQuery"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: query is too old"
        })))
        .mount(&server)
        .await;

    let err = bot(&server).answer_callback_query("old").await.unwrap_err();
    match err {
        GuideError::Transport(message) => {
            assert!(message.contains("query is too old"), "{message}");
            assert!(!message.contains("123:abc"), "token leaked: {message}");
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_false_answer_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123:abc/answerCallbackQuery"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": false})))
        .mount(&server)
        .await;

    let err = bot(&server).answer_callback_query("q").await.unwrap_err();
    assert!(matches!(err, GuideError::Transport(_)));
}
