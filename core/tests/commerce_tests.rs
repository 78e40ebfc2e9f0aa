//! Commerce gate tests: pre-checkout validation, confirmation, redemption.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use audio_guide_core::ticket::{TICKET_CURRENCY_KEY, TICKET_PRICE_KEY};
use audio_guide_core::{
    CheckoutDecision, CommerceGate, GuideError, PendingPurchase, RejectReason, TicketCode,
    TicketLedger,
};
use audio_guide_testing::{InMemoryConfigStore, InMemoryTicketStore};
use std::sync::Arc;

struct Fixture {
    gate: CommerceGate,
    tickets: InMemoryTicketStore,
    config: InMemoryConfigStore,
}

fn fixture() -> Fixture {
    let tickets = InMemoryTicketStore::new();
    let config = InMemoryConfigStore::with_price("EUR", 500);
    let gate = CommerceGate::new(
        TicketLedger::new(Arc::new(tickets.clone())),
        Arc::new(config.clone()),
    );
    Fixture {
        gate,
        tickets,
        config,
    }
}

fn purchase(payload: &str, currency: &str, total_amount: i64) -> PendingPurchase {
    PendingPurchase {
        payload: payload.to_string(),
        currency: currency.to_string(),
        total_amount,
    }
}

async fn decide(gate: &CommerceGate, purchase: &PendingPurchase) -> CheckoutDecision {
    gate.validate_pending_purchase(purchase).await.unwrap()
}

#[tokio::test]
async fn test_fresh_code_at_published_price_is_accepted() {
    let f = fixture();
    let code = f.gate.issue_code();

    let decision = decide(&f.gate, &purchase(&code.to_string(), "EUR", 500)).await;
    assert_eq!(decision, CheckoutDecision::Accept);
}

#[tokio::test]
async fn test_missing_price_disables_payments() {
    let f = fixture();
    f.config.remove(TICKET_PRICE_KEY);
    let code = f.gate.issue_code();

    let decision = decide(&f.gate, &purchase(&code.to_string(), "EUR", 500)).await;
    assert_eq!(decision.reason(), Some(RejectReason::PaymentsDisabled));
}

#[tokio::test]
async fn test_missing_currency_disables_payments() {
    let f = fixture();
    f.config.remove(TICKET_CURRENCY_KEY);
    let code = f.gate.issue_code();

    let decision = decide(&f.gate, &purchase(&code.to_string(), "EUR", 500)).await;
    assert_eq!(decision.reason(), Some(RejectReason::PaymentsDisabled));
}

#[tokio::test]
async fn test_non_integer_price_disables_payments() {
    let f = fixture();
    f.config.set(TICKET_PRICE_KEY, "5.00");
    let code = f.gate.issue_code();

    let decision = decide(&f.gate, &purchase(&code.to_string(), "EUR", 500)).await;
    assert_eq!(decision.reason(), Some(RejectReason::PaymentsDisabled));
    assert!(f.gate.published_price().await.unwrap().is_none());
}

#[tokio::test]
async fn test_currency_mismatch_is_rejected() {
    let f = fixture();
    let code = f.gate.issue_code();

    let decision = decide(&f.gate, &purchase(&code.to_string(), "USD", 500)).await;
    assert_eq!(decision.reason(), Some(RejectReason::CurrencyMismatch));
}

#[tokio::test]
async fn test_amount_mismatch_is_rejected() {
    let f = fixture();
    let code = f.gate.issue_code();

    let decision = decide(&f.gate, &purchase(&code.to_string(), "EUR", 499)).await;
    assert_eq!(decision.reason(), Some(RejectReason::AmountMismatch));
}

#[tokio::test]
async fn test_stale_price_is_rejected() {
    let f = fixture();
    let code = f.gate.issue_code();
    // Invoice issued at 500, operator raised the price before checkout.
    f.config.set(TICKET_PRICE_KEY, "700");

    let decision = decide(&f.gate, &purchase(&code.to_string(), "EUR", 500)).await;
    assert_eq!(decision.reason(), Some(RejectReason::AmountMismatch));
}

#[tokio::test]
async fn test_malformed_payload_is_rejected() {
    let f = fixture();

    let decision = decide(&f.gate, &purchase("not-a-code", "EUR", 500)).await;
    assert_eq!(decision.reason(), Some(RejectReason::MalformedCode));
}

#[tokio::test]
async fn test_replayed_payload_is_rejected() {
    let f = fixture();
    let code = f.gate.issue_code();
    f.gate.confirm_purchase(code).await.unwrap();

    let decision = decide(&f.gate, &purchase(&code.to_string(), "EUR", 500)).await;
    assert_eq!(decision.reason(), Some(RejectReason::DuplicateCode));
}

#[tokio::test]
async fn test_validation_does_not_write() {
    let f = fixture();
    let code = f.gate.issue_code();

    decide(&f.gate, &purchase(&code.to_string(), "EUR", 500)).await;
    assert!(f.tickets.is_empty());
}

#[tokio::test]
async fn test_storage_failure_surfaces_as_error() {
    let f = fixture();
    f.config.set_unavailable(true);
    let code = f.gate.issue_code();

    let err = f
        .gate
        .validate_pending_purchase(&purchase(&code.to_string(), "EUR", 500))
        .await
        .unwrap_err();
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_ledger_failure_surfaces_as_error() {
    let f = fixture();
    f.tickets.set_unavailable(true);
    let code = f.gate.issue_code();

    let result = f
        .gate
        .validate_pending_purchase(&purchase(&code.to_string(), "EUR", 500))
        .await;
    assert!(matches!(result, Err(GuideError::Storage(_))));
}

#[tokio::test]
async fn test_duplicate_confirmation_is_conflict() {
    let f = fixture();
    let code = f.gate.issue_code();

    f.gate.confirm_purchase(code).await.unwrap();
    let err = f.gate.confirm_purchase(code).await.unwrap_err();
    assert!(matches!(err, GuideError::Conflict(_)));
}

#[tokio::test]
async fn test_issued_codes_are_distinct() {
    let f = fixture();
    let a: TicketCode = f.gate.issue_code();
    let b: TicketCode = f.gate.issue_code();
    assert_ne!(a, b);
}

#[tokio::test]
async fn test_full_sale_lifecycle() {
    let f = fixture();
    let code = f.gate.issue_code();

    let decision = decide(&f.gate, &purchase(&code.to_string(), "EUR", 500)).await;
    assert!(decision.is_accepted());

    f.gate.confirm_purchase(code).await.unwrap();
    assert!(f.gate.redeem(code).await.unwrap());
    assert!(!f.gate.redeem(code).await.unwrap());
    assert!(f.tickets.get(code).unwrap().used);
}

#[tokio::test]
async fn test_redeem_unsold_code_is_false() {
    let f = fixture();
    assert!(!f.gate.redeem(f.gate.issue_code()).await.unwrap());
}
