//! Ticket ledger and redemption tests over the in-memory store.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use audio_guide_core::{GuideError, TicketCode, TicketLedger};
use audio_guide_testing::InMemoryTicketStore;
use std::sync::Arc;

fn ledger() -> (TicketLedger, InMemoryTicketStore) {
    let store = InMemoryTicketStore::new();
    (TicketLedger::new(Arc::new(store.clone())), store)
}

#[tokio::test]
async fn test_create_then_lookup() {
    let (ledger, _) = ledger();
    let code = TicketCode::generate();

    ledger.create(code).await.unwrap();

    let ticket = ledger.lookup(code).await.unwrap().expect("ticket recorded");
    assert_eq!(ticket.code, code);
    assert!(!ticket.used);
}

#[tokio::test]
async fn test_lookup_unknown_code_is_none() {
    let (ledger, _) = ledger();
    assert!(ledger.lookup(TicketCode::generate()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_create_is_conflict_and_keeps_one_row() {
    let (ledger, store) = ledger();
    let code = TicketCode::generate();

    ledger.create(code).await.unwrap();
    ledger.activate(code).await.unwrap();

    let err = ledger.create(code).await.unwrap_err();
    assert!(matches!(err, GuideError::Conflict(_)));
    assert_eq!(store.len(), 1);
    // The existing row is untouched.
    assert!(store.get(code).unwrap().used);
}

#[tokio::test]
async fn test_activate_exactly_once() {
    let (ledger, _) = ledger();
    let code = TicketCode::generate();
    ledger.create(code).await.unwrap();

    assert!(ledger.activate(code).await.unwrap());
    assert!(!ledger.activate(code).await.unwrap());
    assert!(ledger.lookup(code).await.unwrap().unwrap().used);
}

#[tokio::test]
async fn test_activate_unknown_code_is_false() {
    let (ledger, store) = ledger();
    assert!(!ledger.activate(TicketCode::generate()).await.unwrap());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_storage_failure_is_not_reported_as_used() {
    let (ledger, store) = ledger();
    let code = TicketCode::generate();
    ledger.create(code).await.unwrap();

    store.set_unavailable(true);
    let err = ledger.activate(code).await.unwrap_err();
    assert!(matches!(err, GuideError::Storage(_)));

    store.set_unavailable(false);
    assert!(ledger.activate(code).await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_activation_has_single_winner() {
    let (ledger, _) = ledger();
    let code = TicketCode::generate();
    ledger.create(code).await.unwrap();

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let ledger = ledger.clone();
            tokio::spawn(async move { ledger.activate(code).await })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap() {
            winners += 1;
        }
    }

    assert_eq!(winners, 1);
}
