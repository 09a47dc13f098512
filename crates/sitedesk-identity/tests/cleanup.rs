use sitedesk_identity::cleanup::SessionCleaner;
use sitedesk_identity::error::ProviderError;
use sitedesk_test_support::fixtures;
use sitedesk_test_support::mocks::{FakeGateway, GatewayCall, MemoryLocalState};
use std::rc::Rc;

#[tokio::test]
async fn local_state_is_wiped_even_when_sign_out_fails() {
    let gateway = Rc::new(FakeGateway::signed_in(fixtures::user()));
    *gateway.sign_out_error.borrow_mut() =
        Some(ProviderError::new(Some(503), "logout unavailable"));
    let local = Rc::new(MemoryLocalState::default());
    let cleaner = SessionCleaner::new(Rc::clone(&gateway), Rc::clone(&local));

    cleaner.cleanup().await;

    assert!(local.storage_cleared.get());
    assert!(local.cache_cleared.get());
    assert!(gateway.calls.borrow().contains(&GatewayCall::SignOut));
}

#[tokio::test]
async fn sign_out_is_skipped_without_a_session() {
    let gateway = Rc::new(FakeGateway::default());
    let local = Rc::new(MemoryLocalState::default());
    let cleaner = SessionCleaner::new(Rc::clone(&gateway), Rc::clone(&local));

    cleaner.cleanup().await;

    assert!(!gateway.calls.borrow().contains(&GatewayCall::SignOut));
    assert!(local.storage_cleared.get());
    assert!(local.cache_cleared.get());
}

#[tokio::test]
async fn repeated_cleanup_is_idempotent() {
    let gateway = Rc::new(FakeGateway::signed_in(fixtures::user()));
    let local = Rc::new(MemoryLocalState::default());
    let cleaner = SessionCleaner::new(Rc::clone(&gateway), Rc::clone(&local));

    cleaner.cleanup().await;
    cleaner.cleanup().await;

    // The fake drops its session on sign-out, so only the first pass
    // reaches the provider.
    let sign_outs = gateway
        .calls
        .borrow()
        .iter()
        .filter(|call| **call == GatewayCall::SignOut)
        .count();
    assert_eq!(sign_outs, 1);
    assert_eq!(local.wipes.get(), 2);
}
