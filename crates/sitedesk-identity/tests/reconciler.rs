use sitedesk_identity::reconciler::{AuthNotice, AuthView, AuthViewState, NO_PROFILE_MESSAGE, NO_ROLE_MESSAGE, Reconciler};
use sitedesk_identity::error::StoreError;
use sitedesk_identity::events::{AuthChange, AuthEvent};
use sitedesk_identity::role::Destination;
use sitedesk_test_support::fixtures;
use sitedesk_test_support::mocks::{
    FakeGateway, MemoryLocalState, RecordingDelay, RecordingNavigator, ScriptedProfiles,
};
use std::cell::RefCell;
use std::rc::Rc;

struct Harness {
    profiles: Rc<ScriptedProfiles>,
    local: Rc<MemoryLocalState>,
    visits: Rc<RefCell<Vec<Destination>>>,
    reconciler: Reconciler<
        FakeGateway,
        ScriptedProfiles,
        MemoryLocalState,
        RecordingNavigator,
        RecordingDelay,
    >,
}

fn harness(gateway: FakeGateway, profiles: ScriptedProfiles) -> Harness {
    let gateway = Rc::new(gateway);
    let profiles = Rc::new(profiles);
    let local = Rc::new(MemoryLocalState::default());
    let navigator = RecordingNavigator::default();
    let visits = Rc::clone(&navigator.visits);
    let reconciler = Reconciler::new(
        Rc::clone(&gateway),
        Rc::clone(&profiles),
        Rc::clone(&local),
        navigator,
        Rc::new(RecordingDelay::default()),
    );
    Harness {
        profiles,
        local,
        visits,
        reconciler,
    }
}

fn signed_in() -> AuthChange {
    AuthChange {
        event: AuthEvent::SignedIn,
        session: Some(fixtures::session()),
    }
}

fn event(event: AuthEvent) -> AuthChange {
    AuthChange {
        event,
        session: Some(fixtures::session()),
    }
}

#[tokio::test]
async fn signed_in_navigates_per_role() {
    let mut admin = harness(
        FakeGateway::signed_in(fixtures::user()),
        ScriptedProfiles::always(Some(fixtures::admin_profile())),
    );
    admin.reconciler.handle(signed_in()).await;
    assert_eq!(admin.visits.borrow().as_slice(), &[Destination::AdminHome]);
    assert_eq!(admin.reconciler.state().error, None);

    let mut client = harness(
        FakeGateway::signed_in(fixtures::user()),
        ScriptedProfiles::always(Some(fixtures::client_profile())),
    );
    client.reconciler.handle(signed_in()).await;
    assert_eq!(
        client.visits.borrow().as_slice(),
        &[Destination::ClientHome]
    );
}

#[tokio::test]
async fn signed_in_is_ignored_while_in_recovery_mode() {
    let mut h = harness(
        FakeGateway::signed_in(fixtures::user()),
        ScriptedProfiles::always(Some(fixtures::admin_profile())),
    );
    h.reconciler.handle(event(AuthEvent::PasswordRecovery)).await;

    for _ in 0..3 {
        h.reconciler.handle(signed_in()).await;
    }

    assert!(h.visits.borrow().is_empty());
    assert_eq!(h.reconciler.state().view, AuthView::UpdatePassword);
    assert!(h.reconciler.state().recovery_mode);
}

#[tokio::test]
async fn missing_profile_surfaces_error_and_cleans_up() {
    let mut h = harness(
        FakeGateway::signed_in(fixtures::user()),
        ScriptedProfiles::always(None),
    );

    h.reconciler.handle(signed_in()).await;

    assert_eq!(
        h.reconciler.state().error.as_deref(),
        Some(NO_PROFILE_MESSAGE)
    );
    assert!(h.visits.borrow().is_empty());
    assert!(h.local.storage_cleared.get());
}

#[tokio::test]
async fn unassigned_role_is_not_access() {
    let mut h = harness(
        FakeGateway::signed_in(fixtures::user()),
        ScriptedProfiles::always(Some(fixtures::unassigned_profile())),
    );

    h.reconciler.handle(signed_in()).await;

    assert_eq!(h.reconciler.state().error.as_deref(), Some(NO_ROLE_MESSAGE));
    assert!(h.visits.borrow().is_empty());
    assert!(h.local.storage_cleared.get());
}

#[tokio::test]
async fn open_latch_reenters_recovery_without_navigating() {
    let mut h = harness(
        FakeGateway::signed_in(fixtures::user()),
        ScriptedProfiles::always(Some(fixtures::recovering_profile())),
    );

    h.reconciler.handle(signed_in()).await;

    assert!(h.visits.borrow().is_empty());
    assert!(h.reconciler.state().recovery_mode);
    assert_eq!(h.reconciler.state().view, AuthView::UpdatePassword);
}

#[tokio::test]
async fn store_failure_during_sign_in_cleans_up() {
    let profiles = ScriptedProfiles::always(Some(fixtures::admin_profile()));
    profiles.push_fetch(Err(StoreError::Transport("gateway timeout".to_string())));
    let mut h = harness(FakeGateway::signed_in(fixtures::user()), profiles);

    h.reconciler.handle(signed_in()).await;

    assert!(
        h.reconciler
            .state()
            .error
            .as_deref()
            .is_some_and(|message| message.contains("gateway timeout"))
    );
    assert!(h.visits.borrow().is_empty());
    assert!(h.local.storage_cleared.get());
}

#[tokio::test]
async fn recovery_event_flips_view_and_persists_latch() {
    let mut h = harness(
        FakeGateway::signed_in(fixtures::user()),
        ScriptedProfiles::always(Some(fixtures::client_profile())),
    );

    h.reconciler.handle(event(AuthEvent::PasswordRecovery)).await;

    assert_eq!(h.reconciler.state().view, AuthView::UpdatePassword);
    assert!(h.reconciler.state().recovery_mode);
    assert_eq!(
        h.profiles.latch_writes.borrow().as_slice(),
        &[(fixtures::user_id(), true)]
    );
}

#[tokio::test]
async fn latch_write_failure_does_not_block_the_view() {
    let profiles = ScriptedProfiles::always(Some(fixtures::client_profile()));
    *profiles.latch_error.borrow_mut() =
        Some(StoreError::Rejected("row level security".to_string()));
    let mut h = harness(FakeGateway::signed_in(fixtures::user()), profiles);

    h.reconciler.handle(event(AuthEvent::PasswordRecovery)).await;

    assert_eq!(h.reconciler.state().view, AuthView::UpdatePassword);
    assert!(h.reconciler.state().recovery_mode);
}

#[tokio::test]
async fn user_updated_completes_recovery() {
    let mut h = harness(
        FakeGateway::signed_in(fixtures::user()),
        ScriptedProfiles::always(Some(fixtures::client_profile())),
    );
    h.reconciler.handle(event(AuthEvent::PasswordRecovery)).await;

    h.reconciler.handle(event(AuthEvent::UserUpdated)).await;

    let state = h.reconciler.state();
    assert!(state.password_updated);
    assert_eq!(state.notice, Some(AuthNotice::PasswordUpdated));
    assert_eq!(state.view, AuthView::SignIn);
    assert_eq!(h.visits.borrow().as_slice(), &[Destination::SignIn]);
    assert!(h.local.storage_cleared.get());
    assert_eq!(
        h.profiles.latch_writes.borrow().as_slice(),
        &[(fixtures::user_id(), true), (fixtures::user_id(), false)]
    );
}

#[tokio::test]
async fn replayed_user_updated_has_no_further_side_effects() {
    let mut h = harness(
        FakeGateway::signed_in(fixtures::user()),
        ScriptedProfiles::always(Some(fixtures::client_profile())),
    );
    h.reconciler.handle(event(AuthEvent::PasswordRecovery)).await;
    h.reconciler.handle(event(AuthEvent::UserUpdated)).await;
    let wipes = h.local.wipes.get();
    let visits = h.visits.borrow().len();
    let latch_writes = h.profiles.latch_writes.borrow().len();

    h.reconciler.handle(event(AuthEvent::UserUpdated)).await;

    assert_eq!(h.local.wipes.get(), wipes);
    assert_eq!(h.visits.borrow().len(), visits);
    assert_eq!(h.profiles.latch_writes.borrow().len(), latch_writes);
}

#[tokio::test]
async fn user_updated_outside_recovery_is_ignored() {
    let mut h = harness(
        FakeGateway::signed_in(fixtures::user()),
        ScriptedProfiles::always(Some(fixtures::recovering_profile())),
    );

    h.reconciler.handle(event(AuthEvent::UserUpdated)).await;

    assert_eq!(h.reconciler.state(), &AuthViewState::default());
    assert!(h.profiles.latch_writes.borrow().is_empty());
}

#[tokio::test]
async fn user_updated_resolution_failure_keeps_the_update_view() {
    let profiles = ScriptedProfiles::always(Some(fixtures::client_profile()));
    let mut h = harness(FakeGateway::signed_in(fixtures::user()), profiles);
    h.reconciler.handle(event(AuthEvent::PasswordRecovery)).await;
    h.profiles
        .push_fetch(Err(StoreError::Transport("connection reset".to_string())));

    h.reconciler.handle(event(AuthEvent::UserUpdated)).await;

    assert!(h.reconciler.state().error.is_some());
    assert_eq!(h.reconciler.state().view, AuthView::UpdatePassword);
    assert!(h.visits.borrow().is_empty());
    assert!(!h.reconciler.state().password_updated);
}

#[tokio::test]
async fn signed_out_resets_state_but_keeps_the_notice() {
    let mut h = harness(
        FakeGateway::signed_in(fixtures::user()),
        ScriptedProfiles::always(Some(fixtures::client_profile())),
    );
    h.reconciler.handle(event(AuthEvent::PasswordRecovery)).await;
    h.reconciler.handle(event(AuthEvent::UserUpdated)).await;

    h.reconciler
        .handle(AuthChange {
            event: AuthEvent::SignedOut,
            session: None,
        })
        .await;

    let state = h.reconciler.state();
    assert_eq!(state.view, AuthView::SignIn);
    assert!(!state.recovery_mode);
    assert!(!state.password_updated);
    assert_eq!(state.error, None);
    assert_eq!(state.notice, Some(AuthNotice::PasswordUpdated));
    assert!(h.local.storage_cleared.get());
}

#[tokio::test]
async fn token_refreshed_is_a_no_op() {
    let mut h = harness(
        FakeGateway::signed_in(fixtures::user()),
        ScriptedProfiles::always(Some(fixtures::admin_profile())),
    );

    h.reconciler.handle(event(AuthEvent::TokenRefreshed)).await;

    assert_eq!(h.reconciler.state(), &AuthViewState::default());
    assert!(h.visits.borrow().is_empty());
}
