use sitedesk_identity::resolver::{ROLE_LOOKUP_BACKOFF, RoleResolver};
use sitedesk_identity::error::StoreError;
use sitedesk_identity::role::RoleResolution;
use sitedesk_test_support::fixtures;
use sitedesk_test_support::mocks::{RecordingDelay, ScriptedProfiles};
use std::rc::Rc;
use std::time::Duration;

fn resolver(
    profiles: ScriptedProfiles,
) -> (
    RoleResolver<ScriptedProfiles, RecordingDelay>,
    Rc<RecordingDelay>,
) {
    let delay = Rc::new(RecordingDelay::default());
    (
        RoleResolver::new(Rc::new(profiles), Rc::clone(&delay)),
        delay,
    )
}

#[tokio::test]
async fn immediate_hit_resolves_without_waiting() {
    let (resolver, delay) = resolver(ScriptedProfiles::always(Some(fixtures::admin_profile())));

    let outcome = resolver.resolve(fixtures::user_id()).await.expect("resolve");

    assert_eq!(
        outcome,
        RoleResolution::Found(fixtures::admin_profile())
    );
    assert!(delay.waits.borrow().is_empty());
}

#[tokio::test]
async fn row_appearing_within_the_budget_resolves() {
    let profiles = ScriptedProfiles::default();
    profiles.push_fetch(Ok(None));
    profiles.push_fetch(Ok(None));
    profiles.push_fetch(Ok(Some(fixtures::client_profile())));
    let (resolver, delay) = resolver(profiles);

    let outcome = resolver.resolve(fixtures::user_id()).await.expect("resolve");

    assert_eq!(
        outcome,
        RoleResolution::Found(fixtures::client_profile())
    );
    let total: Duration = delay.waits.borrow().iter().sum();
    assert_eq!(delay.waits.borrow().len(), 2);
    assert!(total >= Duration::from_secs(2));
    assert!(total < Duration::from_secs(4));
}

#[tokio::test]
async fn exhausted_budget_reports_not_found() {
    let (resolver, delay) = resolver(ScriptedProfiles::always(None));

    let outcome = resolver.resolve(fixtures::user_id()).await.expect("resolve");

    assert_eq!(outcome, RoleResolution::NotFound);
    assert_eq!(
        delay.waits.borrow().as_slice(),
        &[ROLE_LOOKUP_BACKOFF, ROLE_LOOKUP_BACKOFF]
    );
}

#[tokio::test]
async fn query_errors_propagate_without_retry() {
    let profiles = ScriptedProfiles::always(Some(fixtures::client_profile()));
    profiles.push_fetch(Err(StoreError::Transport("connection reset".to_string())));
    let (resolver, delay) = resolver(profiles);

    let outcome = resolver.resolve(fixtures::user_id()).await;

    assert_eq!(
        outcome,
        Err(StoreError::Transport("connection reset".to_string()))
    );
    assert!(delay.waits.borrow().is_empty());
}
