use chrono::{Duration, Utc};
use sitedesk_test_support::fixtures;

#[test]
fn expiry_compares_against_the_given_instant() {
    let now = Utc::now();
    let mut session = fixtures::session();
    session.expires_at = Some(now - Duration::seconds(1));
    assert!(session.is_expired(now));
    session.expires_at = Some(now + Duration::seconds(1));
    assert!(!session.is_expired(now));
    session.expires_at = None;
    assert!(!session.is_expired(now));
}
