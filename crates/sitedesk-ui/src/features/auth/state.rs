//! Auth slice mirrored from the reconciler's view state.

use sitedesk_identity::reconciler::{AuthNotice, AuthViewState};
use sitedesk_identity::session::UserIdentity;

/// Auth state slice consumed by the auth screens and the route shell.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AuthSlice {
    /// Latest reconciler snapshot.
    pub view_state: AuthViewState,
    /// Identity asserted by the most recent provider event, if any.
    pub user: Option<UserIdentity>,
}

/// Apply a fresh reconciler snapshot to the slice.
pub fn apply_view_state(slice: &mut AuthSlice, next: AuthViewState, user: Option<UserIdentity>) {
    slice.view_state = next;
    slice.user = user;
}

/// Translation key for a notice.
#[must_use]
pub const fn notice_key(notice: AuthNotice) -> &'static str {
    match notice {
        AuthNotice::PasswordUpdated => "auth.notice_password_updated",
        AuthNotice::SessionExpired => "auth.notice_session_expired",
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthSlice, apply_view_state, notice_key};
    use sitedesk_identity::reconciler::{AuthNotice, AuthView, AuthViewState};
    use sitedesk_identity::session::UserIdentity;
    use uuid::Uuid;

    #[test]
    fn snapshots_replace_the_slice_wholesale() {
        let mut slice = AuthSlice::default();
        let next = AuthViewState {
            view: AuthView::UpdatePassword,
            recovery_mode: true,
            ..AuthViewState::default()
        };
        let user = UserIdentity {
            id: Uuid::nil(),
            email: "pm@sitedesk.test".to_string(),
        };

        apply_view_state(&mut slice, next.clone(), Some(user.clone()));

        assert_eq!(slice.view_state, next);
        assert_eq!(slice.user, Some(user));

        apply_view_state(&mut slice, AuthViewState::default(), None);
        assert_eq!(slice, AuthSlice::default());
    }

    #[test]
    fn notices_map_to_distinct_keys() {
        assert_ne!(
            notice_key(AuthNotice::PasswordUpdated),
            notice_key(AuthNotice::SessionExpired)
        );
    }
}
