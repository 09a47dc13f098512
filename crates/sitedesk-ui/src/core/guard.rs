//! Pure route-guard decision logic, extracted for non-wasm testing.
//!
//! The wasm component owns the provider calls; everything that can be
//! decided from their results lives here.

use sitedesk_identity::profile::UserId;
use sitedesk_identity::role::{Destination, Role, RoleBinding, RoleResolution};

/// What the guard should render or do after an evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Render the protected children for this binding.
    Render(RoleBinding),
    /// Send the user to the role-appropriate sign-in entry.
    RedirectToEntry(Destination),
    /// Send the user to the neutral landing with an access-denied notice.
    RedirectDenied(Destination),
}

/// Outcome when the provider reports no current user.
#[must_use]
pub const fn entry_redirect(required: Role) -> GuardOutcome {
    GuardOutcome::RedirectToEntry(required.entry())
}

/// Decide the outcome from a completed role resolution.
///
/// `NotFound` and an unassigned role are both insufficient authorization;
/// neither ever renders the protected children.
#[must_use]
pub fn decide(required: Role, user_id: UserId, resolution: &RoleResolution) -> GuardOutcome {
    match resolution {
        RoleResolution::Found(profile) => match profile.role {
            Some(role) if role == required => GuardOutcome::Render(RoleBinding { user_id, role }),
            _ => GuardOutcome::RedirectDenied(Destination::Home),
        },
        RoleResolution::NotFound => GuardOutcome::RedirectDenied(Destination::Home),
    }
}

#[cfg(test)]
mod tests {
    use super::{GuardOutcome, decide, entry_redirect};
    use sitedesk_identity::profile::Profile;
    use sitedesk_identity::role::{Destination, Role, RoleBinding, RoleResolution};
    use uuid::Uuid;

    fn profile(role: Option<Role>) -> RoleResolution {
        RoleResolution::Found(Profile {
            user_id: Uuid::nil(),
            role,
            password_reset_in_progress: false,
        })
    }

    #[test]
    fn matching_role_renders_a_fresh_binding() {
        let outcome = decide(Role::Admin, Uuid::nil(), &profile(Some(Role::Admin)));
        assert_eq!(
            outcome,
            GuardOutcome::Render(RoleBinding {
                user_id: Uuid::nil(),
                role: Role::Admin,
            })
        );
    }

    #[test]
    fn client_on_an_admin_route_is_denied_to_the_neutral_landing() {
        let outcome = decide(Role::Admin, Uuid::nil(), &profile(Some(Role::Client)));
        assert_eq!(outcome, GuardOutcome::RedirectDenied(Destination::Home));
    }

    #[test]
    fn unassigned_and_missing_profiles_are_both_denied() {
        assert_eq!(
            decide(Role::Client, Uuid::nil(), &profile(None)),
            GuardOutcome::RedirectDenied(Destination::Home)
        );
        assert_eq!(
            decide(Role::Client, Uuid::nil(), &RoleResolution::NotFound),
            GuardOutcome::RedirectDenied(Destination::Home)
        );
    }

    #[test]
    fn missing_session_redirects_to_the_matching_entry() {
        assert_eq!(
            entry_redirect(Role::Admin),
            GuardOutcome::RedirectToEntry(Destination::AdminSignIn)
        );
        assert_eq!(
            entry_redirect(Role::Client),
            GuardOutcome::RedirectToEntry(Destination::SignIn)
        );
    }
}
