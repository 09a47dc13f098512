//! Recovery-mode derivation from navigation URLs and reconciler state.

/// Query/fragment marker carried by the provider's recovery links.
pub const RECOVERY_MARKER: &str = "type=recovery";

/// Whether a navigation URL marks a password-recovery flow.
#[must_use]
pub fn location_indicates_recovery(search: &str, hash: &str) -> bool {
    search.contains(RECOVERY_MARKER) || hash.contains(RECOVERY_MARKER)
}

/// Authoritative recovery gate: the URL marker or the reconciler latch.
///
/// Checked before every transition that would skip current-password
/// verification or suppress post-sign-in navigation.
#[must_use]
pub const fn in_recovery(url_marks_recovery: bool, recovery_latch: bool) -> bool {
    url_marks_recovery || recovery_latch
}

#[cfg(test)]
mod tests {
    use super::{in_recovery, location_indicates_recovery};

    #[test]
    fn recovery_marker_is_detected_in_query_and_fragment() {
        assert!(location_indicates_recovery("?type=recovery", ""));
        assert!(location_indicates_recovery(
            "",
            "#access_token=abc&type=recovery"
        ));
        assert!(!location_indicates_recovery("?tab=projects", "#milestones"));
        assert!(!location_indicates_recovery("", ""));
    }

    #[test]
    fn gate_opens_on_either_source() {
        assert!(in_recovery(true, false));
        assert!(in_recovery(false, true));
        assert!(!in_recovery(false, false));
    }
}
