//! Application profile records stored in the `profiles` table.

use crate::role::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier the provider assigns to each user.
pub type UserId = Uuid;

/// Authorization profile keyed by the provider user id.
///
/// Rows are created asynchronously after sign-up, so a freshly registered
/// user may not have one yet when first queried.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Provider user this profile belongs to.
    pub user_id: UserId,
    /// Assigned role; `None` means the row exists but no role was granted,
    /// which is distinct from the row being absent entirely.
    pub role: Option<Role>,
    /// Latch bracketing the window between a `PASSWORD_RECOVERY` event and
    /// its confirmed `USER_UPDATED`. No normal navigation happens while set.
    pub password_reset_in_progress: bool,
}
