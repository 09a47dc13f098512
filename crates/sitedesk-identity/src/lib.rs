//! Identity and session domain for the Sitedesk client.
//!
//! The crate holds everything the dashboard needs to reconcile asynchronous
//! identity-provider events with locally held view state: typed auth events,
//! role and profile records, the trait seams for the provider and the data
//! store, and the state machine that decides what the user sees next. It is
//! deliberately DOM-free so the whole core runs under native tests; the web
//! client supplies browser-backed implementations of the seams.

pub mod cleanup;
pub mod error;
pub mod events;
pub mod gateway;
pub mod password;
pub mod profile;
pub mod reconciler;
pub mod recovery;
pub mod resolver;
pub mod role;
pub mod session;

pub use cleanup::SessionCleaner;
pub use error::{ProviderError, ProviderErrorKind, StoreError};
pub use events::{AuthChange, AuthEvent};
pub use gateway::{Delay, IdentityGateway, LocalState, Navigator, ProfileStore};
pub use password::{MIN_PASSWORD_LEN, PasswordUpdateError, PasswordUpdateFlow, validate_new_password};
pub use profile::{Profile, UserId};
pub use reconciler::{AuthNotice, AuthView, AuthViewState, Reconciler};
pub use recovery::{RECOVERY_MARKER, in_recovery, location_indicates_recovery};
pub use resolver::{ROLE_LOOKUP_ATTEMPTS, ROLE_LOOKUP_BACKOFF, RoleResolver};
pub use role::{Destination, Role, RoleBinding, RoleResolution};
pub use session::{Session, UserIdentity};
