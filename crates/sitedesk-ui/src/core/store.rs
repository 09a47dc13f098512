//! App-wide yewdux store slices.
//!
//! # Design
//! - Keep shared UI state in one store to avoid ad-hoc contexts.
//! - Use small, focused slices so reducers stay predictable.

use crate::features::auth::state::AuthSlice;
use crate::models::{Toast, ToastKind};
use yewdux::store::Store;

/// Most toasts kept on screen at once.
const TOAST_LIMIT: usize = 4;

/// Global application store for shared state.
#[derive(Clone, Debug, PartialEq, Store, Default)]
pub struct AppStore {
    /// Authentication/session flow state.
    pub auth: AuthSlice,
    /// Transient notification queue.
    pub toasts: ToastState,
}

/// Toast queue with stable ids for dismissal.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ToastState {
    /// Queue in display order.
    pub items: Vec<Toast>,
    /// Next id to assign.
    pub next_id: u64,
}

/// Append a toast, evicting the oldest beyond the display limit.
pub fn push_toast(state: &mut ToastState, kind: ToastKind, message: String) {
    state.next_id += 1;
    state.items.push(Toast {
        id: state.next_id,
        kind,
        message,
    });
    if state.items.len() > TOAST_LIMIT {
        let overflow = state.items.len() - TOAST_LIMIT;
        state.items.drain(0..overflow);
    }
}

/// Remove a toast by id.
pub fn dismiss_toast(state: &mut ToastState, id: u64) {
    state.items.retain(|toast| toast.id != id);
}

#[cfg(test)]
mod tests {
    use super::{ToastState, dismiss_toast, push_toast};
    use crate::models::ToastKind;

    #[test]
    fn queue_is_bounded_and_keeps_newest() {
        let mut state = ToastState::default();
        for n in 0..6 {
            push_toast(&mut state, ToastKind::Info, format!("toast {n}"));
        }
        assert_eq!(state.items.len(), 4);
        assert_eq!(state.items.first().map(|t| t.id), Some(3));
        assert_eq!(state.items.last().map(|t| t.id), Some(6));
    }

    #[test]
    fn dismissal_removes_only_the_target() {
        let mut state = ToastState::default();
        push_toast(&mut state, ToastKind::Error, "first".to_string());
        push_toast(&mut state, ToastKind::Success, "second".to_string());

        dismiss_toast(&mut state, 1);

        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].message, "second");
    }
}
