//! Contains helper functions to reduce boilerplate code in other `app` modules.

use std::sync::{Arc, Mutex, MutexGuard};

use super::events::{Message, UserEvent};
use super::proxy::EventProxy;
use super::state::AppState;
use super::view_model::generate_ui_state;

/// Locks the shared state.
pub fn lock_state(state: &Arc<Mutex<AppState>>) -> MutexGuard<'_, AppState> {
    state
        .lock()
        .expect("Mutex was poisoned. This should not happen.")
}

/// Sends the current state to the UI.
pub fn notify<P: EventProxy>(state: &AppState, proxy: &P) {
    let ui_state = generate_ui_state(state);
    proxy.send_event(UserEvent::StateUpdate(Box::new(ui_state)));
}

/// A helper function that locks the `AppState`, performs a mutation,
/// and then automatically sends a `StateUpdate` event to the UI.
///
/// Returns whatever the mutation returns, so handlers can act on it after the lock is released.
pub fn with_state_and_notify<F, R, P: EventProxy>(
    state: &Arc<Mutex<AppState>>,
    proxy: &P,
    update_fn: F,
) -> R
where
    F: FnOnce(&mut AppState) -> R,
{
    let mut state_guard = lock_state(state);

    // Execute the specific mutation logic
    let result = update_fn(&mut state_guard);

    notify(&state_guard, proxy);
    result
}

/// Shows a message box in the UI.
pub fn show_message<P: EventProxy>(proxy: &P, message: Message) {
    tracing::debug!("Showing message '{}'", message.title);
    proxy.send_event(UserEvent::ShowMessage(message));
}
