//! Background work spawned on the tokio runtime.

use std::sync::{Arc, Mutex};

use super::events::Message;
use super::helpers::{lock_state, notify, show_message};
use super::proxy::EventProxy;
use super::state::AppState;
use crate::core::update::{check_for_updates, UpdateCheckError, CURRENT_VERSION};
use crate::core::VersionSource;

/// Starts an update check against `source` unless one is already running.
///
/// The outcome arrives as a `ShowMessage` event; a failed check shows the
/// failure instead of propagating it.
pub fn start_update_check<P, S>(source: Arc<S>, proxy: P, state: Arc<Mutex<AppState>>)
where
    P: EventProxy,
    S: VersionSource + ?Sized + 'static,
{
    let mut state_guard = lock_state(&state);
    if state_guard.is_checking_updates {
        tracing::info!("Update check already running, ignoring request.");
        return;
    }
    state_guard.is_checking_updates = true;
    notify(&state_guard, &proxy);

    let task_state = state.clone();
    let task_proxy = proxy.clone();
    let handle = tokio::spawn(async move {
        tracing::info!("Checking for updates (running {})", CURRENT_VERSION);
        let message = match check_for_updates(source.as_ref(), CURRENT_VERSION).await {
            Ok(status) => Message::info(status.title(), status.message()),
            Err(e) => {
                tracing::warn!("Update check failed: {}", e);
                Message::warning(UpdateCheckError::TITLE, e.user_message())
            }
        };

        {
            let mut state_guard = lock_state(&task_state);
            state_guard.is_checking_updates = false;
            state_guard.update_task = None;
            notify(&state_guard, &task_proxy);
        }
        show_message(&task_proxy, message);
    });
    state_guard.update_task = Some(handle);
}
