//! The application shell: shared state, IPC dispatch and the bridge back to the WebView.

pub mod clipboard;
pub mod commands;
pub mod events;
pub mod file_dialog;
pub mod helpers;
pub mod proxy;
pub mod state;
pub mod tasks;
pub mod view_model;

use std::sync::{Arc, Mutex};
use wry::WebView;

use crate::core::update::{GithubReleaseSource, UpdateCheckError, UPDATE_URL};
use crate::core::VersionSource;
use clipboard::{ClipboardService, SystemClipboard};
use events::{IpcMessage, UserEvent};
use file_dialog::{DialogService, NativeDialogService};
use proxy::EventProxy;
use state::AppState;

/// The side-effecting services command handlers reach out to.
#[derive(Clone)]
pub struct Services {
    pub dialog: Arc<dyn DialogService>,
    pub clipboard: Arc<dyn ClipboardService>,
    pub updates: Arc<dyn VersionSource>,
}

impl Services {
    /// Native dialogs, the system clipboard and the GitHub releases API.
    pub fn native() -> Result<Self, UpdateCheckError> {
        Ok(Self {
            dialog: Arc::new(NativeDialogService),
            clipboard: Arc::new(SystemClipboard),
            updates: Arc::new(GithubReleaseSource::new(UPDATE_URL)?),
        })
    }
}

/// Parses a raw IPC message from the WebView and runs the matching command.
///
/// Malformed messages and unknown commands are logged and dropped.
pub fn handle_ipc_message<P: EventProxy>(
    message: String,
    services: &Services,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let msg = match serde_json::from_str::<IpcMessage>(&message) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::warn!("Failed to parse IPC message: {} ({})", message, e);
            return;
        }
    };
    tracing::debug!("IPC command '{}'", msg.command);

    let payload = msg.payload;
    match msg.command.as_str() {
        "initialize" => commands::initialize(proxy, state),
        // Folder Structure
        "browseFolder" => commands::browse_folder(services.dialog.as_ref(), proxy, state),
        "setFolderInput" => commands::set_folder_input(payload, proxy, state),
        "setDepth" => commands::set_depth(payload, proxy, state),
        "viewStructure" => commands::view_structure(proxy, state),
        "setCheckState" => commands::set_check_state(payload, proxy, state),
        "setIncludeContents" => commands::set_include_contents(payload, proxy, state),
        "generateStructure" => {
            commands::generate_structure(services.clipboard.as_ref(), proxy, state)
        }
        // Add Line Numbers
        "loadReferenceFile" => {
            commands::load_reference_file(services.dialog.as_ref(), proxy, state)
        }
        "clearReferenceFile" => commands::clear_reference_file(proxy, state),
        "addLineNumbers" => commands::add_line_numbers(payload, proxy, state),
        "copyLineNumbers" => {
            commands::copy_line_numbers(services.clipboard.as_ref(), proxy, state)
        }
        // Diff Viewer
        "loadDiffFile" => {
            commands::load_diff_file(payload, services.dialog.as_ref(), proxy, state)
        }
        "compareTexts" => commands::compare_texts(payload, proxy, state),
        // Menus
        "saveSettings" => commands::save_settings(payload, proxy, state),
        "checkForUpdates" => tasks::start_update_check(services.updates.clone(), proxy, state),
        "openReleasePage" => commands::open_release_page(),
        "showAbout" => commands::show_about(proxy),
        "exit" => commands::request_exit(proxy),
        other => tracing::warn!("Received unknown IPC command: {}", other),
    }
}

/// Builds the JavaScript call that renders `event`, if the frontend handles it.
pub fn script_for_event(event: &UserEvent) -> Option<String> {
    let script = match event {
        UserEvent::StateUpdate(ui_state) => {
            serde_json::to_string(ui_state).map(|json| format!("window.render({json});"))
        }
        UserEvent::ShowMessage(message) => {
            serde_json::to_string(message).map(|json| format!("window.showMessage({json});"))
        }
        UserEvent::CopiedToClipboard(chars) => Ok(format!("window.showCopied({chars});")),
        UserEvent::ExitRequested => return None,
    };
    match script {
        Ok(script) => Some(script),
        Err(e) => {
            tracing::error!("Failed to serialize event for the UI: {}", e);
            None
        }
    }
}

/// Forwards a `UserEvent` to the WebView.
pub fn handle_user_event(event: UserEvent, webview: &WebView) {
    if let Some(script) = script_for_event(&event) {
        if let Err(e) = webview.evaluate_script(&script) {
            tracing::error!("Failed to evaluate script in WebView: {}", e);
        }
    }
}
