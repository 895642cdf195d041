//! Contains all the command handlers that are callable from the frontend via IPC.
//!
//! Each function in this module corresponds to a specific `IpcMessage::command`.
//! These handlers are responsible for interacting with the `AppState` and the `core`
//! logic, and for sending `UserEvent`s back to the UI.

use super::clipboard::ClipboardService;
use super::events::{Message, UserEvent};
use super::file_dialog::DialogService;
use super::helpers::{lock_state, notify, show_message, with_state_and_notify};
use super::proxy::EventProxy;
use super::state::{AppState, ReferenceFile};
use crate::config::{self, Theme};
use crate::core::diff::{display_lines, DEFAULT_CONTEXT_LINES};
use crate::core::folder_tree::clamp_depth;
use crate::core::line_numbers::{clamp_start_line, SNIPPET_NOT_FOUND_MESSAGE};
use crate::core::update::{CURRENT_VERSION, RELEASES_PAGE_URL};
use crate::core::{
    add_line_numbers as number_lines, FileSystem, FolderTree, NumberingOutcome, StartLine,
    StdFileSystem,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const ABOUT_TITLE: &str = "About LLM-Coding Toolset";

/// The text of Help > About.
pub fn about_text() -> String {
    format!(
        "LLM-Coding Toolset v{CURRENT_VERSION}\n\n\
         A set of tools to assist developers working with Large Language Models."
    )
}

#[derive(Deserialize, Debug)]
struct CheckStatePayload {
    id: usize,
    checked: bool,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct LineNumbersPayload {
    snippet: String,
    #[serde(default)]
    start_line: Option<usize>,
}

#[derive(Deserialize, Debug)]
struct ComparePayload {
    left: String,
    right: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SettingsPayload {
    theme: Theme,
    default_depth: usize,
    auto_update: bool,
}

/// Handles the initial request for state from the frontend when it loads.
pub fn initialize<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    let state_guard = lock_state(&state);
    notify(&state_guard, &proxy);
}

// ---------------------------------------------------------------------------------------------
// Folder Structure tab
// ---------------------------------------------------------------------------------------------

/// Opens a folder picker and puts the chosen path into the folder field.
///
/// The tree itself is only rebuilt by `view_structure`.
pub fn browse_folder<P: EventProxy, D: DialogService + ?Sized>(
    dialog: &D,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    match dialog.pick_directory() {
        Some(path) => with_state_and_notify(&state, &proxy, |s| {
            s.folder.folder_input = path.display().to_string();
        }),
        None => tracing::info!("User cancelled folder selection."),
    }
}

/// Mirrors the folder text field.
pub fn set_folder_input<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    if let Ok(input) = serde_json::from_value::<String>(payload.clone()) {
        with_state_and_notify(&state, &proxy, |s| s.folder.folder_input = input);
    } else {
        tracing::warn!("Failed to deserialize folder input from payload: {:?}", payload);
    }
}

/// Sets the depth used by the next `view_structure`, clamped to 1..=10.
pub fn set_depth<P: EventProxy>(payload: serde_json::Value, proxy: P, state: Arc<Mutex<AppState>>) {
    if let Ok(depth) = serde_json::from_value::<usize>(payload.clone()) {
        with_state_and_notify(&state, &proxy, |s| s.folder.depth = clamp_depth(depth));
    } else {
        tracing::warn!("Failed to deserialize depth from payload: {:?}", payload);
    }
}

/// Builds a fresh, fully checked tree for the folder field.
///
/// The previous tree is always discarded. A path that is not a directory
/// leaves the view empty.
pub fn view_structure<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    with_state_and_notify(&state, &proxy, |s| {
        s.clear_folder_view();
        let root = PathBuf::from(s.folder.folder_input.trim());
        match FolderTree::build(&root, s.folder.depth, &StdFileSystem) {
            Ok(tree) => {
                s.folder.tree = Some(tree);
                s.folder.refresh_totals(&StdFileSystem);
            }
            Err(e) => tracing::warn!("Cannot view folder structure: {}", e),
        }
    });
}

/// Toggles a tree checkbox and propagates the change through the tree.
pub fn set_check_state<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let Ok(request) = serde_json::from_value::<CheckStatePayload>(payload.clone()) else {
        tracing::warn!("Failed to deserialize check state from payload: {:?}", payload);
        return;
    };

    with_state_and_notify(&state, &proxy, |s| {
        let Some(tree) = s.folder.tree.as_mut() else {
            tracing::warn!("Check state change without a folder view, ignoring.");
            return;
        };
        let result = tree
            .id(request.id)
            .and_then(|id| tree.set_check_state(id, request.checked));
        match result {
            Ok(()) => s.folder.refresh_totals(&StdFileSystem),
            Err(e) => tracing::warn!("Ignoring check state change: {}", e),
        }
    });
}

/// Switches whether file contents are counted and exported.
pub fn set_include_contents<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    if let Ok(include) = serde_json::from_value::<bool>(payload.clone()) {
        with_state_and_notify(&state, &proxy, |s| {
            s.folder.include_contents = include;
            s.folder.refresh_totals(&StdFileSystem);
        });
    } else {
        tracing::warn!("Failed to deserialize include-contents flag from payload: {:?}", payload);
    }
}

/// Renders the selected part of the tree and copies it to the clipboard.
pub fn generate_structure<P: EventProxy, C: ClipboardService + ?Sized>(
    clipboard: &C,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let output = {
        let state_guard = lock_state(&state);
        match &state_guard.folder.tree {
            Some(tree) => FolderTree::render_structure(
                tree,
                state_guard.folder.include_contents,
                &StdFileSystem,
            ),
            None => {
                tracing::info!("Nothing to generate, no folder is being viewed.");
                return;
            }
        }
    };
    copy_to_clipboard(clipboard, &proxy, &output);
}

// ---------------------------------------------------------------------------------------------
// Add Line Numbers tab
// ---------------------------------------------------------------------------------------------

/// Loads a reference file whose contents decide the start line from now on.
pub fn load_reference_file<P: EventProxy, D: DialogService + ?Sized>(
    dialog: &D,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let Some(path) = dialog.pick_file("Select File") else {
        tracing::info!("User cancelled reference file selection.");
        return;
    };
    match read_file(&path) {
        Ok(contents) => with_state_and_notify(&state, &proxy, |s| {
            tracing::info!("Loaded reference file {}", path.display());
            s.line_numbers.reference = Some(ReferenceFile { path, contents });
        }),
        Err(message) => show_message(&proxy, message),
    }
}

/// Forgets the reference file, which makes the start line editable again.
pub fn clear_reference_file<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    with_state_and_notify(&state, &proxy, |s| {
        s.line_numbers.reference = None;
    });
}

/// Numbers the snippet, locating its start line in the reference file when one is loaded.
///
/// An empty snippet changes nothing. A located start line is written back to
/// the start line field.
pub fn add_line_numbers<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let Ok(request) = serde_json::from_value::<LineNumbersPayload>(payload.clone()) else {
        tracing::warn!("Failed to deserialize line numbers request from payload: {:?}", payload);
        return;
    };

    with_state_and_notify(&state, &proxy, |s| {
        let tab = &mut s.line_numbers;
        tab.snippet = request.snippet;
        if let Some(start_line) = request.start_line {
            tab.start_line = clamp_start_line(start_line);
        }

        let start = match &tab.reference {
            Some(reference) => StartLine::Locate(&reference.contents),
            None => StartLine::Manual(tab.start_line),
        };
        match number_lines(&tab.snippet, start) {
            NumberingOutcome::Empty => {}
            NumberingOutcome::NotFound => {
                tracing::info!("Snippet not found in the reference file.");
                tab.output = SNIPPET_NOT_FOUND_MESSAGE.to_string();
            }
            NumberingOutcome::Numbered { start, output } => {
                tab.start_line = start;
                tab.output = output;
            }
        }
    });
}

/// Copies the numbered output to the clipboard.
pub fn copy_line_numbers<P: EventProxy, C: ClipboardService + ?Sized>(
    clipboard: &C,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let output = lock_state(&state).line_numbers.output.clone();
    copy_to_clipboard(clipboard, &proxy, &output);
}

// ---------------------------------------------------------------------------------------------
// Diff Viewer tab
// ---------------------------------------------------------------------------------------------

/// Fills text pane 1 or 2 from a file.
pub fn load_diff_file<P: EventProxy, D: DialogService + ?Sized>(
    payload: serde_json::Value,
    dialog: &D,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let pane = match serde_json::from_value::<u8>(payload.clone()) {
        Ok(pane @ (1 | 2)) => pane,
        _ => {
            tracing::warn!("Failed to deserialize diff pane from payload: {:?}", payload);
            return;
        }
    };
    let Some(path) = dialog.pick_file(&format!("Select File for Text {pane}")) else {
        tracing::info!("User cancelled file selection for text {}.", pane);
        return;
    };
    match read_file(&path) {
        Ok(contents) => with_state_and_notify(&state, &proxy, |s| {
            if pane == 1 {
                s.diff.left = contents;
            } else {
                s.diff.right = contents;
            }
        }),
        Err(message) => show_message(&proxy, message),
    }
}

/// Compares both panes and stores the lines to paint.
pub fn compare_texts<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    if let Ok(request) = serde_json::from_value::<ComparePayload>(payload.clone()) {
        with_state_and_notify(&state, &proxy, |s| {
            s.diff.lines = display_lines(&request.left, &request.right, DEFAULT_CONTEXT_LINES);
            s.diff.left = request.left;
            s.diff.right = request.right;
        });
    } else {
        tracing::warn!("Failed to deserialize texts to compare from payload: {:?}", payload);
    }
}

// ---------------------------------------------------------------------------------------------
// Menus
// ---------------------------------------------------------------------------------------------

/// Stores the settings dialog values and applies the default depth.
pub fn save_settings<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let Ok(settings) = serde_json::from_value::<SettingsPayload>(payload.clone()) else {
        tracing::warn!("Failed to deserialize settings from payload: {:?}", payload);
        return;
    };

    with_state_and_notify(&state, &proxy, |s| {
        s.config.theme = settings.theme;
        s.config.default_depth = clamp_depth(settings.default_depth);
        s.config.auto_update = settings.auto_update;
        s.folder.depth = s.config.default_depth;
        if let Err(e) = config::settings::save_config(&s.config, s.config_path.as_deref()) {
            tracing::error!("Failed to save settings: {}", e);
        }
    });
}

/// Shows the About box.
pub fn show_about<P: EventProxy>(proxy: P) {
    show_message(&proxy, Message::info(ABOUT_TITLE, about_text()));
}

/// Asks the event loop to close the window.
pub fn request_exit<P: EventProxy>(proxy: P) {
    tracing::info!("Exit requested from the menu.");
    proxy.send_event(UserEvent::ExitRequested);
}

/// Opens the releases page in the default browser.
pub fn open_release_page() {
    if let Err(e) = open::that(RELEASES_PAGE_URL) {
        tracing::warn!("Failed to open {}: {}", RELEASES_PAGE_URL, e);
    }
}

// ---------------------------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------------------------

fn copy_to_clipboard<P: EventProxy, C: ClipboardService + ?Sized>(
    clipboard: &C,
    proxy: &P,
    text: &str,
) {
    if clipboard.copy(text) {
        proxy.send_event(UserEvent::CopiedToClipboard(text.chars().count()));
    }
}

fn read_file(path: &Path) -> Result<String, Message> {
    StdFileSystem.read_to_string_lossy(path).map_err(|e| {
        tracing::warn!("Failed to read {}: {}", path.display(), e);
        Message::warning("Cannot Open File", e.to_string())
    })
}
