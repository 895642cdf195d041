//! Defines the event and message structures for communication between the backend and frontend.

use serde::{Deserialize, Serialize};

use super::view_model::UiState;

/// How a message box is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageLevel {
    Info,
    Warning,
}

/// A titled message box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub level: MessageLevel,
    pub title: String,
    pub text: String,
}

impl Message {
    pub fn info(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            title: title.into(),
            text: text.into(),
        }
    }

    pub fn warning(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            title: title.into(),
            text: text.into(),
        }
    }
}

/// Events sent from the Rust backend to the WebView (UI thread).
///
/// Each variant except `ExitRequested` corresponds to a `window.*` function in the frontend.
#[derive(Debug)]
pub enum UserEvent {
    /// A complete state update to re-render the UI.
    StateUpdate(Box<UiState>),
    /// A message box, e.g. the result of an update check or the About text.
    ShowMessage(Message),
    /// Text was placed on the clipboard; carries its length in characters.
    CopiedToClipboard(usize),
    /// The user chose File > Exit.
    ExitRequested,
}

/// A message received from the WebView via the IPC channel.
#[derive(Deserialize, Debug)]
pub struct IpcMessage {
    /// The name of the command to execute.
    pub command: String,
    /// The payload associated with the command, as a JSON value.
    #[serde(default)]
    pub payload: serde_json::Value,
}
