//! Malformed IPC traffic must be visible in the logs rather than silently dropped.

use async_trait::async_trait;
use llm_coding_toolset::app::{
    self, clipboard::ClipboardService, events::UserEvent, file_dialog::DialogService,
    proxy::EventProxy, state::AppState, Services,
};
use llm_coding_toolset::config::AppConfig;
use llm_coding_toolset::core::{UpdateCheckError, VersionSource};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_test::traced_test;

#[derive(Clone)]
struct NullProxy;

impl EventProxy for NullProxy {
    fn send_event(&self, _event: UserEvent) {}
}

struct Unused;

impl DialogService for Unused {
    fn pick_directory(&self) -> Option<PathBuf> {
        None
    }
    fn pick_file(&self, _title: &str) -> Option<PathBuf> {
        None
    }
}

impl ClipboardService for Unused {
    fn copy(&self, _text: &str) -> bool {
        false
    }
}

#[async_trait]
impl VersionSource for Unused {
    async fn fetch_latest_version(&self) -> Result<String, UpdateCheckError> {
        Ok("0.0.0".to_string())
    }
}

fn send(raw: &str) {
    let services = Services {
        dialog: Arc::new(Unused),
        clipboard: Arc::new(Unused),
        updates: Arc::new(Unused),
    };
    let state = Arc::new(Mutex::new(AppState::with_config(AppConfig::default(), None)));
    app::handle_ipc_message(raw.to_string(), &services, NullProxy, state);
}

#[traced_test]
#[test]
fn unparsable_message_is_logged() {
    send("{\"command\": ");
    assert!(logs_contain("Failed to parse IPC message"));
}

#[traced_test]
#[test]
fn unknown_command_is_logged() {
    send(r#"{"command": "launchRockets", "payload": null}"#);
    assert!(logs_contain("Received unknown IPC command: launchRockets"));
}

#[traced_test]
#[test]
fn bad_payload_is_logged() {
    send(r#"{"command": "setDepth", "payload": "deep"}"#);
    assert!(logs_contain("Failed to deserialize depth from payload"));
}

#[traced_test]
#[test]
fn unknown_tree_node_is_logged() {
    send(r#"{"command": "setCheckState", "payload": {"id": 3, "checked": true}}"#);
    assert!(logs_contain("Check state change without a folder view"));
}
