//! System clipboard access behind a trait, so command handlers can be tested headless.

/// Places text on a clipboard.
pub trait ClipboardService: Send + Sync {
    /// Returns `true` when the text was stored.
    fn copy(&self, text: &str) -> bool;
}

/// The production clipboard, backed by `arboard`.
pub struct SystemClipboard;

impl ClipboardService for SystemClipboard {
    fn copy(&self, text: &str) -> bool {
        // Opened per call; a long-lived handle is not Send on every platform.
        match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.to_owned())) {
            Ok(()) => {
                tracing::info!("Copied {} characters to the clipboard", text.chars().count());
                true
            }
            Err(e) => {
                tracing::warn!("Failed to write to the clipboard: {}", e);
                false
            }
        }
    }
}
