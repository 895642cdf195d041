//! Defines the central, mutable state of the application.

use crate::config::AppConfig;
use crate::core::diff::DiffLine;
use crate::core::{FileSystem, SelectionTotals, SelectionTree};
use std::path::PathBuf;
use tokio::task::JoinHandle;

/// State of the "Folder Structure" tab.
#[derive(Debug, Default)]
pub struct FolderTabState {
    /// The folder path as typed or picked.
    pub folder_input: String,
    /// Depth used by the next "View".
    pub depth: usize,
    /// The tree shown by the last successful "View".
    pub tree: Option<SelectionTree>,
    /// Whether file contents are counted and exported.
    pub include_contents: bool,
    /// Totals of the current selection, recomputed after every change.
    pub totals: SelectionTotals,
}

impl FolderTabState {
    /// Recomputes the selection totals from scratch.
    pub fn refresh_totals<F: FileSystem + ?Sized>(&mut self, fs: &F) {
        self.totals = match &self.tree {
            Some(tree) => tree.totals(self.include_contents, fs),
            None => SelectionTotals::default(),
        };
    }
}

/// A loaded reference file of the "Add Line Numbers" tab.
#[derive(Debug, Clone)]
pub struct ReferenceFile {
    pub path: PathBuf,
    pub contents: String,
}

/// State of the "Add Line Numbers" tab.
#[derive(Debug)]
pub struct LineNumbersTabState {
    /// While set, the start line is located in this file.
    pub reference: Option<ReferenceFile>,
    /// The manual start line, at least 1.
    pub start_line: usize,
    pub snippet: String,
    pub output: String,
}

impl Default for LineNumbersTabState {
    fn default() -> Self {
        Self {
            reference: None,
            start_line: 1,
            snippet: String::new(),
            output: String::new(),
        }
    }
}

/// State of the "Diff Viewer" tab.
#[derive(Debug, Default)]
pub struct DiffTabState {
    pub left: String,
    pub right: String,
    /// The lines currently painted, headers excluded.
    pub lines: Vec<DiffLine>,
}

/// Holds the complete, mutable state of the application.
///
/// This struct is wrapped in an `Arc<Mutex<...>>` to allow for safe, shared access
/// from the main event loop, the IPC handlers, and the update check task.
pub struct AppState {
    /// The application's configuration settings.
    pub config: AppConfig,
    /// Where settings are saved; `None` means the platform default.
    pub config_path: Option<PathBuf>,
    pub folder: FolderTabState,
    pub line_numbers: LineNumbersTabState,
    pub diff: DiffTabState,
    /// `true` while an update check is in flight.
    pub is_checking_updates: bool,
    /// A handle to the running update check, allowing it to be aborted.
    pub update_task: Option<JoinHandle<()>>,
}

impl AppState {
    /// Creates the state around an already loaded configuration.
    pub fn with_config(config: AppConfig, config_path: Option<PathBuf>) -> Self {
        let depth = config.default_depth;
        Self {
            config,
            config_path,
            folder: FolderTabState {
                depth,
                ..Default::default()
            },
            line_numbers: LineNumbersTabState::default(),
            diff: DiffTabState::default(),
            is_checking_updates: false,
            update_task: None,
        }
    }

    /// Cancels the running update check, if any.
    pub fn cancel_update_check(&mut self) {
        if let Some(handle) = self.update_task.take() {
            handle.abort();
            tracing::info!("Aborted running update check.");
        }
        self.is_checking_updates = false;
    }

    /// Drops the shown folder tree and its totals.
    pub fn clear_folder_view(&mut self) {
        self.folder.tree = None;
        self.folder.totals = SelectionTotals::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;
    use crate::core::selection::{NodeKind, TreeNode};
    use crate::core::StdFileSystem;

    #[test]
    fn folder_depth_starts_at_the_configured_default() {
        let config = AppConfig {
            default_depth: 6,
            theme: Theme::Dark,
            ..Default::default()
        };
        let state = AppState::with_config(config, None);
        assert_eq!(state.folder.depth, 6);
        assert_eq!(state.line_numbers.start_line, 1);
        assert!(state.line_numbers.reference.is_none());
    }

    #[test]
    fn totals_reset_with_the_view() {
        let mut state = AppState::with_config(AppConfig::default(), None);
        let mut tree = SelectionTree::new(TreeNode::new("root", "/r", NodeKind::Directory, None));
        let root = tree.root();
        tree.add_child(root, TreeNode::new("a", "/r/a", NodeKind::File, Some(7)))
            .unwrap();
        state.folder.tree = Some(tree);
        state.folder.refresh_totals(&StdFileSystem);
        assert_eq!(state.folder.totals.total_bytes, 7);

        state.clear_folder_view();
        assert!(state.folder.tree.is_none());
        assert_eq!(state.folder.totals, SelectionTotals::default());
    }
}
