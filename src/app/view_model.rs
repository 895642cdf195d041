//! Responsible for transforming the `AppState` into a `UiState` view model.
//!
//! This module acts as a presentation layer: it flattens the selection arena into
//! nested nodes and formats the labels the frontend shows verbatim.

use crate::config::AppConfig;
use crate::core::diff::DiffLine;
use crate::core::update::CURRENT_VERSION;
use crate::core::{CheckState, NodeId, SelectionTree};
use serde::Serialize;

use super::state::AppState;

/// Tooltip of the start line field while a reference file is loaded.
pub const START_LINE_LOCKED_TOOLTIP: &str =
    "To manually set start line, please remove the added file";

/// A serializable representation of the application state for the UI.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub config: AppConfig,
    pub version: String,
    pub folder: FolderView,
    pub line_numbers: LineNumbersView,
    pub diff: DiffView,
    pub is_checking_updates: bool,
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FolderView {
    pub folder_input: String,
    pub depth: usize,
    pub tree: Option<TreeNode>,
    pub include_contents: bool,
    pub total_lines_label: String,
    pub total_size_label: String,
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LineNumbersView {
    pub reference_file: Option<String>,
    pub start_line: usize,
    pub start_line_enabled: bool,
    pub start_line_tooltip: Option<String>,
    pub snippet: String,
    pub output: String,
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DiffView {
    pub left: String,
    pub right: String,
    pub lines: Vec<DiffLine>,
}

/// A serializable representation of a single node in the folder tree for the UI.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// Arena index, sent back with `setCheckState`.
    pub id: usize,
    pub name: String,
    /// Second column, e.g. `"120 bytes"`; empty for the root.
    pub size_label: String,
    pub is_directory: bool,
    pub selection_state: CheckState,
    pub children: Vec<TreeNode>,
}

/// Creates the complete `UiState` from the current `AppState`.
pub fn generate_ui_state(state: &AppState) -> UiState {
    let folder = &state.folder;
    let line_numbers = &state.line_numbers;
    let locked = line_numbers.reference.is_some();

    UiState {
        config: state.config.clone(),
        version: CURRENT_VERSION.to_string(),
        folder: FolderView {
            folder_input: folder.folder_input.clone(),
            depth: folder.depth,
            tree: folder.tree.as_ref().and_then(build_tree_nodes),
            include_contents: folder.include_contents,
            total_lines_label: format!("Total lines: {}", folder.totals.total_lines),
            total_size_label: format!("Total size: {} bytes", folder.totals.total_bytes),
        },
        line_numbers: LineNumbersView {
            reference_file: line_numbers
                .reference
                .as_ref()
                .map(|r| r.path.display().to_string()),
            start_line: line_numbers.start_line,
            start_line_enabled: !locked,
            start_line_tooltip: locked.then(|| START_LINE_LOCKED_TOOLTIP.to_string()),
            snippet: line_numbers.snippet.clone(),
            output: line_numbers.output.clone(),
        },
        diff: DiffView {
            left: state.diff.left.clone(),
            right: state.diff.right.clone(),
            lines: state.diff.lines.clone(),
        },
        is_checking_updates: state.is_checking_updates,
    }
}

/// Converts the arena into the nested structure the frontend renders.
fn build_tree_nodes(tree: &SelectionTree) -> Option<TreeNode> {
    fn build_level(tree: &SelectionTree, id: NodeId) -> Option<TreeNode> {
        let node = tree.node(id)?;
        Some(TreeNode {
            id: id.index(),
            name: node.label.clone(),
            size_label: node
                .size
                .map(|size| format!("{size} bytes"))
                .unwrap_or_default(),
            is_directory: !node.is_file(),
            selection_state: node.state(),
            children: node
                .children()
                .iter()
                .filter_map(|&child| build_level(tree, child))
                .collect(),
        })
    }

    build_level(tree, tree.root())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::ReferenceFile;
    use crate::core::selection::{NodeKind, TreeNode as Node};
    use crate::core::SelectionTotals;
    use std::path::PathBuf;

    fn state() -> AppState {
        AppState::with_config(AppConfig::default(), None)
    }

    #[test]
    fn totals_are_formatted_as_labels() {
        let mut state = state();
        state.folder.totals = SelectionTotals {
            total_bytes: 150,
            total_lines: 12,
        };

        let ui = generate_ui_state(&state);
        assert_eq!(ui.folder.total_lines_label, "Total lines: 12");
        assert_eq!(ui.folder.total_size_label, "Total size: 150 bytes");
        assert!(ui.folder.tree.is_none());
    }

    #[test]
    fn tree_keeps_ids_states_and_size_labels() {
        let mut tree = SelectionTree::new(Node::new("/proj", "/proj", NodeKind::Directory, None));
        let root = tree.root();
        let src = tree
            .add_child(root, Node::new("src", "/proj/src", NodeKind::Directory, Some(64)))
            .unwrap();
        let main = tree
            .add_child(src, Node::new("main.rs", "/proj/src/main.rs", NodeKind::File, Some(120)))
            .unwrap();
        tree.add_child(src, Node::new("lib.rs", "/proj/src/lib.rs", NodeKind::File, Some(30)))
            .unwrap();
        tree.set_check_state(main, false).unwrap();

        let mut state = state();
        state.folder.tree = Some(tree);
        let view = generate_ui_state(&state).folder.tree.unwrap();

        assert_eq!(view.name, "/proj");
        assert_eq!(view.size_label, "");
        assert_eq!(view.selection_state, CheckState::PartiallyChecked);
        let src_view = &view.children[0];
        assert!(src_view.is_directory);
        assert_eq!(src_view.children[0].id, main.index());
        assert_eq!(src_view.children[0].size_label, "120 bytes");
        assert_eq!(src_view.children[0].selection_state, CheckState::Unchecked);
        assert_eq!(src_view.children[1].selection_state, CheckState::Checked);
    }

    #[test]
    fn reference_file_locks_the_start_line() {
        let mut state = state();
        let ui = generate_ui_state(&state);
        assert!(ui.line_numbers.start_line_enabled);
        assert!(ui.line_numbers.start_line_tooltip.is_none());

        state.line_numbers.reference = Some(ReferenceFile {
            path: PathBuf::from("/tmp/doc.txt"),
            contents: "x".to_string(),
        });
        let ui = generate_ui_state(&state);
        assert!(!ui.line_numbers.start_line_enabled);
        assert_eq!(
            ui.line_numbers.start_line_tooltip.as_deref(),
            Some(START_LINE_LOCKED_TOOLTIP)
        );
        assert_eq!(ui.line_numbers.reference_file.as_deref(), Some("/tmp/doc.txt"));
    }

    #[test]
    fn ui_state_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(generate_ui_state(&state())).unwrap();
        assert_eq!(json["lineNumbers"]["startLineEnabled"], true);
        assert_eq!(json["folder"]["totalSizeLabel"], "Total size: 0 bytes");
        assert_eq!(json["version"], CURRENT_VERSION);
    }
}
