//! Tri-state checkbox selection over a tree of files and directories.
//!
//! The tree is stored as an arena: [`SelectionTree`] owns every node, a node
//! lists its children by [`NodeId`], and each child keeps the id of its parent
//! so that a change can be re-aggregated upwards. Parent ids are only ever
//! followed upwards during propagation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::CoreError;
use super::fs::FileSystem;

/// The value of a tree checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckState {
    Checked,
    Unchecked,
    PartiallyChecked,
}

impl From<bool> for CheckState {
    fn from(checked: bool) -> Self {
        if checked {
            CheckState::Checked
        } else {
            CheckState::Unchecked
        }
    }
}

/// Reduces the states of a node's children to the node's own state.
///
/// All-or-nothing: every child Checked gives Checked, every child Unchecked
/// gives Unchecked, and any mix (including a partially checked child) gives
/// PartiallyChecked. No children at all counts as nothing checked.
pub fn aggregate<I>(children: I) -> CheckState
where
    I: IntoIterator<Item = CheckState>,
{
    let mut total = 0usize;
    let mut checked = 0usize;
    let mut partial = false;
    for state in children {
        total += 1;
        match state {
            CheckState::Checked => checked += 1,
            CheckState::PartiallyChecked => partial = true,
            CheckState::Unchecked => {}
        }
    }

    if partial {
        CheckState::PartiallyChecked
    } else if checked == 0 {
        CheckState::Unchecked
    } else if checked == total {
        CheckState::Checked
    } else {
        CheckState::PartiallyChecked
    }
}

/// Index of a node inside its [`SelectionTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    File,
    Directory,
}

/// A checkable entry of the tree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Text shown for the node: the folder path for the root, the file name otherwise.
    pub label: String,
    /// Absolute location on disk.
    pub path: PathBuf,
    pub kind: NodeKind,
    /// Size in bytes, when it could be read.
    pub size: Option<u64>,
    state: CheckState,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl TreeNode {
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>, kind: NodeKind, size: Option<u64>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            kind,
            size,
            state: CheckState::Checked,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn state(&self) -> CheckState {
        self.state
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }
}

/// Byte and line totals of the current selection.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectionTotals {
    pub total_bytes: u64,
    pub total_lines: usize,
}

/// An owned tree of checkable nodes, rooted at id 0.
#[derive(Debug, Clone)]
pub struct SelectionTree {
    nodes: Vec<TreeNode>,
}

impl SelectionTree {
    /// Creates a tree holding only `root`.
    pub fn new(root: TreeNode) -> Self {
        let mut root = root;
        root.parent = None;
        root.children.clear();
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    /// Resolves a raw index received from the UI.
    pub fn id(&self, index: usize) -> Result<NodeId, CoreError> {
        if index < self.nodes.len() {
            Ok(NodeId(index))
        } else {
            Err(CoreError::UnknownNode(index))
        }
    }

    /// Appends `node` as the last child of `parent`.
    ///
    /// The new node keeps the state it was created with; callers building a
    /// tree from disk create every node checked, which keeps parents consistent.
    pub fn add_child(&mut self, parent: NodeId, node: TreeNode) -> Result<NodeId, CoreError> {
        let parent = self.id(parent.0)?;
        let id = NodeId(self.nodes.len());
        let mut node = node;
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// Applies a user click: the clicked state goes down to the whole
    /// subtree, then the ancestors are re-aggregated.
    pub fn set_check_state(&mut self, id: NodeId, checked: bool) -> Result<(), CoreError> {
        let id = self.id(id.0)?;
        self.propagate_down(id, checked);
        self.propagate_up(id);
        Ok(())
    }

    /// Checks or unchecks `id` and every descendant.
    ///
    /// A partial state only arises from aggregation, never from a push.
    pub fn propagate_down(&mut self, id: NodeId, checked: bool) {
        let state = CheckState::from(checked);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = &mut self.nodes[current.0];
            node.state = state;
            stack.extend(node.children.iter().copied());
        }
    }

    /// Re-aggregates every ancestor of `id`, nearest first.
    ///
    /// Stops at the first ancestor whose state does not change, since nothing
    /// above it can change either.
    pub fn propagate_up(&mut self, id: NodeId) {
        let mut current = self.nodes[id.0].parent;
        while let Some(parent_id) = current {
            let recomputed = aggregate(
                self.nodes[parent_id.0]
                    .children
                    .iter()
                    .map(|child| self.nodes[child.0].state),
            );
            let parent = &mut self.nodes[parent_id.0];
            if parent.state == recomputed {
                break;
            }
            parent.state = recomputed;
            current = parent.parent;
        }
    }

    /// Visits selected nodes in pre-order with their depth below the root.
    ///
    /// An Unchecked node is skipped together with its whole subtree, whatever
    /// its descendants store. Partially checked directories are visited so
    /// the checked entries below them are reached.
    pub fn visit_selected<F>(&self, mut visit: F)
    where
        F: FnMut(&TreeNode, usize),
    {
        let mut stack = vec![(self.root(), 0usize)];
        while let Some((id, level)) = stack.pop() {
            let node = &self.nodes[id.0];
            if node.state == CheckState::Unchecked {
                continue;
            }
            visit(node, level);
            stack.extend(node.children.iter().rev().map(|child| (*child, level + 1)));
        }
    }

    /// Recomputes the selection totals from scratch over the checked files.
    ///
    /// Sizes come from the node metadata. Lines are only counted when
    /// `include_contents` is set, by reading each selected file; an unreadable
    /// file contributes no lines.
    pub fn totals<F: FileSystem + ?Sized>(&self, include_contents: bool, fs: &F) -> SelectionTotals {
        let mut totals = SelectionTotals::default();
        self.visit_selected(|node, _| {
            if !node.is_file() || node.state != CheckState::Checked {
                return;
            }
            totals.total_bytes += node.size.unwrap_or(0);
            if include_contents {
                totals.total_lines += count_lines(fs, &node.path);
            }
        });
        totals
    }
}

fn count_lines<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> usize {
    match fs.read_lines(path) {
        Ok(lines) => lines.len(),
        Err(e) => {
            tracing::warn!("Could not count lines: {}", e);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fs::StdFileSystem;
    use std::fs;
    use tempfile::tempdir;

    use CheckState::{Checked, PartiallyChecked, Unchecked};

    fn dir(label: &str) -> TreeNode {
        TreeNode::new(label, format!("/virtual/{label}"), NodeKind::Directory, Some(4096))
    }

    fn file(label: &str, size: u64) -> TreeNode {
        TreeNode::new(label, format!("/virtual/{label}"), NodeKind::File, Some(size))
    }

    /// root
    /// ├── src
    /// │   ├── main.rs
    /// │   └── lib.rs
    /// └── README.md
    fn sample() -> (SelectionTree, [NodeId; 4]) {
        let mut tree = SelectionTree::new(dir("root"));
        let root = tree.root();
        let src = tree.add_child(root, dir("src")).unwrap();
        let main = tree.add_child(src, file("main.rs", 10)).unwrap();
        let lib = tree.add_child(src, file("lib.rs", 20)).unwrap();
        let readme = tree.add_child(root, file("README.md", 5)).unwrap();
        (tree, [src, main, lib, readme])
    }

    fn state(tree: &SelectionTree, id: NodeId) -> CheckState {
        tree.node(id).unwrap().state()
    }

    #[test]
    fn aggregate_is_all_or_nothing() {
        assert_eq!(aggregate([Checked, Checked]), Checked);
        assert_eq!(aggregate([Checked, Unchecked]), PartiallyChecked);
        assert_eq!(aggregate([Unchecked, Unchecked]), Unchecked);
        assert_eq!(aggregate([Checked, PartiallyChecked]), PartiallyChecked);
        assert_eq!(aggregate([Unchecked, PartiallyChecked]), PartiallyChecked);
        assert_eq!(aggregate([]), Unchecked);
    }

    #[test]
    fn unchecking_a_leaf_marks_ancestors_partial() {
        let (mut tree, [src, main, _lib, _readme]) = sample();
        tree.set_check_state(main, false).unwrap();

        assert_eq!(state(&tree, main), Unchecked);
        assert_eq!(state(&tree, src), PartiallyChecked);
        assert_eq!(state(&tree, tree.root()), PartiallyChecked);
    }

    #[test]
    fn unchecking_every_leaf_unchecks_ancestors() {
        let (mut tree, [src, main, lib, readme]) = sample();
        tree.set_check_state(main, false).unwrap();
        tree.set_check_state(lib, false).unwrap();
        assert_eq!(state(&tree, src), Unchecked);
        assert_eq!(state(&tree, tree.root()), PartiallyChecked);

        tree.set_check_state(readme, false).unwrap();
        assert_eq!(state(&tree, tree.root()), Unchecked);
    }

    #[test]
    fn rechecking_restores_checked_ancestors() {
        let (mut tree, [src, main, _lib, _readme]) = sample();
        tree.set_check_state(main, false).unwrap();
        tree.set_check_state(main, true).unwrap();
        assert_eq!(state(&tree, src), Checked);
        assert_eq!(state(&tree, tree.root()), Checked);
    }

    #[test]
    fn directory_click_reaches_every_descendant() {
        let (mut tree, [src, main, lib, readme]) = sample();
        tree.set_check_state(src, false).unwrap();

        assert_eq!(state(&tree, main), Unchecked);
        assert_eq!(state(&tree, lib), Unchecked);
        assert_eq!(state(&tree, readme), Checked);
        assert_eq!(state(&tree, tree.root()), PartiallyChecked);
    }

    #[test]
    fn clicking_a_partial_directory_pushes_a_definite_state() {
        let (mut tree, [src, main, lib, _readme]) = sample();
        tree.set_check_state(main, false).unwrap();
        assert_eq!(state(&tree, src), PartiallyChecked);

        tree.set_check_state(src, true).unwrap();
        assert_eq!(state(&tree, main), Checked);
        assert_eq!(state(&tree, lib), Checked);
        assert_eq!(state(&tree, src), Checked);

        tree.propagate_down(tree.root(), false);
        for i in 0..tree.len() {
            assert_eq!(state(&tree, NodeId(i)), Unchecked);
        }
    }

    #[test]
    fn propagate_down_is_idempotent() {
        let (mut tree, [src, main, ..]) = sample();
        tree.set_check_state(main, false).unwrap();

        tree.propagate_down(tree.root(), true);
        let once: Vec<CheckState> = (0..tree.len()).map(|i| state(&tree, NodeId(i))).collect();
        tree.propagate_down(tree.root(), true);
        let twice: Vec<CheckState> = (0..tree.len()).map(|i| state(&tree, NodeId(i))).collect();

        assert_eq!(once, twice);
        assert_eq!(state(&tree, src), Checked);
    }

    #[test]
    fn unknown_node_is_rejected() {
        let (mut tree, _) = sample();
        let err = tree.set_check_state(NodeId(99), true).unwrap_err();
        assert!(matches!(err, CoreError::UnknownNode(99)));
        assert!(tree.id(4).is_ok());
        assert!(tree.id(5).is_err());
    }

    #[test]
    fn parent_links_point_upwards() {
        let (tree, [src, main, _lib, readme]) = sample();
        assert_eq!(tree.node(main).unwrap().parent(), Some(src));
        assert_eq!(tree.node(readme).unwrap().parent(), Some(tree.root()));
        assert_eq!(tree.node(tree.root()).unwrap().parent(), None);
        assert_eq!(tree.node(src).unwrap().children(), &[main, NodeId(3)]);
    }

    #[test]
    fn totals_follow_the_selection() {
        let mut tree = SelectionTree::new(dir("root"));
        let root = tree.root();
        let _kept = tree.add_child(root, file("a.bin", 100)).unwrap();
        let toggled = tree.add_child(root, file("b.bin", 50)).unwrap();
        tree.set_check_state(toggled, false).unwrap();

        assert_eq!(tree.totals(false, &StdFileSystem).total_bytes, 100);

        tree.set_check_state(toggled, true).unwrap();
        assert_eq!(tree.totals(false, &StdFileSystem).total_bytes, 150);
    }

    #[test]
    fn partially_checked_directories_are_walked_through() {
        let (mut tree, [src, main, ..]) = sample();
        tree.set_check_state(main, false).unwrap();
        assert_eq!(state(&tree, tree.root()), PartiallyChecked);

        let mut seen = Vec::new();
        tree.visit_selected(|node, _| seen.push(node.label.clone()));
        assert_eq!(seen, ["root", "src", "lib.rs", "README.md"]);
        assert_eq!(state(&tree, src), PartiallyChecked);
        assert_eq!(tree.totals(false, &StdFileSystem).total_bytes, 25);
    }

    #[test]
    fn totals_skip_subtrees_of_unchecked_nodes() {
        let (mut tree, [src, main, ..]) = sample();
        tree.set_check_state(src, false).unwrap();
        // Force an inconsistent child state: it must still be ignored.
        tree.nodes[main.0].state = Checked;

        let totals = tree.totals(false, &StdFileSystem);
        assert_eq!(totals.total_bytes, 5);
    }

    #[test]
    fn line_totals_only_when_contents_are_included() {
        let temp = tempdir().unwrap();
        let a = temp.path().join("a.txt");
        let b = temp.path().join("b.txt");
        fs::write(&a, "one\ntwo\nthree\n").unwrap();
        fs::write(&b, "last line without newline").unwrap();

        let mut tree = SelectionTree::new(TreeNode::new(
            temp.path().display().to_string(),
            temp.path(),
            NodeKind::Directory,
            None,
        ));
        let root = tree.root();
        tree.add_child(root, TreeNode::new("a.txt", &a, NodeKind::File, Some(14))).unwrap();
        tree.add_child(root, TreeNode::new("b.txt", &b, NodeKind::File, Some(25))).unwrap();
        tree.add_child(root, TreeNode::new("gone.txt", temp.path().join("gone.txt"), NodeKind::File, Some(1)))
            .unwrap();

        assert_eq!(
            tree.totals(false, &StdFileSystem),
            SelectionTotals { total_bytes: 40, total_lines: 0 }
        );
        assert_eq!(
            tree.totals(true, &StdFileSystem),
            SelectionTotals { total_bytes: 40, total_lines: 4 }
        );
    }

    #[test]
    fn visit_selected_is_preorder_with_levels() {
        let (tree, _) = sample();
        let mut seen = Vec::new();
        tree.visit_selected(|node, level| seen.push((node.label.clone(), level)));
        assert_eq!(
            seen,
            vec![
                ("root".to_string(), 0),
                ("src".to_string(), 1),
                ("main.rs".to_string(), 2),
                ("lib.rs".to_string(), 2),
                ("README.md".to_string(), 1),
            ]
        );
    }
}
