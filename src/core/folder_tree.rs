//! Builds a checkable folder tree from disk and renders the selected part of it.

use std::cmp::Ordering;
use std::path::Path;

use super::error::CoreError;
use super::fs::{split_lines, FileSystem};
use super::selection::{CheckState, NodeId, NodeKind, SelectionTree, TreeNode};

/// Smallest and largest depth offered for a folder view.
pub const MIN_DEPTH: usize = 1;
pub const MAX_DEPTH: usize = 10;

const INDENT: &str = "  ";

/// A utility struct for building and exporting folder trees.
///
/// This struct is stateless and provides methods as associated functions.
pub struct FolderTree;

impl FolderTree {
    /// Builds a fully checked tree for `root`, `depth` levels deep.
    ///
    /// The root is labelled with the folder path as given. Depth 1 lists the
    /// direct children only; depth 0 yields the root alone. Entries whose
    /// metadata cannot be read are skipped with a warning.
    pub fn build<F: FileSystem + ?Sized>(
        root: &Path,
        depth: usize,
        fs: &F,
    ) -> Result<SelectionTree, CoreError> {
        if !fs.is_directory(root) {
            return Err(CoreError::NotADirectory(root.to_path_buf()));
        }

        let mut tree = SelectionTree::new(TreeNode::new(
            root.display().to_string(),
            root,
            NodeKind::Directory,
            None,
        ));
        let root_id = tree.root();
        Self::add_children(&mut tree, root_id, root, depth, fs)?;

        tracing::info!(
            "Built folder tree for {} with {} nodes (depth {})",
            root.display(),
            tree.len(),
            depth
        );
        Ok(tree)
    }

    fn add_children<F: FileSystem + ?Sized>(
        tree: &mut SelectionTree,
        parent: NodeId,
        path: &Path,
        depth: usize,
        fs: &F,
    ) -> Result<(), CoreError> {
        if depth == 0 {
            return Ok(());
        }

        let names = match fs.list_children(path) {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!("Skipping unreadable directory: {}", e);
                return Ok(());
            }
        };

        let mut entries: Vec<(String, bool)> = names
            .into_iter()
            .map(|name| {
                let is_dir = fs.is_directory(&path.join(&name));
                (name, is_dir)
            })
            .collect();

        // Directories first, then files
        entries.sort_by(|(a_name, a_dir), (b_name, b_dir)| match (a_dir, b_dir) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => a_name.cmp(b_name),
        });

        for (name, is_dir) in entries {
            let full_path = path.join(&name);
            let size = match fs.size_in_bytes(&full_path) {
                Ok(size) => size,
                Err(e) => {
                    tracing::warn!("Skipping entry without metadata: {}", e);
                    continue;
                }
            };
            let kind = if is_dir { NodeKind::Directory } else { NodeKind::File };
            let id = tree.add_child(parent, TreeNode::new(name, &full_path, kind, Some(size)))?;

            if is_dir {
                Self::add_children(tree, id, &full_path, depth - 1, fs)?;
            }
        }
        Ok(())
    }

    /// Renders the selected part of `tree` as an indented listing.
    ///
    /// Unchecked subtrees are left out. Each node is indented two spaces per
    /// level. With `include_contents`, every checked file is followed by a
    /// `Content:` line and its text, indented one and two levels deeper.
    pub fn render_structure<F: FileSystem + ?Sized>(
        tree: &SelectionTree,
        include_contents: bool,
        fs: &F,
    ) -> String {
        let mut lines: Vec<String> = Vec::new();

        tree.visit_selected(|node, level| {
            lines.push(format!("{}{}", INDENT.repeat(level), node.label));

            if include_contents && node.is_file() && node.state() == CheckState::Checked {
                match fs.read_to_string_lossy(&node.path) {
                    Ok(content) => {
                        lines.push(format!("{}Content:", INDENT.repeat(level + 1)));
                        let content_indent = INDENT.repeat(level + 2);
                        lines.extend(
                            split_lines(&content)
                                .into_iter()
                                .map(|line| format!("{content_indent}{line}")),
                        );
                    }
                    Err(e) => tracing::warn!("Leaving out unreadable file content: {}", e),
                }
            }
        });

        lines.join("\n")
    }
}

/// Keeps a requested depth inside the offered range.
pub fn clamp_depth(depth: usize) -> usize {
    depth.clamp(MIN_DEPTH, MAX_DEPTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fs::StdFileSystem;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn project() -> TempDir {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("subfolder/deeper")).unwrap();
        fs::write(dir.path().join("file1.txt"), "Test content").unwrap();
        fs::write(dir.path().join("subfolder/file2.txt"), "Subfolder content\nsecond line").unwrap();
        fs::write(dir.path().join("subfolder/deeper/file3.txt"), "deep").unwrap();
        dir
    }

    fn child_labels(tree: &SelectionTree, id: NodeId) -> Vec<String> {
        tree.node(id)
            .unwrap()
            .children()
            .iter()
            .map(|c| tree.node(*c).unwrap().label.clone())
            .collect()
    }

    #[test]
    fn builds_directories_first_with_sizes() {
        let dir = project();
        let tree = FolderTree::build(dir.path(), 2, &StdFileSystem).unwrap();
        let root = tree.root();

        assert_eq!(tree.node(root).unwrap().label, dir.path().display().to_string());
        assert_eq!(child_labels(&tree, root), vec!["subfolder", "file1.txt"]);

        let file1 = tree.node(root).unwrap().children()[1];
        assert_eq!(tree.node(file1).unwrap().size, Some(12));
        assert_eq!(tree.node(file1).unwrap().kind, NodeKind::File);

        let subfolder = tree.node(root).unwrap().children()[0];
        assert_eq!(child_labels(&tree, subfolder), vec!["deeper", "file2.txt"]);
    }

    #[test]
    fn depth_limits_recursion() {
        let dir = project();

        let shallow = FolderTree::build(dir.path(), 1, &StdFileSystem).unwrap();
        assert_eq!(shallow.len(), 3);
        let subfolder = shallow.node(shallow.root()).unwrap().children()[0];
        assert!(shallow.node(subfolder).unwrap().children().is_empty());

        let deep = FolderTree::build(dir.path(), 10, &StdFileSystem).unwrap();
        assert_eq!(deep.len(), 6);

        let none = FolderTree::build(dir.path(), 0, &StdFileSystem).unwrap();
        assert_eq!(none.len(), 1);
    }

    #[test]
    fn every_node_starts_checked() {
        let dir = project();
        let tree = FolderTree::build(dir.path(), 10, &StdFileSystem).unwrap();
        let mut count = 0;
        tree.visit_selected(|_, _| count += 1);
        assert_eq!(count, tree.len());
        assert_eq!(tree.node(tree.root()).unwrap().state(), CheckState::Checked);
    }

    #[test]
    fn rejects_a_file_as_root() {
        let dir = project();
        let file = dir.path().join("file1.txt");
        let err = FolderTree::build(&file, 3, &StdFileSystem).unwrap_err();
        assert!(matches!(err, CoreError::NotADirectory(p) if p == file));
    }

    #[test]
    fn renders_structure_without_contents() {
        let dir = project();
        let tree = FolderTree::build(dir.path(), 10, &StdFileSystem).unwrap();
        let root = dir.path().display().to_string();

        let output = FolderTree::render_structure(&tree, false, &StdFileSystem).replace(&root, "[ROOT]");
        insta::assert_snapshot!(output, @r"
        [ROOT]
          subfolder
            deeper
              file3.txt
            file2.txt
          file1.txt
        ");
    }

    #[test]
    fn renders_contents_and_skips_unchecked_branches() {
        let dir = project();
        let mut tree = FolderTree::build(dir.path(), 10, &StdFileSystem).unwrap();
        let root = dir.path().display().to_string();
        let subfolder = tree.node(tree.root()).unwrap().children()[0];
        let deeper = tree.node(subfolder).unwrap().children()[0];
        tree.set_check_state(deeper, false).unwrap();

        let output = FolderTree::render_structure(&tree, true, &StdFileSystem).replace(&root, "[ROOT]");
        insta::assert_snapshot!(output, @r"
        [ROOT]
          subfolder
            file2.txt
              Content:
                Subfolder content
                second line
          file1.txt
            Content:
              Test content
        ");
    }

    #[test]
    fn unchecked_branch_is_left_out_of_the_export() {
        let dir = project();
        let mut tree = FolderTree::build(dir.path(), 10, &StdFileSystem).unwrap();
        let subfolder = tree.node(tree.root()).unwrap().children()[0];
        tree.set_check_state(subfolder, false).unwrap();

        assert_eq!(
            tree.node(tree.root()).unwrap().state(),
            CheckState::PartiallyChecked
        );
        let output = FolderTree::render_structure(&tree, false, &StdFileSystem);
        assert!(output.contains("file1.txt"));
        assert!(!output.contains("subfolder"));
        assert!(!output.contains("file2.txt"));
    }

    #[test]
    fn clamps_depth() {
        assert_eq!(clamp_depth(0), 1);
        assert_eq!(clamp_depth(3), 3);
        assert_eq!(clamp_depth(42), 10);
    }
}
