//! Line-based unified diffs for the diff viewer.

use serde::Serialize;
use similar::{ChangeTag, TextDiff};

/// Lines of unchanged context around each hunk shown by the viewer.
pub const DEFAULT_CONTEXT_LINES: usize = 0;

/// How a diff line is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiffLineKind {
    /// Starts with `+`: green background.
    Added,
    /// Starts with `-`: red background.
    Removed,
    /// Everything else, hunk headers included.
    Plain,
}

impl DiffLineKind {
    /// Classifies a unified diff line by its first character.
    pub fn classify(line: &str) -> Self {
        if line.starts_with('+') {
            DiffLineKind::Added
        } else if line.starts_with('-') {
            DiffLineKind::Removed
        } else {
            DiffLineKind::Plain
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffLine {
    pub kind: DiffLineKind,
    pub text: String,
}

/// Produces the unified diff of two texts, one entry per output line.
///
/// Both texts are split into lines before comparing, so a missing trailing
/// newline is not a difference. Identical texts give an empty diff; otherwise
/// the output opens with empty `--- ` and `+++ ` header lines.
pub fn unified_diff(old: &str, new: &str, context_lines: usize) -> Vec<String> {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();
    let diff = TextDiff::from_slices(&old_lines, &new_lines);

    let mut unified = diff.unified_diff();
    unified.context_radius(context_lines);

    let mut output = Vec::new();
    for hunk in unified.iter_hunks() {
        if output.is_empty() {
            output.push("--- ".to_string());
            output.push("+++ ".to_string());
        }
        output.push(hunk.header().to_string());
        for change in hunk.iter_changes() {
            let sign = match change.tag() {
                ChangeTag::Equal => ' ',
                ChangeTag::Delete => '-',
                ChangeTag::Insert => '+',
            };
            output.push(format!("{sign}{}", change.value()));
        }
    }
    output
}

/// The diff as the viewer shows it: headers dropped, every line classified.
pub fn display_lines(old: &str, new: &str, context_lines: usize) -> Vec<DiffLine> {
    unified_diff(old, new, context_lines)
        .into_iter()
        .skip(2)
        .map(|text| DiffLine {
            kind: DiffLineKind::classify(&text),
            text,
        })
        .collect()
}
