//! The file system collaborator used by the folder tree and its metrics.

use std::fs;
use std::path::Path;

use super::error::CoreError;

/// Read-only access to the file system.
///
/// Kept behind a trait so the tree logic can be exercised against a fake
/// in tests. Text reads never fail on malformed UTF-8; invalid sequences are
/// replaced instead.
pub trait FileSystem: Send + Sync {
    /// Reads a whole file, replacing malformed UTF-8 sequences.
    fn read_to_string_lossy(&self, path: &Path) -> Result<String, CoreError>;

    /// Size of the entry in bytes, as reported by its metadata.
    fn size_in_bytes(&self, path: &Path) -> Result<u64, CoreError>;

    /// Names of the direct children of a directory, in no particular order.
    fn list_children(&self, path: &Path) -> Result<Vec<String>, CoreError>;

    fn is_directory(&self, path: &Path) -> bool;

    /// Splits a file into lines. A trailing line without terminator counts.
    fn read_lines(&self, path: &Path) -> Result<Vec<String>, CoreError> {
        let content = self.read_to_string_lossy(path)?;
        Ok(split_lines(&content).into_iter().map(str::to_owned).collect())
    }
}

/// Splits `text` at every line boundary, without the terminators.
///
/// Besides `\n` and `\r\n` this accepts a lone `\r` (classic Mac files) and
/// the other Unicode line and paragraph separators. A terminator at the very
/// end does not start another line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&text[start..i]);
        start = i + c.len_utf8();
        if c == '\r' {
            if let Some(&(j, '\n')) = chars.peek() {
                chars.next();
                start = j + 1;
            }
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// The production implementation backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn read_to_string_lossy(&self, path: &Path) -> Result<String, CoreError> {
        let bytes = fs::read(path).map_err(|e| CoreError::Io(e, path.to_path_buf()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn size_in_bytes(&self, path: &Path) -> Result<u64, CoreError> {
        fs::metadata(path)
            .map(|metadata| metadata.len())
            .map_err(|e| CoreError::Io(e, path.to_path_buf()))
    }

    fn list_children(&self, path: &Path) -> Result<Vec<String>, CoreError> {
        let entries = fs::read_dir(path).map_err(|e| CoreError::Io(e, path.to_path_buf()))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CoreError::Io(e, path.to_path_buf()))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }
}
