//! Locates a snippet inside a reference document and renders it with
//! aligned line numbers.

use std::fmt;

use super::fs::split_lines;

/// Largest start line accepted from the user; larger values are clamped.
pub const MAX_START_LINE: usize = 999_999_999;

/// Shown in place of the output when a loaded file does not contain the snippet.
pub const SNIPPET_NOT_FOUND_MESSAGE: &str = "Snippet not found in the loaded file.";

/// Finds the 1-indexed line at which `snippet` starts inside `document`.
///
/// Every snippet line must be a prefix of the corresponding document line once
/// leading whitespace is stripped from both, so a snippet that stops mid-line
/// or lost its trailing whitespace still matches. The lowest matching offset
/// wins. An empty snippet matches vacuously at line 1.
pub fn locate<D, S>(document: &[D], snippet: &[S]) -> Option<usize>
where
    D: AsRef<str>,
    S: AsRef<str>,
{
    if snippet.len() > document.len() {
        return None;
    }

    (0..=document.len() - snippet.len())
        .find(|&offset| {
            snippet.iter().enumerate().all(|(j, snippet_line)| {
                document[offset + j]
                    .as_ref()
                    .trim_start()
                    .starts_with(snippet_line.as_ref().trim_start())
            })
        })
        .map(|offset| offset + 1)
}

/// A single output line: its number and the untouched source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedLine {
    pub number: usize,
    pub text: String,
}

/// A run of consecutive numbered lines sharing one number column width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedListing {
    width: usize,
    lines: Vec<NumberedLine>,
}

impl NumberedListing {
    /// Numbers `lines` starting at `start`.
    ///
    /// The column is as wide as the largest number in the listing, so `9` and
    /// `10` line up as ` 9` and `10`. Numbers saturate at `usize::MAX`.
    pub fn new<S: AsRef<str>>(start: usize, lines: &[S]) -> Self {
        let last = start.saturating_add(lines.len().saturating_sub(1));
        let width = last.to_string().len();
        let lines = lines
            .iter()
            .enumerate()
            .map(|(i, line)| NumberedLine {
                number: start.saturating_add(i),
                text: line.as_ref().to_string(),
            })
            .collect();
        Self { width, lines }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn lines(&self) -> &[NumberedLine] {
        &self.lines
    }
}

impl fmt::Display for NumberedListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{:>width$}: {}", line.number, line.text, width = self.width)?;
        }
        Ok(())
    }
}

/// Where the first line number of a request comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartLine<'a> {
    /// No reference file is loaded; the user typed the start line.
    Manual(usize),
    /// A reference file is loaded; the start is always located in it.
    Locate(&'a str),
}

/// Result of a single "Add Line Numbers" request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumberingOutcome {
    /// The snippet was empty; nothing changes.
    Empty,
    /// A reference file is loaded but does not contain the snippet.
    NotFound,
    Numbered { start: usize, output: String },
}

/// Keeps a user-supplied start line within `1..=MAX_START_LINE`.
pub fn clamp_start_line(value: usize) -> usize {
    value.clamp(1, MAX_START_LINE)
}

/// Numbers `snippet`, deriving the start line according to `start`.
pub fn add_line_numbers(snippet: &str, start: StartLine<'_>) -> NumberingOutcome {
    if snippet.is_empty() {
        return NumberingOutcome::Empty;
    }

    let snippet_lines = split_lines(snippet);
    let start = match start {
        StartLine::Manual(value) => clamp_start_line(value),
        StartLine::Locate(document) => {
            let document_lines = split_lines(document);
            match locate(&document_lines, &snippet_lines) {
                Some(line) => line,
                None => return NumberingOutcome::NotFound,
            }
        }
    };

    NumberingOutcome::Numbered {
        start,
        output: NumberedListing::new(start, &snippet_lines).to_string(),
    }
}
