//! The tool logic, free of any window or IPC concerns.

pub mod diff;
pub mod error;
pub mod folder_tree;
pub mod fs;
pub mod line_numbers;
pub mod selection;
pub mod update;

pub use error::CoreError;
pub use folder_tree::FolderTree;
pub use fs::{FileSystem, StdFileSystem};
pub use line_numbers::{add_line_numbers, locate, NumberedListing, NumberingOutcome, StartLine};
pub use selection::{aggregate, CheckState, NodeId, SelectionTotals, SelectionTree};
pub use update::{UpdateCheckError, UpdateStatus, VersionSource};
