pub mod settings;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::folder_tree::clamp_depth;

/// The color scheme offered in the settings dialog.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    pub theme: Theme,
    /// Depth preselected in the folder structure tab, 1 to 10.
    pub default_depth: usize,
    /// Whether to look for a newer release at startup.
    pub auto_update: bool,
    pub window_size: (f64, f64),
    pub window_position: (f64, f64),
}

impl AppConfig {
    pub fn load(path_override: Option<&Path>) -> Result<Self> {
        settings::load_config(path_override)
    }

    /// Returns the config with out-of-range values pulled back into range.
    pub fn normalized(mut self) -> Self {
        self.default_depth = clamp_depth(self.default_depth);
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            default_depth: 3,
            auto_update: true,
            window_size: (800.0, 600.0),
            window_position: (100.0, 100.0),
        }
    }
}
