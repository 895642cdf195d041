use anyhow::Result;
use directories::ProjectDirs;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use super::AppConfig;

const APP_NAME: &str = "LLMCodingToolset";
const CONFIG_FILE: &str = "config.json";

/// Returns the platform-specific configuration directory for the application.
pub fn get_config_directory() -> Option<PathBuf> {
    ProjectDirs::from("com", "darkstarworks", APP_NAME)
        .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
}

/// Returns the full path to the configuration file.
pub fn get_config_file_path() -> Option<PathBuf> {
    get_config_directory().map(|dir| dir.join(CONFIG_FILE))
}

fn resolve_path(path_override: Option<&Path>) -> Result<PathBuf> {
    match path_override {
        Some(path) => Ok(path.to_path_buf()),
        None => get_config_file_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory")),
    }
}

/// Loads the application configuration from the config file.
///
/// A missing file is created with defaults. A file that cannot be parsed is
/// migrated if it looks like an older layout, and replaced by defaults in
/// memory otherwise; a broken settings file never prevents startup.
pub fn load_config(path_override: Option<&Path>) -> Result<AppConfig> {
    let config_path = resolve_path(path_override)?;

    if !config_path.exists() {
        tracing::info!(
            "Config file not found, creating default config at {:?}",
            config_path
        );
        let default_config = AppConfig::default();
        save_config(&default_config, Some(config_path.as_path()))?;
        return Ok(default_config);
    }

    let config_content = fs::read_to_string(&config_path)?;

    match serde_json::from_str::<AppConfig>(&config_content) {
        Ok(config) => {
            tracing::info!("Loaded config from {:?}", config_path);
            Ok(config.normalized())
        }
        Err(e) => {
            tracing::warn!(
                "Failed to parse config file at {:?}: {}. Falling back to default config.",
                config_path,
                e
            );
            migrate_legacy_config(&config_content).or_else(|_| Ok(AppConfig::default()))
        }
    }
}

/// Converts settings written by older versions, which stored every value as
/// a string and could lack fields, to the current `AppConfig`.
fn migrate_legacy_config(config_content: &str) -> Result<AppConfig> {
    let mut value: Value = serde_json::from_str(config_content)?;
    let obj = value
        .as_object_mut()
        .ok_or_else(|| anyhow::anyhow!("Config is not a JSON object"))?;

    let defaults = AppConfig::default();

    // "3" -> 3
    let legacy_depth = obj
        .get("default_depth")
        .and_then(Value::as_str)
        .map(|depth| depth.trim().parse::<usize>().unwrap_or(defaults.default_depth));
    if let Some(depth) = legacy_depth {
        obj.insert("default_depth".to_string(), serde_json::to_value(depth)?);
    }
    // "true" -> true
    let legacy_flag = obj
        .get("auto_update")
        .and_then(Value::as_str)
        .map(|flag| flag.trim().eq_ignore_ascii_case("true"));
    if let Some(flag) = legacy_flag {
        obj.insert("auto_update".to_string(), Value::Bool(flag));
    }

    // Helper to insert a default value if the key is missing or its value is null.
    let ensure_field = |obj: &mut serde_json::Map<String, Value>, key: &str, default_val: Value| {
        if !obj.contains_key(key) || obj.get(key) == Some(&Value::Null) {
            obj.insert(key.to_string(), default_val);
        }
    };

    ensure_field(obj, "theme", serde_json::to_value(defaults.theme)?);
    ensure_field(
        obj,
        "default_depth",
        serde_json::to_value(defaults.default_depth)?,
    );
    ensure_field(obj, "auto_update", Value::Bool(defaults.auto_update));
    ensure_field(
        obj,
        "window_size",
        serde_json::to_value(defaults.window_size)?,
    );
    ensure_field(
        obj,
        "window_position",
        serde_json::to_value(defaults.window_position)?,
    );

    let migrated_config: AppConfig = serde_json::from_value(Value::Object(obj.clone()))?;
    tracing::info!("Successfully migrated legacy config");
    Ok(migrated_config.normalized())
}

/// Saves the provided configuration to the config file.
pub fn save_config(config: &AppConfig, path_override: Option<&Path>) -> Result<()> {
    let config_path = resolve_path(path_override)?;

    if let Some(config_dir) = config_path.parent() {
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            tracing::info!("Created config directory: {:?}", config_dir);
        }
    }

    let config_json = serde_json::to_string_pretty(config)?;
    fs::write(&config_path, config_json)?;
    tracing::info!("Saved config to {:?}", config_path);

    Ok(())
}

// Platform-specific configuration paths for reference:
// macOS:   ~/Library/Application Support/com.darkstarworks.LLMCodingToolset/
// Linux:   ~/.config/llmcodingtoolset/
// Windows: %APPDATA%/darkstarworks/LLMCodingToolset/config/
