//! CLI command implementations.

pub mod config;
pub mod rename;

use std::env;
use std::path::{Path, PathBuf};

use trainticket_core::Settings;

/// Settings file used when `--config` is not given.
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("trainticket")
        .join("settings.json")
}

pub fn settings_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_settings_path)
}

/// Defaults rooted next to the executable, or the working directory.
pub fn default_settings() -> anyhow::Result<Settings> {
    let base = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .map_or_else(env::current_dir, Ok)?;
    Ok(Settings::default_for_dir(&base))
}

/// Saved settings, or defaults when none are saved.
pub fn load_settings(path: &Path) -> anyhow::Result<(Settings, bool)> {
    match Settings::load(path)? {
        Some(settings) => Ok((settings, true)),
        None => Ok((default_settings()?, false)),
    }
}
