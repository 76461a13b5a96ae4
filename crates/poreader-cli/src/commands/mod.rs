//! Subcommands.

pub mod config;
pub mod process;
pub mod serve;

use std::path::{Path, PathBuf};

use anyhow::Context;
use poreader_core::PoReaderConfig;

/// Location used when no `--config` is given.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("poreader")
        .join("config.json")
}

/// Resolve the config file path: the explicit one, else the default location.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit.map(Path::to_path_buf).unwrap_or_else(default_config_path)
}

/// Load configuration.
///
/// An explicit path must exist. The default location falls back to built-in
/// defaults when no file has been created yet.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<PoReaderConfig> {
    if let Some(path) = explicit {
        return PoReaderConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }

    let path = default_config_path();
    if path.exists() {
        Ok(PoReaderConfig::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?)
    } else {
        Ok(PoReaderConfig::default())
    }
}
