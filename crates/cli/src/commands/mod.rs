//! CLI command implementations.

pub mod doctor;
pub mod evaluate;
pub mod history;
pub mod init;
pub mod run;

use std::path::{Path, PathBuf};
use taleweave_config::{AppConfig, ConfigError};
use taleweave_core::error::PersistenceError;
use taleweave_store::SqliteStore;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Load `path` if given, otherwise the first default location.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => AppConfig::load_with_overrides(path),
        None => AppConfig::load(),
    }
}

/// The config file `load_config` reads, or would read if it existed.
pub fn config_target(path: Option<&Path>) -> PathBuf {
    match path {
        Some(path) => path.to_path_buf(),
        None => AppConfig::default_paths()
            .into_iter()
            .find(|p| p.exists())
            .unwrap_or_else(|| AppConfig::config_dir().join("config.toml")),
    }
}

pub async fn open_store(config: &AppConfig) -> Result<SqliteStore, PersistenceError> {
    SqliteStore::new(&config.storage.database_url).await
}

/// First `max` characters of `text`, with an ellipsis when cut.
pub fn preview(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}
