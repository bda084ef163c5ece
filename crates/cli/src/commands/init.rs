//! `taleweave init`: write a default config file.

use std::path::{Path, PathBuf};
use taleweave_config::AppConfig;

use super::CommandResult;

/// Written to the working directory unless `--config` names another file.
const DEFAULT_CONFIG_FILE: &str = "taleweave.toml";

pub async fn run(path: Option<&Path>, force: bool) -> CommandResult {
    println!("🧵 Taleweave Setup");
    println!("==================\n");

    let config_path = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);
    if config_path.exists() && !force {
        println!("  ⚠️  Config already exists at {}", config_path.display());
        println!("     Re-run with --force to overwrite it.");
        return Ok(());
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&config_path, AppConfig::default_toml()).await?;
    println!("  ✅ Config written to {}", config_path.display());

    let config = AppConfig::load_with_overrides(&config_path)?;
    for dir in [&config.storage.summaries_dir, &config.storage.images_dir] {
        tokio::fs::create_dir_all(dir).await?;
        println!("  ✅ Created {}", dir.display());
    }

    println!();
    if config.has_api_key() {
        println!("  Ready. Try: taleweave run --file tale.txt");
    } else {
        println!("  Next: set TALEWEAVE_API_KEY (or provider.api_key in the config).");
    }
    Ok(())
}
