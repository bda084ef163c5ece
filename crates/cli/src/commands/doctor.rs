//! `taleweave doctor`: diagnose configuration and storage.

use std::path::Path;
use taleweave_core::SummaryStore;
use taleweave_providers::build_tokenizer;

use super::{config_target, load_config, open_store, CommandResult};

pub async fn run(config_path: Option<&Path>) -> CommandResult {
    println!("🩺 Taleweave Doctor: System Diagnostics");
    println!("=======================================\n");

    let mut issues = 0;

    let target = config_target(config_path);
    if target.exists() {
        println!("  ✅ Config file found at {}", target.display());
    } else {
        println!("  ⚠️  No config file; using defaults (run `taleweave init`)");
        issues += 1;
    }

    let config = match load_config(config_path) {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  {} issue(s) found. See above for details.", issues + 1);
            return Ok(());
        }
    };

    if config.has_api_key() {
        println!("  ✅ API key configured");
    } else {
        println!("  ⚠️  No API key; set TALEWEAVE_API_KEY or provider.api_key");
        issues += 1;
    }

    match build_tokenizer(&config.pipeline.tokenizer) {
        Ok(tokenizer) => println!("  ✅ Prompt tokenizer: {}", tokenizer.name()),
        Err(e) => {
            println!("  ❌ Prompt tokenizer unavailable: {e}");
            issues += 1;
        }
    }

    match open_store(&config).await {
        Ok(store) => match store.count().await {
            Ok(count) => println!("  ✅ Database reachable ({count} digest(s))"),
            Err(e) => {
                println!("  ❌ Database query failed: {e}");
                issues += 1;
            }
        },
        Err(e) => {
            println!("  ❌ Database unavailable: {e}");
            issues += 1;
        }
    }

    for (label, dir) in [
        ("Summaries", &config.storage.summaries_dir),
        ("Images", &config.storage.images_dir),
    ] {
        if dir.is_dir() {
            println!("  ✅ {label} directory exists");
        } else {
            println!("  ⚠️  {label} directory {} missing; it is created on first run", dir.display());
        }
    }

    for (label, dir) in [
        ("GPT reference", &config.evaluation.llm_reference_dir),
        ("Cosine reference", &config.evaluation.extractive_reference_dir),
    ] {
        if dir.is_dir() {
            println!("  ✅ {label} folder exists");
        } else {
            println!("  ⚠️  {label} folder {} missing; evaluation will find no matches", dir.display());
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
