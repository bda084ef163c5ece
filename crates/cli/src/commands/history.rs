//! `taleweave show | recent | search`: browse stored digests.

use std::path::Path;
use taleweave_core::{SummaryRow, SummaryStore};

use super::{load_config, open_store, preview, CommandResult};

pub fn print_row(row: &SummaryRow) {
    println!("📖 #{} {}", row.id, row.title);
    println!("   {} · {}", row.timestamp.format("%Y-%m-%d %H:%M:%S UTC"), row.model_name);
    for (label, text, image) in [
        ("Introduction", &row.introduction, &row.img_intro),
        ("Development", &row.development, &row.img_development),
        ("Conclusion", &row.conclusion, &row.img_conclusion),
    ] {
        println!("\n  {label}:");
        println!("    {text}");
        if image.is_empty() {
            println!("    (no image)");
        } else {
            println!("    🖼️  {image}");
        }
    }
}

fn print_listing(rows: &[SummaryRow]) {
    for row in rows {
        println!(
            "  #{:<4} {}  {}  {}",
            row.id,
            row.timestamp.format("%Y-%m-%d %H:%M"),
            preview(&row.title, 40),
            preview(&row.introduction, 60)
        );
    }
}

pub async fn show(config_path: Option<&Path>, id: i64) -> CommandResult {
    let config = load_config(config_path)?;
    let store = open_store(&config).await?;
    match store.get(id).await? {
        Some(row) => print_row(&row),
        None => println!("No digest with id {id}"),
    }
    Ok(())
}

pub async fn recent(config_path: Option<&Path>, limit: usize) -> CommandResult {
    let config = load_config(config_path)?;
    let store = open_store(&config).await?;
    let rows = store.recent(limit).await?;
    let total = store.count().await?;

    println!("🗂️  Recent digests ({} of {total})\n", rows.len());
    print_listing(&rows);
    Ok(())
}

pub async fn search(config_path: Option<&Path>, query: &str) -> CommandResult {
    let config = load_config(config_path)?;
    let store = open_store(&config).await?;
    let rows = store.search_title(query).await?;

    if rows.is_empty() {
        println!("No digests with a title matching \"{query}\"");
    } else {
        println!("🔎 {} digest(s) matching \"{query}\"\n", rows.len());
        print_listing(&rows);
    }
    Ok(())
}
