//! Status command handler

use anyhow::Result;

use quotes_core::Store;

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(store: &Store, output: &Output) -> Result<()> {
    let config = store.config();
    let categories = store.category_index().categories();
    let last_shown = store.last_shown()?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "quotes": store.len(),
                    "categories": categories.len(),
                    "selected_category": store.selected_category().as_str(),
                    "last_shown": last_shown,
                    "sync": {
                        "enabled": config.sync_enabled,
                        "url": config.sync_url,
                        "interval_secs": config.sync_interval().as_secs(),
                        "timeout_secs": config.sync_timeout().as_secs()
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", store.len());
        }
        OutputFormat::Human => {
            println!("Quotes Status");
            println!("=============");
            println!();
            println!("Collection:");
            println!("  Quotes:     {}", store.len());
            println!("  Categories: {}", categories.len());
            println!("  Filter:     {}", store.selected_category());
            if let Some(shown) = last_shown {
                println!(
                    "  Last shown: {} ({})",
                    shown.quote,
                    shown
                        .shown_at
                        .with_timezone(&chrono::Local)
                        .format("%Y-%m-%d %H:%M")
                );
            }
            println!();
            println!("Sync:");
            println!(
                "  Status:   {}",
                if config.sync_enabled {
                    "enabled"
                } else {
                    "disabled"
                }
            );
            println!("  Server:   {}", config.sync_url);
            println!("  Interval: {}s", config.sync_interval().as_secs());
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
        }
    }

    Ok(())
}
