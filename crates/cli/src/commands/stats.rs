//! Stats command handler.
//!
//! Reports collection and database statistics.

use clap::Args;
use lore_core::{config::AppConfig, AppResult};
use lore_rag::IndexStore;

/// Show index statistics
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing stats command for {:?}", config.index_path);

        let store = IndexStore::open(&config.index_path)?;
        let stats = store.stats(&config.collection)?;

        let db_size_bytes = std::fs::metadata(&config.index_path)
            .map(|m| m.len())
            .unwrap_or(0);

        match stats {
            Some(stats) => {
                if self.json {
                    let output = serde_json::json!({
                        "collection": stats.collection,
                        "records": stats.records,
                        "dbSizeBytes": db_size_bytes,
                        "createdAt": stats.created_at,
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                } else {
                    println!("Collection: {}", stats.collection);
                    println!("  Records: {}", stats.records);
                    println!("  DB size: {} bytes", db_size_bytes);
                    if let Some(created_at) = stats.created_at {
                        println!("  Created: {}", created_at);
                    }
                }
            }
            None => {
                if self.json {
                    let output = serde_json::json!({
                        "collection": config.collection,
                        "records": 0,
                        "dbSizeBytes": db_size_bytes,
                        "createdAt": null,
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                } else {
                    println!("Collection '{}' does not exist yet", config.collection);
                }
            }
        }

        Ok(())
    }
}
