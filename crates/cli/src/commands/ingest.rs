//! Ingest command handler.
//!
//! Builds or extends the vector index from the PDFs in the data
//! directory.

use clap::Args;
use lore_cohere::CohereClient;
use lore_core::{config::AppConfig, AppError, AppResult};
use lore_rag::{IndexStore, IngestOptions, PdfLoader};

/// Ingest PDFs into the vector index
#[derive(Args, Debug)]
pub struct IngestCommand {
    /// Chunk size in characters
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Chunk overlap in characters
    #[arg(long)]
    pub chunk_overlap: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IngestCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ingest command for {:?}", config.data_dir);

        let options = IngestOptions {
            chunk_size: self.chunk_size.unwrap_or(config.chunk_size),
            chunk_overlap: self.chunk_overlap.unwrap_or(config.chunk_overlap),
        };

        // Command-line chunking flags bypass AppConfig::validate
        if options.chunk_size == 0 || options.chunk_overlap >= options.chunk_size {
            return Err(AppError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                options.chunk_overlap, options.chunk_size
            )));
        }

        let mut store = IndexStore::open(&config.index_path)?;
        let client = CohereClient::new(
            config.api_key.clone(),
            config.embed_model.clone(),
            config.generate_model.clone(),
        )?;

        let report = lore_rag::ingest_directory(
            &mut store,
            &PdfLoader,
            &client,
            &config.data_dir,
            &config.collection,
            options,
        )
        .await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!(
                "Ingested {} chunks from {} documents in {:.2}s",
                report.chunks_written,
                report.documents_found - report.documents_skipped,
                report.elapsed_secs
            );
            if report.documents_skipped > 0 || report.chunks_skipped > 0 {
                println!(
                    "Skipped {} documents and {} chunks",
                    report.documents_skipped, report.chunks_skipped
                );
            }
        }

        Ok(())
    }
}
