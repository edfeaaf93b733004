//! Configuration management for the lore CLI.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Built-in defaults
//! - Config file (lore.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! Later sources win over earlier ones.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Main application configuration.
///
/// This struct holds all global configuration options that affect
/// CLI behavior across commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory scanned for PDF documents during ingestion
    pub data_dir: PathBuf,

    /// Path of the SQLite file backing the vector index
    pub index_path: PathBuf,

    /// Name of the collection inside the index
    pub collection: String,

    /// Cohere embedding model identifier
    pub embed_model: String,

    /// Cohere generation model identifier
    pub generate_model: String,

    /// Cohere API key (from COHERE_TOKEN)
    pub api_key: Option<String>,

    /// Chunk window size, in characters
    pub chunk_size: usize,

    /// Characters of overlap between the first two chunks of a document
    pub chunk_overlap: usize,

    /// Number of nearest chunks retrieved per question
    pub top_k: usize,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    ingestion: Option<IngestionConfig>,
    index: Option<IndexConfig>,
    cohere: Option<CohereConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IngestionConfig {
    data_dir: Option<String>,
    chunk_size: Option<usize>,
    chunk_overlap: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexConfig {
    path: Option<String>,
    collection: Option<String>,
    top_k: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CohereConfig {
    embed_model: Option<String>,
    generate_model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            index_path: PathBuf::from("lore.db"),
            collection: "documents".to_string(),
            embed_model: "multilingual-22-12".to_string(),
            generate_model: "command-xlarge-nightly".to_string(),
            api_key: None,
            chunk_size: 1000,
            chunk_overlap: 100,
            top_k: 3,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file and environment variables.
    ///
    /// `config_file` is the `--config` flag; when absent, `LORE_CONFIG` and
    /// then `lore.yaml` in the working directory are tried.
    ///
    /// Environment variables:
    /// - `LORE_CONFIG`: Path to config file
    /// - `LORE_DATA_DIR`: Override source document directory
    /// - `LORE_INDEX_PATH`: Override index file path
    /// - `LORE_COLLECTION`: Override collection name
    /// - `COHERE_TOKEN`: Cohere API key
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load(config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        let config_path = config_file
            .or_else(|| std::env::var("LORE_CONFIG").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("lore.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override the YAML file
        if let Ok(data_dir) = std::env::var("LORE_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(index_path) = std::env::var("LORE_INDEX_PATH") {
            config.index_path = PathBuf::from(index_path);
        }

        if let Ok(collection) = std::env::var("LORE_COLLECTION") {
            config.collection = collection;
        }

        config.api_key = std::env::var("COHERE_TOKEN").ok();

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        tracing::debug!("Merging configuration from {:?}", path);

        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(ingestion) = config_file.ingestion {
            if let Some(data_dir) = ingestion.data_dir {
                result.data_dir = PathBuf::from(data_dir);
            }
            if let Some(chunk_size) = ingestion.chunk_size {
                result.chunk_size = chunk_size;
            }
            if let Some(chunk_overlap) = ingestion.chunk_overlap {
                result.chunk_overlap = chunk_overlap;
            }
        }

        if let Some(index) = config_file.index {
            if let Some(path) = index.path {
                result.index_path = PathBuf::from(path);
            }
            if let Some(collection) = index.collection {
                result.collection = collection;
            }
            if let Some(top_k) = index.top_k {
                result.top_k = top_k;
            }
        }

        if let Some(cohere) = config_file.cohere {
            if let Some(embed_model) = cohere.embed_model {
                result.embed_model = embed_model;
            }
            if let Some(generate_model) = cohere.generate_model {
                result.generate_model = generate_model;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// This method merges command-line flags with the loaded configuration,
    /// giving precedence to CLI flags over environment variables.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        data_dir: Option<PathBuf>,
        index_path: Option<PathBuf>,
        collection: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(data_dir) = data_dir {
            self.data_dir = data_dir;
        }

        if let Some(index_path) = index_path {
            self.index_path = index_path;
        }

        if let Some(collection) = collection {
            self.collection = collection;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate the chunking and retrieval settings.
    pub fn validate(&self) -> AppResult<()> {
        if self.chunk_size == 0 {
            return Err(AppError::Config(
                "chunk_size must be greater than zero".to_string(),
            ));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(AppError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        if self.top_k == 0 {
            return Err(AppError::Config(
                "top_k must be greater than zero".to_string(),
            ));
        }

        if self.collection.trim().is_empty() {
            return Err(AppError::Config(
                "collection name must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
