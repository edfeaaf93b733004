//! Cohere integration crate for the lore CLI.
//!
//! This crate provides the two external text capabilities the pipelines
//! depend on, each behind a trait so orchestrators can be tested without
//! the network:
//! - **Embedding**: text to fixed-length vector (`/v1/embed`)
//! - **Generation**: prompt to free text (`/v1/generate`)
//!
//! # Example
//! ```no_run
//! use lore_cohere::{CohereClient, EmbeddingClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = CohereClient::new(
//!     std::env::var("COHERE_TOKEN").ok(),
//!     "multilingual-22-12",
//!     "command-xlarge-nightly",
//! )?;
//! let vector = client.embed("What is a lore index?").await?;
//! println!("{} dimensions", vector.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;

// Re-export main types
pub use api::CohereClient;
pub use client::{EmbeddingClient, GenerationClient};
