//! Retrieval pipeline for the lore CLI.
//!
//! Everything between a PDF on disk and the answer handed back to the
//! user lives here:
//! - [`loader`]: PDF discovery and text extraction
//! - [`chunker`]: fixed-window text splitting
//! - [`store`]: the persistent SQLite vector index
//! - [`evidence`]: formatting retrieved chunks for the prompt
//! - [`ingest`]: the offline ingestion pipeline
//! - [`query`]: the online question-answering pipeline

pub mod chunker;
pub mod evidence;
pub mod ingest;
pub mod loader;
pub mod query;
pub mod store;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export commonly used items
pub use ingest::{ingest_directory, IngestOptions};
pub use loader::{discover_documents, DocumentLoader, PdfLoader};
pub use query::answer_question;
pub use store::{CollectionId, IndexStore};
pub use types::{
    CollectionStats, Document, IndexRecord, IngestReport, RecordMetadata, SearchMatch,
};
