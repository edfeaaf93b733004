//! Data types shared by the ingestion and query pipelines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A source file reduced to its extracted text.
#[derive(Debug, Clone)]
pub struct Document {
    /// Filename including extension; becomes the `source` of every chunk
    pub name: String,
    /// Full extracted text, empty when extraction produced nothing
    pub raw_text: String,
}

/// Metadata persisted with every index record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// Filename the chunk came from
    pub source: String,
    /// 0-based position of the chunk within its document
    pub partition: usize,
}

/// The persisted unit of the vector index.
///
/// Records are created during ingestion and never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Opaque unique id
    pub id: String,
    /// Embedding vector for `document`
    pub embedding: Vec<f32>,
    /// The chunk text itself
    pub document: String,
    /// Source and partition of the chunk
    pub metadata: RecordMetadata,
}

/// One retrieved record with its distance to the query vector.
#[derive(Debug, Clone, Serialize)]
pub struct SearchMatch {
    /// The chunk text
    pub document: String,
    /// Source and partition of the chunk
    pub metadata: RecordMetadata,
    /// Squared Euclidean distance to the query vector, smaller is nearer
    pub distance: f32,
}

/// Counters reported after one ingestion run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    /// PDF files found in the source directory
    pub documents_found: usize,
    /// Documents skipped because extraction failed or produced no text
    pub documents_skipped: usize,
    /// Records written to the index
    pub chunks_written: usize,
    /// Chunks dropped because embedding failed
    pub chunks_skipped: usize,
    /// Wall-clock duration of the run in seconds
    pub elapsed_secs: f64,
}

impl IngestReport {
    /// True when the run wrote nothing.
    pub fn is_empty(&self) -> bool {
        self.chunks_written == 0
    }
}

/// Statistics for one collection, as reported by `lore stats`.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionStats {
    /// Collection name
    pub collection: String,
    /// Number of records
    pub records: u64,
    /// When the collection was first created
    pub created_at: Option<DateTime<Utc>>,
}
