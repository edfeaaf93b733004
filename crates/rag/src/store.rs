//! SQLite-backed persistent vector index.
//!
//! One database file holds any number of named collections. Records are
//! append-only; embeddings are stored as little-endian f32 blobs and
//! ranked in process by squared Euclidean distance.

use chrono::{DateTime, Utc};
use lore_core::{AppError, AppResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::types::{CollectionStats, IndexRecord, RecordMetadata, SearchMatch};

/// Handle to one collection inside the index database.
///
/// Only [`IndexStore::ensure_collection`] mints these, so a held id always
/// refers to an existing collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionId(i64);

/// Persistent vector index over a single SQLite database file.
pub struct IndexStore {
    pub(crate) conn: Connection,
}

impl IndexStore {
    /// Open the index database at `path`, creating file and schema if
    /// needed.
    pub fn open(path: &Path) -> AppResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::IndexWrite(format!("Failed to create index directory: {}", e))
                })?;
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| AppError::IndexWrite(format!("Failed to open SQLite index: {}", e)))?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS collections (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS records (
                id TEXT PRIMARY KEY,
                collection_id INTEGER NOT NULL,
                embedding BLOB NOT NULL,
                document TEXT NOT NULL,
                source TEXT NOT NULL,
                partition_index INTEGER NOT NULL,
                FOREIGN KEY (collection_id) REFERENCES collections(id)
            );

            CREATE INDEX IF NOT EXISTS idx_records_collection
                ON records(collection_id);
            "#,
        )
        .map_err(|e| AppError::IndexWrite(format!("Failed to create tables: {}", e)))?;

        tracing::debug!("Opened SQLite index at {:?}", path);
        Ok(Self { conn })
    }

    /// Return the collection named `name`, creating it if absent.
    ///
    /// Calling this any number of times yields the same id; a name is
    /// never duplicated.
    pub fn ensure_collection(&self, name: &str) -> AppResult<CollectionId> {
        self.conn
            .execute(
                "INSERT OR IGNORE INTO collections (name, created_at) VALUES (?1, ?2)",
                params![name, Utc::now().to_rfc3339()],
            )
            .map_err(|e| {
                AppError::IndexWrite(format!("Failed to create collection '{}': {}", name, e))
            })?;

        let id: i64 = self
            .conn
            .query_row(
                "SELECT id FROM collections WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .map_err(|e| {
                AppError::IndexWrite(format!("Failed to look up collection '{}': {}", name, e))
            })?;

        Ok(CollectionId(id))
    }

    /// Append a batch of records in one transaction.
    ///
    /// Either every record is confirmed or none is; on failure the error
    /// states how many records were left unconfirmed.
    pub fn write(&mut self, collection: CollectionId, records: &[IndexRecord]) -> AppResult<()> {
        let total = records.len();

        let tx = self.conn.transaction().map_err(|e| {
            AppError::IndexWrite(format!("Failed to begin write of {} records: {}", total, e))
        })?;

        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO records
                         (id, collection_id, embedding, document, source, partition_index)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )
                .map_err(|e| AppError::IndexWrite(format!("Failed to prepare insert: {}", e)))?;

            for record in records {
                stmt.execute(params![
                    record.id,
                    collection.0,
                    embedding_to_bytes(&record.embedding),
                    record.document,
                    record.metadata.source,
                    record.metadata.partition as i64,
                ])
                .map_err(|e| {
                    AppError::IndexWrite(format!(
                        "Failed to insert record {}; 0 of {} records confirmed: {}",
                        record.id, total, e
                    ))
                })?;
            }
        }

        tx.commit().map_err(|e| {
            AppError::IndexWrite(format!(
                "Commit failed; 0 of {} records confirmed: {}",
                total, e
            ))
        })?;

        tracing::debug!("Wrote {} records", total);
        Ok(())
    }

    /// Return up to `k` records nearest to `vector`, nearest first.
    ///
    /// Every record in the collection is scanned and ranked in process.
    /// An empty collection yields an empty result, never an error.
    pub fn query(
        &self,
        collection: CollectionId,
        vector: &[f32],
        k: usize,
    ) -> AppResult<Vec<SearchMatch>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT embedding, document, source, partition_index
                 FROM records WHERE collection_id = ?1",
            )
            .map_err(|e| AppError::IndexQuery(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map(params![collection.0], |row| {
                Ok((
                    row.get::<_, Vec<u8>>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })
            .map_err(|e| AppError::IndexQuery(format!("Failed to query records: {}", e)))?;

        let mut matches = Vec::new();
        for row in rows {
            let (embedding_bytes, document, source, partition) =
                row.map_err(|e| AppError::IndexQuery(format!("Failed to read record: {}", e)))?;
            let embedding = bytes_to_embedding(&embedding_bytes)?;

            matches.push(SearchMatch {
                document,
                metadata: RecordMetadata {
                    source,
                    partition: partition as usize,
                },
                distance: squared_distance(vector, &embedding),
            });
        }

        // Nearest first
        matches.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matches.truncate(k);

        tracing::debug!("Retrieved {} matches (requested top-{})", matches.len(), k);
        Ok(matches)
    }

    /// Statistics for the collection named `name`, or `None` if it was
    /// never created.
    pub fn stats(&self, name: &str) -> AppResult<Option<CollectionStats>> {
        let row: Option<(i64, String)> = self
            .conn
            .query_row(
                "SELECT id, created_at FROM collections WHERE name = ?1",
                params![name],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(|e| {
                AppError::IndexQuery(format!("Failed to look up collection '{}': {}", name, e))
            })?;

        let (id, created_at) = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        let records: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM records WHERE collection_id = ?1",
                params![id],
                |row| row.get(0),
            )
            .map_err(|e| AppError::IndexQuery(format!("Failed to count records: {}", e)))?;

        Ok(Some(CollectionStats {
            collection: name.to_string(),
            records: records as u64,
            created_at: DateTime::parse_from_rfc3339(&created_at)
                .map(|t| t.with_timezone(&Utc))
                .ok(),
        }))
    }
}

/// Convert an embedding vector to bytes for storage.
fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(embedding.len() * 4);
    for &value in embedding {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Convert stored bytes back to an embedding vector.
fn bytes_to_embedding(bytes: &[u8]) -> AppResult<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(AppError::IndexQuery(
            "Invalid embedding bytes length".to_string(),
        ));
    }

    let mut embedding = Vec::with_capacity(bytes.len() / 4);
    for chunk in bytes.chunks_exact(4) {
        embedding.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }

    Ok(embedding)
}

/// Squared Euclidean distance between two vectors.
///
/// Vectors of different lengths are compared over their shared prefix.
fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
