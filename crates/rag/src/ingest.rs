//! Offline ingestion pipeline: PDFs on disk to indexed chunks.

use lore_cohere::EmbeddingClient;
use lore_core::AppResult;
use std::path::Path;
use std::time::Instant;
use uuid::Uuid;

use crate::chunker::split_text;
use crate::loader::{discover_documents, document_name, DocumentLoader};
use crate::store::IndexStore;
use crate::types::{Document, IndexRecord, IngestReport, RecordMetadata};

/// Chunking settings for one ingestion run.
#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

/// A chunk that survived embedding, waiting for the batch write.
struct StagedChunk {
    document: String,
    embedding: Vec<f32>,
    metadata: RecordMetadata,
}

/// Ingest every PDF directly under `data_dir` into `collection`.
///
/// Documents are processed one at a time. A document whose extraction
/// fails or yields no text is skipped; a chunk whose embedding fails is
/// skipped; either way the run continues and the report counts the
/// losses. All surviving chunks are written in a single transaction at
/// the end, each under a fresh unique id, so re-ingesting the same
/// directory appends a second copy of everything.
pub async fn ingest_directory(
    store: &mut IndexStore,
    loader: &dyn DocumentLoader,
    embedder: &dyn EmbeddingClient,
    data_dir: &Path,
    collection: &str,
    options: IngestOptions,
) -> AppResult<IngestReport> {
    let started = Instant::now();

    let paths = discover_documents(data_dir)?;
    let total = paths.len();
    let mut report = IngestReport {
        documents_found: total,
        ..Default::default()
    };

    if total == 0 {
        tracing::warn!("No PDF documents found in {:?}", data_dir);
        report.elapsed_secs = started.elapsed().as_secs_f64();
        return Ok(report);
    }

    let collection = store.ensure_collection(collection)?;
    let mut pending: Vec<StagedChunk> = Vec::new();

    for (i, path) in paths.iter().enumerate() {
        let name = document_name(path)?;
        tracing::info!("{}/{}: processing {}", i + 1, total, name);

        let document = match loader.load(path) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", name, e);
                report.documents_skipped += 1;
                continue;
            }
        };

        if document.raw_text.is_empty() {
            tracing::warn!("Skipping {}: extracted no text", document.name);
            report.documents_skipped += 1;
            continue;
        }

        report.chunks_skipped += embed_document(embedder, &document, options, &mut pending).await;
    }

    if pending.is_empty() {
        tracing::warn!("No chunks survived embedding; nothing to write");
        report.elapsed_secs = started.elapsed().as_secs_f64();
        return Ok(report);
    }

    let records: Vec<IndexRecord> = pending
        .into_iter()
        .map(|staged| IndexRecord {
            id: Uuid::new_v4().to_string(),
            embedding: staged.embedding,
            document: staged.document,
            metadata: staged.metadata,
        })
        .collect();

    store.write(collection, &records)?;
    report.chunks_written = records.len();
    report.elapsed_secs = started.elapsed().as_secs_f64();

    tracing::info!(
        "Ingested {} chunks from {} documents in {:.2}s",
        report.chunks_written,
        report.documents_found - report.documents_skipped,
        report.elapsed_secs
    );

    Ok(report)
}

/// Chunk and embed one document, staging the survivors.
///
/// Partition numbers follow chunk order within the document; a skipped
/// chunk leaves a hole rather than renumbering its successors. Returns
/// the number of chunks skipped.
async fn embed_document(
    embedder: &dyn EmbeddingClient,
    document: &Document,
    options: IngestOptions,
    pending: &mut Vec<StagedChunk>,
) -> usize {
    let chunks = split_text(&document.raw_text, options.chunk_size, options.chunk_overlap);
    let mut skipped = 0;

    for (partition, chunk) in chunks.into_iter().enumerate() {
        if chunk.is_empty() {
            skipped += 1;
            continue;
        }

        match embedder.embed(&chunk).await {
            Ok(embedding) => pending.push(StagedChunk {
                document: chunk,
                embedding,
                metadata: RecordMetadata {
                    source: document.name.clone(),
                    partition,
                },
            }),
            Err(e) => {
                tracing::warn!("Skipping chunk {} of {}: {}", partition, document.name, e);
                skipped += 1;
            }
        }
    }

    skipped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StubEmbedder, StubLoader};
    use std::collections::HashSet;
    use std::fs;
    use tempfile::{tempdir, NamedTempFile};

    fn touch_pdf(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"placeholder").unwrap();
    }

    #[tokio::test]
    async fn test_ingest_chunks_embeds_and_writes() {
        let data_dir = tempdir().unwrap();
        touch_pdf(data_dir.path(), "story.pdf");

        let text: String = ('a'..='z').cycle().take(2500).collect();
        let loader = StubLoader::with_documents(&[("story.pdf", text.as_str())]);
        let embedder = StubEmbedder::new();

        let index_file = NamedTempFile::new().unwrap();
        let mut store = IndexStore::open(index_file.path()).unwrap();

        let report = ingest_directory(
            &mut store,
            &loader,
            &embedder,
            data_dir.path(),
            "documents",
            IngestOptions {
                chunk_size: 1000,
                chunk_overlap: 100,
            },
        )
        .await
        .unwrap();

        assert_eq!(report.documents_found, 1);
        assert_eq!(report.documents_skipped, 0);
        assert_eq!(report.chunks_written, 3);
        assert_eq!(report.chunks_skipped, 0);

        let collection = store.ensure_collection("documents").unwrap();
        let matches = store
            .query(collection, &StubEmbedder::vector_for("anything"), 10)
            .unwrap();
        assert_eq!(matches.len(), 3);
        assert!(matches.iter().all(|m| m.metadata.source == "story.pdf"));

        let mut partitions: Vec<usize> = matches.iter().map(|m| m.metadata.partition).collect();
        partitions.sort();
        assert_eq!(partitions, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_failed_embedding_skips_only_that_chunk() {
        let data_dir = tempdir().unwrap();
        touch_pdf(data_dir.path(), "doc.pdf");

        // size 4 / overlap 0 splits this into five known chunks
        let loader = StubLoader::with_documents(&[("doc.pdf", "aaaabbbbccccddddeeee")]);
        let embedder = StubEmbedder::failing_on(&["cccc"]);

        let index_file = NamedTempFile::new().unwrap();
        let mut store = IndexStore::open(index_file.path()).unwrap();

        let report = ingest_directory(
            &mut store,
            &loader,
            &embedder,
            data_dir.path(),
            "documents",
            IngestOptions {
                chunk_size: 4,
                chunk_overlap: 0,
            },
        )
        .await
        .unwrap();

        assert_eq!(report.chunks_written, 4);
        assert_eq!(report.chunks_skipped, 1);

        // The skipped chunk leaves a hole in the partition sequence
        let collection = store.ensure_collection("documents").unwrap();
        let matches = store
            .query(collection, &StubEmbedder::vector_for("aaaa"), 10)
            .unwrap();
        let mut partitions: Vec<usize> = matches.iter().map(|m| m.metadata.partition).collect();
        partitions.sort();
        assert_eq!(partitions, vec![0, 1, 3, 4]);
        assert!(matches.iter().all(|m| m.document != "cccc"));
    }

    #[tokio::test]
    async fn test_unreadable_document_is_skipped() {
        let data_dir = tempdir().unwrap();
        touch_pdf(data_dir.path(), "good.pdf");
        touch_pdf(data_dir.path(), "bad.pdf");

        // The loader only knows about good.pdf
        let loader = StubLoader::with_documents(&[("good.pdf", "short text")]);
        let embedder = StubEmbedder::new();

        let index_file = NamedTempFile::new().unwrap();
        let mut store = IndexStore::open(index_file.path()).unwrap();

        let report = ingest_directory(
            &mut store,
            &loader,
            &embedder,
            data_dir.path(),
            "documents",
            IngestOptions {
                chunk_size: 1000,
                chunk_overlap: 100,
            },
        )
        .await
        .unwrap();

        assert_eq!(report.documents_found, 2);
        assert_eq!(report.documents_skipped, 1);
        assert_eq!(report.chunks_written, 1);

        let collection = store.ensure_collection("documents").unwrap();
        let matches = store
            .query(collection, &StubEmbedder::vector_for("short text"), 10)
            .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].metadata.source, "good.pdf");
    }

    #[tokio::test]
    async fn test_document_with_no_text_is_skipped() {
        let data_dir = tempdir().unwrap();
        touch_pdf(data_dir.path(), "blank.pdf");

        let loader = StubLoader::with_documents(&[("blank.pdf", "")]);
        let embedder = StubEmbedder::new();

        let index_file = NamedTempFile::new().unwrap();
        let mut store = IndexStore::open(index_file.path()).unwrap();

        let report = ingest_directory(
            &mut store,
            &loader,
            &embedder,
            data_dir.path(),
            "documents",
            IngestOptions {
                chunk_size: 1000,
                chunk_overlap: 100,
            },
        )
        .await
        .unwrap();

        assert_eq!(report.documents_skipped, 1);
        assert!(report.is_empty());
        assert!(embedder.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_directory_writes_nothing() {
        let data_dir = tempdir().unwrap();

        let loader = StubLoader::with_documents(&[]);
        let embedder = StubEmbedder::new();

        let index_file = NamedTempFile::new().unwrap();
        let mut store = IndexStore::open(index_file.path()).unwrap();

        let report = ingest_directory(
            &mut store,
            &loader,
            &embedder,
            data_dir.path(),
            "documents",
            IngestOptions {
                chunk_size: 1000,
                chunk_overlap: 100,
            },
        )
        .await
        .unwrap();

        assert_eq!(report.documents_found, 0);
        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn test_missing_directory_is_config_error() {
        let loader = StubLoader::with_documents(&[]);
        let embedder = StubEmbedder::new();

        let index_file = NamedTempFile::new().unwrap();
        let mut store = IndexStore::open(index_file.path()).unwrap();

        let result = ingest_directory(
            &mut store,
            &loader,
            &embedder,
            Path::new("/nonexistent/lore-data"),
            "documents",
            IngestOptions {
                chunk_size: 1000,
                chunk_overlap: 100,
            },
        )
        .await;

        assert!(matches!(result, Err(lore_core::AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_reingesting_appends_a_second_copy() {
        let data_dir = tempdir().unwrap();
        touch_pdf(data_dir.path(), "story.pdf");

        let text: String = ('a'..='z').cycle().take(2500).collect();
        let loader = StubLoader::with_documents(&[("story.pdf", text.as_str())]);
        let embedder = StubEmbedder::new();

        let index_file = NamedTempFile::new().unwrap();
        let mut store = IndexStore::open(index_file.path()).unwrap();
        let options = IngestOptions {
            chunk_size: 1000,
            chunk_overlap: 100,
        };

        for _ in 0..2 {
            ingest_directory(
                &mut store,
                &loader,
                &embedder,
                data_dir.path(),
                "documents",
                options,
            )
            .await
            .unwrap();
        }

        let stats = store.stats("documents").unwrap().unwrap();
        assert_eq!(stats.records, 6);
    }

    #[tokio::test]
    async fn test_identical_chunks_get_distinct_ids() {
        let data_dir = tempdir().unwrap();
        touch_pdf(data_dir.path(), "dup.pdf");

        // Two chunks with identical text
        let loader = StubLoader::with_documents(&[("dup.pdf", "samesame")]);
        let embedder = StubEmbedder::new();

        let index_file = NamedTempFile::new().unwrap();
        let mut store = IndexStore::open(index_file.path()).unwrap();

        ingest_directory(
            &mut store,
            &loader,
            &embedder,
            data_dir.path(),
            "documents",
            IngestOptions {
                chunk_size: 4,
                chunk_overlap: 0,
            },
        )
        .await
        .unwrap();

        let mut stmt = store.conn.prepare("SELECT id FROM records").unwrap();
        let ids: HashSet<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .map(|id| id.unwrap())
            .collect();
        assert_eq!(ids.len(), 2);
    }
}
