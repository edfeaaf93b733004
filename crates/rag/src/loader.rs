//! PDF discovery and text extraction.

use lore_core::{AppError, AppResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::types::Document;

/// Turns a path on disk into an extracted [`Document`].
///
/// Extraction is an external capability like embedding and generation, so
/// the pipelines take it as a trait object rather than calling a library
/// directly.
pub trait DocumentLoader: Send + Sync {
    /// Extract the text of one file.
    fn load(&self, path: &Path) -> AppResult<Document>;
}

/// [`DocumentLoader`] backed by the `pdf-extract` crate.
pub struct PdfLoader;

impl DocumentLoader for PdfLoader {
    fn load(&self, path: &Path) -> AppResult<Document> {
        let name = document_name(path)?;

        let raw_text = pdf_extract::extract_text(path)
            .map_err(|e| AppError::Extraction(format!("Failed to extract {}: {}", name, e)))?;

        Ok(Document { name, raw_text })
    }
}

/// List the PDF files directly inside `dir`, sorted by filename.
///
/// Only regular files with a `.pdf` extension (ASCII case-insensitive)
/// count; subdirectories are not descended into. A missing directory is a
/// configuration error.
pub fn discover_documents(dir: &Path) -> AppResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(AppError::Config(format!(
            "Source directory does not exist: {:?}",
            dir
        )));
    }

    let paths = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_pdf(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    Ok(paths)
}

/// Filename (with extension) used as the `source` of the file's chunks.
pub fn document_name(path: &Path) -> AppResult<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| AppError::Extraction(format!("Not a file path: {:?}", path)))
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}
