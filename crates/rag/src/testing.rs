//! Test doubles for the external capabilities.

use async_trait::async_trait;
use lore_cohere::{EmbeddingClient, GenerationClient};
use lore_core::{AppError, AppResult};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use crate::loader::{document_name, DocumentLoader};
use crate::types::Document;

/// Embedding client that derives a deterministic vector from the text and
/// can be told to fail on specific inputs.
pub struct StubEmbedder {
    fail_on: Vec<String>,
    pub calls: Mutex<Vec<String>>,
}

impl StubEmbedder {
    pub fn new() -> Self {
        Self {
            fail_on: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(texts: &[&str]) -> Self {
        Self {
            fail_on: texts.iter().map(|t| t.to_string()).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Deterministic 4-dim vector: char count, first char, last char, 1.
    pub fn vector_for(text: &str) -> Vec<f32> {
        let first = text.chars().next().map(|c| c as u32).unwrap_or(0);
        let last = text.chars().last().map(|c| c as u32).unwrap_or(0);
        vec![text.chars().count() as f32, first as f32, last as f32, 1.0]
    }
}

#[async_trait]
impl EmbeddingClient for StubEmbedder {
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        self.calls.lock().unwrap().push(text.to_string());
        if self.fail_on.iter().any(|f| f == text) {
            return Err(AppError::Embedding("stubbed embedding failure".to_string()));
        }
        Ok(Self::vector_for(text))
    }
}

/// Generation client that records every prompt and returns a canned
/// answer, or fails.
pub struct StubGenerator {
    answer: String,
    fail: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            fail: false,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: String::new(),
            fail: true,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl GenerationClient for StubGenerator {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            return Err(AppError::Generation(
                "stubbed generation failure".to_string(),
            ));
        }
        Ok(self.answer.clone())
    }
}

/// Document loader that serves canned text by filename and fails for
/// anything it was not told about.
pub struct StubLoader {
    docs: HashMap<String, String>,
}

impl StubLoader {
    pub fn with_documents(docs: &[(&str, &str)]) -> Self {
        Self {
            docs: docs
                .iter()
                .map(|(name, text)| (name.to_string(), text.to_string()))
                .collect(),
        }
    }
}

impl DocumentLoader for StubLoader {
    fn load(&self, path: &Path) -> AppResult<Document> {
        let name = document_name(path)?;
        match self.docs.get(&name) {
            Some(text) => Ok(Document {
                name,
                raw_text: text.clone(),
            }),
            None => Err(AppError::Extraction(format!("cannot read {}", name))),
        }
    }
}
