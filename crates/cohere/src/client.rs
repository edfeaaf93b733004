//! Client abstractions for the external text capabilities.
//!
//! The pipelines never talk to an HTTP API directly; they go through these
//! traits so that the orchestrators can be driven by test doubles.

use lore_core::AppResult;

/// Trait for the embedding capability.
///
/// Implementations turn one text into a fixed-length numeric vector. All
/// vectors stored in one collection must come from the same model; nothing
/// here enforces that.
#[async_trait::async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Embed a single text.
    ///
    /// Callers must not pass an empty string; empty chunks and blank
    /// questions are filtered out before this call. Any failure of the
    /// capability is reported as `AppError::Embedding`.
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>>;
}

/// Trait for the text generation capability.
#[async_trait::async_trait]
pub trait GenerationClient: Send + Sync {
    /// Complete a prompt, returning the generated text trimmed of leading
    /// and trailing whitespace.
    ///
    /// Any failure of the capability is reported as `AppError::Generation`.
    async fn generate(&self, prompt: &str) -> AppResult<String>;
}
