//! Online query pipeline: question to grounded answer.

use lore_cohere::{EmbeddingClient, GenerationClient};
use lore_core::AppResult;

use crate::evidence::format_evidence;
use crate::store::{CollectionId, IndexStore};

/// Answer one question against a collection.
///
/// Embeds the question, retrieves the `top_k` nearest chunks, renders
/// them into the evidence block, builds the prompt, and hands it to the
/// generation capability. Each call is a stateless turn; no conversation
/// history is carried. A failure surfaces as the error of the step that
/// failed and nothing later runs.
pub async fn answer_question(
    store: &IndexStore,
    embedder: &dyn EmbeddingClient,
    generator: &dyn GenerationClient,
    collection: CollectionId,
    question: &str,
    top_k: usize,
) -> AppResult<String> {
    let query_embedding = embedder.embed(question).await?;

    let matches = store.query(collection, &query_embedding, top_k)?;
    tracing::debug!("Retrieved {} matches for question", matches.len());

    let evidence = format_evidence(&matches);
    let prompt = lore_prompt::build_prompt(&evidence, question)?;

    generator.generate(&prompt).await
}
