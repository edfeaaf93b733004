//! Chat command handler.
//!
//! Interactive question-answering loop over the indexed documents.

use clap::Args;
use lore_cohere::CohereClient;
use lore_core::{config::AppConfig, AppResult};
use lore_rag::{answer_question, IndexStore};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Interactive question-answering session
#[derive(Args, Debug)]
pub struct ChatCommand {}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Starting chat session over {:?}", config.index_path);

        let store = IndexStore::open(&config.index_path)?;
        let collection = store.ensure_collection(&config.collection)?;

        let client = CohereClient::new(
            config.api_key.clone(),
            config.embed_model.clone(),
            config.generate_model.clone(),
        )?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print!("What is your question? ");
            std::io::stdout().flush()?;

            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                // EOF ends the session like "exit"
                Ok(None) => break,
                Err(e) => return Err(e.into()),
            };

            let question = line.trim();
            if question.is_empty() {
                continue;
            }
            if question.eq_ignore_ascii_case("exit") {
                break;
            }

            // Each turn is stateless; a failed turn is reported and the
            // session keeps going.
            match answer_question(
                &store,
                &client,
                &client,
                collection,
                question,
                config.top_k,
            )
            .await
            {
                Ok(answer) => {
                    println!("{}", answer);
                    println!();
                }
                Err(e) => {
                    tracing::error!("Turn failed: {}", e);
                    println!("Error: {}", e);
                    println!();
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }
}
