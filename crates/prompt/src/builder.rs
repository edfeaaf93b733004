//! Prompt builder for the generation step.
//!
//! The prompt has a fixed shape: the evidence block rendered into a
//! template, followed by the user's question and an answer cue.

use handlebars::Handlebars;
use lore_core::{AppError, AppResult};
use serde_json::json;

/// Template for the evidence section of the prompt. The single
/// `{{evidence}}` placeholder receives the formatted retrieval results.
const EVIDENCE_TEMPLATE: &str =
    "The following documents are relevant to your question:\n{{evidence}}\n\n";

/// Build the full generation prompt from an evidence block and a question.
///
/// The evidence is substituted into the template verbatim, and the question
/// is appended verbatim; neither is escaped or delimited.
///
/// # Example
/// ```
/// use lore_prompt::build_prompt;
///
/// let prompt = build_prompt("[a.pdf]: some text", "What is lore?").unwrap();
/// assert!(prompt.ends_with("\nUser question: What is lore?\nAnswer:"));
/// ```
pub fn build_prompt(evidence: &str, question: &str) -> AppResult<String> {
    tracing::debug!("Building prompt ({} evidence chars)", evidence.chars().count());

    let filled = render_template(EVIDENCE_TEMPLATE, evidence)?;
    Ok(format!("{}\nUser question: {}\nAnswer:", filled, question))
}

/// Render the evidence template with Handlebars.
fn render_template(template: &str, evidence: &str) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("evidence", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("evidence", &json!({ "evidence": evidence }))
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_evidence_and_question() {
        let evidence = "[doc.pdf]: chunk one\n[doc.pdf]: chunk two";
        let prompt = build_prompt(evidence, "Where is the treasure?").unwrap();

        assert!(prompt.contains(evidence));
        assert!(prompt.ends_with("\nUser question: Where is the treasure?\nAnswer:"));
        assert_eq!(prompt.matches("\nUser question: ").count(), 1);
    }

    #[test]
    fn test_prompt_with_empty_evidence() {
        let prompt = build_prompt("", "Anything?").unwrap();
        assert_eq!(
            prompt,
            "The following documents are relevant to your question:\n\n\n\nUser question: Anything?\nAnswer:"
        );
    }

    #[test]
    fn test_evidence_is_not_reinterpreted() {
        // Braces arrive as data, so Handlebars must not expand them
        let evidence = "[weird.pdf]: use {{evidence}} carefully";
        let prompt = build_prompt(evidence, "q").unwrap();
        assert!(prompt.contains("use {{evidence}} carefully"));
    }

    #[test]
    fn test_question_is_not_escaped() {
        let prompt = build_prompt("e", "is <x> & \"y\" fine?").unwrap();
        assert!(prompt.contains("User question: is <x> & \"y\" fine?"));
    }
}
