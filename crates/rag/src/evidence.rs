//! Formatting retrieved chunks into the prompt's evidence block.

use crate::types::SearchMatch;

/// Render retrieval matches as the evidence block of a prompt.
///
/// Each match becomes one line of the exact form `[{source}]: {text}`,
/// preserving nearest-first order. No matches render to an empty string.
pub fn format_evidence(matches: &[SearchMatch]) -> String {
    let lines: Vec<String> = matches
        .iter()
        .map(|m| format!("[{}]: {}", m.metadata.source, m.document))
        .collect();

    lines.join("\n")
}
