//! Prompt assembly for the lore CLI.
//!
//! This crate owns the one template the query pipeline sends to the
//! generation capability and the function that fills it in.

pub mod builder;

// Re-export main entry point
pub use builder::build_prompt;
