//! Command handlers for the lore CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod chat;
pub mod ingest;
pub mod stats;

// Re-export command types for convenience
pub use chat::ChatCommand;
pub use ingest::IngestCommand;
pub use stats::StatsCommand;
