//! Command implementations for ci-sync
//!
//! This crate contains the three ci-sync commands (uploading variables,
//! removing an environment's variables, removing pipelines) and the batch
//! primitives they share.

/// Paginated listing, bulk mutation, summaries and the countdown
pub mod batch;

/// Command implementations module
pub mod commands;

/// Input document parsing
pub mod document;

#[cfg(test)]
pub mod test_helpers;

// Re-export all commands at the crate root for easier access
pub use commands::{remove_env_variables, remove_pipelines, set_variables};
