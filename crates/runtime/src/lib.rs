//! Core functionality for ci-sync
//!
//! This crate contains the foundational types used across the ci-sync
//! commands: settings resolution, the GitLab API client, its error type, and
//! the dependency injection interfaces the commands are written against.

/// API client module for the GitLab REST API
pub mod api_client;
/// Configuration constants and settings resolution
pub mod config;
/// Dependency injection traits and implementations
pub mod deps;
/// Error types for API calls
pub mod error;

// Re-export commonly used types at the crate root
pub use api_client::{GitLabClient, Page, Pipeline, Variable};
pub use config::{ConfigError, Operation, RawSettings, Settings};
pub use deps::{
    AsyncRuntime, CiApiClient, FileSystem, MessageStyle, ProgressIndicator, RealAsyncRuntime,
    RealFileSystem, UserInterface, WaitOutcome,
};
pub use error::{ApiError, ApiErrorKind};
