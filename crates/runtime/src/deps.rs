//! Dependency injection traits for testability
//!
//! This module provides trait abstractions for all external dependencies,
//! allowing for easy mocking and testing.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

use crate::api_client::{GitLabClient, Page, Pipeline, Variable};
use crate::error::ApiError;

/// File system operations
pub trait FileSystem: Send + Sync {
    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Read a file to string
    fn read_to_string(&self, path: &Path) -> Result<String>;
}

/// CI/CD API operations for a single project
#[async_trait]
pub trait CiApiClient: Send + Sync {
    /// Fetch one page of project variables
    async fn list_variables(&self, page: u32, per_page: u32) -> Result<Page<Variable>, ApiError>;

    /// Update a variable within an environment scope
    async fn update_variable(
        &self,
        key: &str,
        value: &str,
        environment_scope: &str,
    ) -> Result<(), ApiError>;

    /// Create a variable within an environment scope
    async fn create_variable(
        &self,
        key: &str,
        value: &str,
        environment_scope: &str,
    ) -> Result<(), ApiError>;

    /// Delete a variable within an environment scope
    async fn delete_variable(&self, key: &str, environment_scope: &str) -> Result<(), ApiError>;

    /// Fetch one page of project pipelines
    async fn list_pipelines(&self, page: u32, per_page: u32) -> Result<Page<Pipeline>, ApiError>;

    /// Delete a pipeline
    async fn delete_pipeline(&self, pipeline_id: u64) -> Result<(), ApiError>;
}

/// User interface operations
pub trait UserInterface: Send + Sync {
    /// Create a spinner progress indicator
    fn create_spinner(&self) -> Box<dyn ProgressIndicator>;

    /// Print a message
    fn print(&self, message: &str);

    /// Print a styled message
    fn print_styled(&self, message: &str, style: MessageStyle);
}

/// Progress indicator trait
pub trait ProgressIndicator: Send + Sync {
    /// Set the message
    fn set_message(&self, message: &str);

    /// Finish and clear the progress
    fn finish_and_clear(&self);

    /// Enable steady tick
    fn enable_steady_tick(&self, duration: Duration);
}

/// Message styling options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    /// Bold text style
    Bold,
    /// Cyan colored text
    Cyan,
    /// Green colored text
    Green,
    /// Red colored text
    Red,
    /// Yellow colored text
    Yellow,
    /// Warning style (typically yellow)
    Warning,
    /// Error style (typically red)
    Error,
    /// Success style (typically green)
    Success,
}

/// How a timed wait ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The full duration elapsed
    Elapsed,
    /// The operator interrupted the process
    Interrupted,
}

/// Async runtime operations
#[async_trait]
pub trait AsyncRuntime: Send + Sync {
    /// Sleep for a duration
    async fn sleep(&self, duration: Duration);

    /// Sleep for a duration unless the operator interrupts first
    async fn sleep_unless_interrupted(&self, duration: Duration) -> WaitOutcome;

    /// From now on, end the process with a failure status on Ctrl-C
    fn exit_on_interrupt(&self, message: &str);
}

// Production implementations

/// Production file system implementation
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
    }
}

#[async_trait]
impl CiApiClient for GitLabClient {
    async fn list_variables(&self, page: u32, per_page: u32) -> Result<Page<Variable>, ApiError> {
        Self::list_variables(self, page, per_page).await
    }

    async fn update_variable(
        &self,
        key: &str,
        value: &str,
        environment_scope: &str,
    ) -> Result<(), ApiError> {
        Self::update_variable(self, key, value, environment_scope).await
    }

    async fn create_variable(
        &self,
        key: &str,
        value: &str,
        environment_scope: &str,
    ) -> Result<(), ApiError> {
        Self::create_variable(self, key, value, environment_scope).await
    }

    async fn delete_variable(&self, key: &str, environment_scope: &str) -> Result<(), ApiError> {
        Self::delete_variable(self, key, environment_scope).await
    }

    async fn list_pipelines(&self, page: u32, per_page: u32) -> Result<Page<Pipeline>, ApiError> {
        Self::list_pipelines(self, page, per_page).await
    }

    async fn delete_pipeline(&self, pipeline_id: u64) -> Result<(), ApiError> {
        Self::delete_pipeline(self, pipeline_id).await
    }
}

/// Production async runtime
pub struct RealAsyncRuntime;

#[async_trait]
impl AsyncRuntime for RealAsyncRuntime {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    async fn sleep_unless_interrupted(&self, duration: Duration) -> WaitOutcome {
        tokio::select! {
            () = tokio::time::sleep(duration) => WaitOutcome::Elapsed,
            signal = tokio::signal::ctrl_c() => match signal {
                Ok(()) => WaitOutcome::Interrupted,
                // No signal handler available; let the countdown run out
                Err(_) => {
                    tokio::time::sleep(duration).await;
                    WaitOutcome::Elapsed
                }
            },
        }
    }

    // Listening for Ctrl-C replaces the default SIGINT handler for the rest
    // of the process, so a later interrupt has to be handled explicitly.
    fn exit_on_interrupt(&self, message: &str) {
        let message = message.to_string();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted by operator");
                eprintln!("{message}");
                std::process::exit(1);
            }
        });
    }
}
