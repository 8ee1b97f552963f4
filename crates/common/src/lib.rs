//! Shared utilities for the ci-sync commands

/// Terminal and capturing user interfaces
pub mod ui;

pub use ui::{RealUserInterface, TestUserInterface};
