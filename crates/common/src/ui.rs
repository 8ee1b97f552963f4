//! User interface implementations

use std::sync::{Arc, Mutex};
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use ci_sync_runtime::deps::{MessageStyle, ProgressIndicator, UserInterface};

/// Production UI implementation using indicatif
pub struct RealUserInterface;

impl UserInterface for RealUserInterface {
    fn create_spinner(&self) -> Box<dyn ProgressIndicator> {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        Box::new(RealProgressIndicator { pb })
    }

    fn print(&self, message: &str) {
        println!("{message}");
    }

    fn print_styled(&self, message: &str, msg_style: MessageStyle) {
        let styled = match msg_style {
            MessageStyle::Bold => style(message).bold().to_string(),
            MessageStyle::Cyan => style(message).cyan().to_string(),
            MessageStyle::Green => style(message).green().to_string(),
            MessageStyle::Red => style(message).red().to_string(),
            MessageStyle::Yellow => style(message).yellow().to_string(),
            MessageStyle::Warning => style(message).yellow().bold().to_string(),
            MessageStyle::Error => style(message).red().bold().to_string(),
            MessageStyle::Success => style(message).green().bold().to_string(),
        };
        println!("{styled}");
    }
}

struct RealProgressIndicator {
    pb: ProgressBar,
}

impl ProgressIndicator for RealProgressIndicator {
    fn set_message(&self, message: &str) {
        self.pb.set_message(message.to_string());
    }

    fn finish_and_clear(&self) {
        self.pb.finish_and_clear();
    }

    fn enable_steady_tick(&self, duration: Duration) {
        self.pb.enable_steady_tick(duration);
    }
}

// Test implementations for mocking

/// Test UI implementation that captures output
#[derive(Default)]
pub struct TestUserInterface {
    output: Arc<Mutex<Vec<String>>>,
    styled_output: Arc<Mutex<Vec<(String, MessageStyle)>>>,
    progress: Arc<Mutex<Vec<String>>>,
}

impl TestUserInterface {
    /// Create an empty capturing UI
    pub fn new() -> Self {
        Self::default()
    }

    /// Every printed line, styled or not, in order
    pub fn get_output(&self) -> Vec<String> {
        lock(&self.output).clone()
    }

    /// Styled lines with their style, in order
    pub fn get_styled_output(&self) -> Vec<(String, MessageStyle)> {
        lock(&self.styled_output).clone()
    }

    /// Messages sent to any spinner created by this UI
    pub fn get_progress_messages(&self) -> Vec<String> {
        lock(&self.progress).clone()
    }

    /// Whether any printed line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        lock(&self.output).iter().any(|line| line.contains(needle))
    }
}

impl UserInterface for TestUserInterface {
    fn create_spinner(&self) -> Box<dyn ProgressIndicator> {
        Box::new(TestProgressIndicator {
            messages: Arc::clone(&self.progress),
        })
    }

    fn print(&self, message: &str) {
        lock(&self.output).push(message.to_string());
    }

    fn print_styled(&self, message: &str, style: MessageStyle) {
        // Add to both styled output and regular output for easier testing
        lock(&self.styled_output).push((message.to_string(), style));
        lock(&self.output).push(message.to_string());
    }
}

struct TestProgressIndicator {
    messages: Arc<Mutex<Vec<String>>>,
}

impl ProgressIndicator for TestProgressIndicator {
    fn set_message(&self, message: &str) {
        lock(&self.messages).push(message.to_string());
    }

    fn finish_and_clear(&self) {}

    fn enable_steady_tick(&self, _duration: Duration) {}
}

// A panicking test thread must not hide the output captured so far
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(test)]
#[path = "ui_tests.rs"]
mod tests;
