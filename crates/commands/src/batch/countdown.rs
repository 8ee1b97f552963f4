//! Cancellable countdown shown before destructive batches

use std::time::Duration;

use tracing::info;

use ci_sync_runtime::deps::{AsyncRuntime, MessageStyle, UserInterface, WaitOutcome};

/// How the countdown ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownOutcome {
    /// The countdown ran out; the batch may start
    Proceed,
    /// The operator interrupted the countdown
    Cancelled,
}

/// A one-second-tick countdown the operator can interrupt with Ctrl-C
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    seconds: u64,
}

impl Countdown {
    /// Create a countdown of `seconds`; zero proceeds immediately
    pub const fn new(seconds: u64) -> Self {
        Self { seconds }
    }

    /// Warn about `action` and count down, one tick per second
    pub async fn run(
        &self,
        action: &str,
        ui: &dyn UserInterface,
        runtime: &dyn AsyncRuntime,
    ) -> CountdownOutcome {
        if self.seconds == 0 {
            return CountdownOutcome::Proceed;
        }

        ui.print_styled(
            &format!("⚠️  {action}. Press Ctrl-C within {}s to cancel.", self.seconds),
            MessageStyle::Warning,
        );

        let spinner = ui.create_spinner();
        spinner.enable_steady_tick(Duration::from_millis(100));

        for remaining in (1..=self.seconds).rev() {
            spinner.set_message(&format!("Starting in {remaining}s..."));
            if runtime.sleep_unless_interrupted(Duration::from_secs(1)).await
                == WaitOutcome::Interrupted
            {
                spinner.finish_and_clear();
                info!("countdown interrupted by operator");
                ui.print_styled("Cancelled. Nothing was changed.", MessageStyle::Yellow);
                return CountdownOutcome::Cancelled;
            }
        }

        spinner.finish_and_clear();
        CountdownOutcome::Proceed
    }
}
