//! Bulk mutation of remote items
//!
//! Two execution modes are provided:
//!
//! - [`settle_all`] dispatches every operation at once on the current task and
//!   waits for all of them to settle. Nothing is aborted when an item fails.
//! - [`run_rate_limited`] processes items one at a time in order, pausing after
//!   every call, and stops at the first failure.

use std::future::Future;
use std::time::Duration;

use futures::future::join_all;
use tracing::debug;

use ci_sync_runtime::deps::AsyncRuntime;
use ci_sync_runtime::error::ApiError;

/// The settled result of one item's operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome<T, R = ()> {
    /// The item the operation was applied to
    pub item: T,
    /// What the operation returned
    pub result: Result<R, ApiError>,
}

impl<T, R> ItemOutcome<T, R> {
    /// Whether the operation succeeded
    pub const fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Apply `op` to every item concurrently and collect each outcome.
///
/// Outcomes are returned in input order regardless of completion order. Every
/// operation runs to completion; a failure never cancels the others.
pub async fn settle_all<T, R, F, Fut>(items: Vec<T>, op: F) -> Vec<ItemOutcome<T, R>>
where
    T: Clone,
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<R, ApiError>>,
{
    debug!(count = items.len(), "dispatching operations");

    let pending = items.into_iter().map(|item| {
        let operation = op(item.clone());
        async move {
            ItemOutcome {
                item,
                result: operation.await,
            }
        }
    });

    join_all(pending).await
}

/// Result of a rate-limited sequential run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequentialReport<T> {
    /// Items whose operation was started
    pub attempted: usize,
    /// Items whose operation succeeded
    pub succeeded: usize,
    /// Items never started because an earlier one failed
    pub not_attempted: usize,
    /// The item that stopped the run, with its error
    pub failure: Option<(T, ApiError)>,
}

/// Apply `op` to each item in order, one at a time.
///
/// After every call, successful or not, the runtime sleeps for `delay`. The
/// first failure stops the run; later items are counted as not attempted.
pub async fn run_rate_limited<T, F, Fut>(
    items: Vec<T>,
    delay: Duration,
    runtime: &dyn AsyncRuntime,
    mut op: F,
) -> SequentialReport<T>
where
    T: Clone,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<(), ApiError>>,
{
    let total = items.len();
    let mut report = SequentialReport {
        attempted: 0,
        succeeded: 0,
        not_attempted: 0,
        failure: None,
    };

    for item in items {
        report.attempted += 1;
        let result = op(item.clone()).await;
        runtime.sleep(delay).await;

        match result {
            Ok(()) => report.succeeded += 1,
            Err(error) => {
                debug!(attempted = report.attempted, %error, "stopping after failure");
                report.failure = Some((item, error));
                break;
            }
        }
    }

    report.not_attempted = total - report.attempted;
    report
}

#[cfg(test)]
#[path = "mutate_tests.rs"]
mod tests;
