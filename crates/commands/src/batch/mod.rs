//! Shared batch primitives: paginated listing, bulk mutation, run summaries,
//! and the confirmation countdown

/// Cancellable countdown before destructive batches
pub mod countdown;
/// Parallel and rate-limited bulk mutation
pub mod mutate;
/// Paginated listing of remote collections
pub mod paginate;
/// Run-level tallies
pub mod summary;

pub use countdown::{Countdown, CountdownOutcome};
pub use mutate::{ItemOutcome, SequentialReport, run_rate_limited, settle_all};
pub use paginate::fetch_all;
pub use summary::RunSummary;

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
