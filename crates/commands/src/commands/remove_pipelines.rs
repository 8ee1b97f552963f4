//! Remove every pipeline of a project
//!
//! Pipelines are deleted one at a time with a pause after each call, and the
//! run stops at the first failure. A cancellable countdown runs once before
//! the first deletion; after it, Ctrl-C ends the process with a failure.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::{error, info};

use ci_sync_runtime::api_client::{GitLabClient, Pipeline};
use ci_sync_runtime::config::{Operation, RawSettings, Settings};
use ci_sync_runtime::deps::{AsyncRuntime, CiApiClient, MessageStyle, RealAsyncRuntime, UserInterface};

use crate::batch::{Countdown, CountdownOutcome, RunSummary, fetch_all, run_rate_limited};

/// Dependencies for the remove-pipelines command
pub struct RemovePipelinesDependencies {
    /// User interface for output
    pub ui: Arc<dyn UserInterface>,
    /// API client for the target project
    pub api_client: Arc<dyn CiApiClient>,
    /// Runtime used for pauses and the countdown
    pub async_runtime: Arc<dyn AsyncRuntime>,
}

/// Execute the remove-pipelines command with injected dependencies
pub async fn execute_with_deps(
    settings: &Settings,
    deps: &Arc<RemovePipelinesDependencies>,
) -> Result<RunSummary> {
    let client = deps.api_client.as_ref();
    let ui = deps.ui.as_ref();

    ui.print_styled(
        &format!("→ Removing pipelines of project {}", settings.project_id),
        MessageStyle::Cyan,
    );

    let spinner = ui.create_spinner();
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Fetching pipelines...");
    let listed = fetch_all(settings.batch_size, move |page, per_page| {
        client.list_pipelines(page, per_page)
    })
    .await;
    spinner.finish_and_clear();
    let pipelines: Vec<Pipeline> = listed.context("Failed to list pipelines")?;
    info!(count = pipelines.len(), "listed pipelines");

    if pipelines.is_empty() {
        ui.print_styled("No pipelines found.", MessageStyle::Yellow);
        return Ok(RunSummary::default());
    }

    let total = pipelines.len();
    ui.print(&format!("Found {total} pipelines"));

    if settings.dry_run {
        for pipeline in &pipelines {
            ui.print(&format!(
                "  Would delete pipeline #{} ({}, {})",
                pipeline.id,
                pipeline.git_ref.as_deref().unwrap_or("-"),
                pipeline.status
            ));
        }
        ui.print_styled(
            &format!("Dry run: {total} pipelines would be deleted. Nothing was changed."),
            MessageStyle::Yellow,
        );
        return Ok(RunSummary::default());
    }

    let countdown = Countdown::new(settings.confirm_delay_secs);
    let action = format!(
        "About to delete {total} pipelines from project {}",
        settings.project_id
    );
    if countdown
        .run(&action, ui, deps.async_runtime.as_ref())
        .await
        == CountdownOutcome::Cancelled
    {
        bail!("Cancelled by operator");
    }
    deps.async_runtime
        .exit_on_interrupt("Stopped by operator; remaining pipelines were not deleted.");

    let ids: Vec<u64> = pipelines.iter().map(|p| p.id).collect();
    let mut position = 0;
    let report = run_rate_limited(
        ids,
        settings.delay(),
        deps.async_runtime.as_ref(),
        |id| {
            position += 1;
            let current = position;
            async move {
                let result = client.delete_pipeline(id).await;
                if result.is_ok() {
                    ui.print(&format!("✓ Deleted pipeline #{id} ({current}/{total})"));
                }
                result
            }
        },
    )
    .await;

    if let Some((id, failure)) = &report.failure {
        error!(pipeline = id, error = %failure, "pipeline deletion failed, stopping");
        ui.print_styled(
            &format!("✗ Failed to delete pipeline #{id}: {failure}"),
            MessageStyle::Red,
        );
        if report.not_attempted > 0 {
            ui.print_styled(
                &format!(
                    "Stopped; {} pipelines were not attempted.",
                    report.not_attempted
                ),
                MessageStyle::Yellow,
            );
        }
    }

    let summary = RunSummary::from(&report);
    summary.print(ui);
    Ok(summary)
}

/// Resolve `raw`, then build dependencies for the resolved settings and run.
///
/// `make_deps` is only called once the settings are valid, so a configuration
/// error never reaches the API.
pub async fn run_with_deps<F>(raw: RawSettings, make_deps: F) -> Result<RunSummary>
where
    F: FnOnce(&Settings) -> Result<Arc<RemovePipelinesDependencies>>,
{
    let settings = Settings::resolve(raw, Operation::RemovePipelines)?;
    let deps = make_deps(&settings)?;
    execute_with_deps(&settings, &deps).await
}

/// Execute the remove-pipelines command with default dependencies
pub async fn execute(raw: RawSettings) -> Result<RunSummary> {
    use ci_sync_common::RealUserInterface;

    run_with_deps(raw, |settings| {
        Ok(Arc::new(RemovePipelinesDependencies {
            ui: Arc::new(RealUserInterface),
            api_client: Arc::new(GitLabClient::from_settings(settings)?),
            async_runtime: Arc::new(RealAsyncRuntime),
        }))
    })
    .await
}

#[cfg(test)]
#[path = "remove_pipelines_tests.rs"]
mod tests;
