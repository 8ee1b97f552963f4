//! Remove every variable scoped to one environment

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use ci_sync_runtime::api_client::{GitLabClient, Variable};
use ci_sync_runtime::config::{Operation, RawSettings, Settings};
use ci_sync_runtime::deps::{CiApiClient, MessageStyle, UserInterface};

use crate::batch::{RunSummary, fetch_all, settle_all};

/// Dependencies for the remove-env-variables command
pub struct RemoveEnvVariablesDependencies {
    /// User interface for output
    pub ui: Arc<dyn UserInterface>,
    /// API client for the target project
    pub api_client: Arc<dyn CiApiClient>,
}

/// List the project's variables and keep those scoped to `environment`.
///
/// The list endpoint does not filter by scope, so every page is fetched and
/// the filtering happens here.
pub async fn list_environment_variables(
    client: &dyn CiApiClient,
    environment: &str,
    per_page: u32,
) -> Result<Vec<Variable>> {
    let variables = fetch_all(per_page, move |page, per_page| {
        client.list_variables(page, per_page)
    })
    .await
    .context("Failed to list project variables")?;

    let total = variables.len();
    let scoped: Vec<Variable> = variables
        .into_iter()
        .filter(|v| v.environment_scope == environment)
        .collect();
    info!(total, scoped = scoped.len(), environment, "listed variables");

    Ok(scoped)
}

/// Execute the remove-env-variables command with injected dependencies
pub async fn execute_with_deps(
    settings: &Settings,
    deps: &Arc<RemoveEnvVariablesDependencies>,
) -> Result<RunSummary> {
    let environment = settings.environment_scope();
    let client = deps.api_client.as_ref();

    deps.ui.print_styled(
        &format!("→ Removing variables for environment '{environment}'"),
        MessageStyle::Cyan,
    );

    let spinner = deps.ui.create_spinner();
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Fetching variables...");
    let listed = list_environment_variables(client, environment, settings.batch_size).await;
    spinner.finish_and_clear();
    let variables = listed?;

    if variables.is_empty() {
        deps.ui.print_styled(
            &format!("No variables found for environment '{environment}'."),
            MessageStyle::Yellow,
        );
        return Ok(RunSummary::default());
    }

    deps.ui.print(&format!(
        "Found {} variables in environment '{environment}'",
        variables.len()
    ));

    let keys: Vec<String> = variables.into_iter().map(|v| v.key).collect();

    if settings.dry_run {
        for key in &keys {
            deps.ui.print(&format!("  Would delete {key}"));
        }
        deps.ui.print_styled(
            &format!(
                "Dry run: {} variables would be deleted. Nothing was changed.",
                keys.len()
            ),
            MessageStyle::Yellow,
        );
        return Ok(RunSummary::default());
    }

    let outcomes = settle_all(keys, |key: String| async move {
        client.delete_variable(&key, environment).await
    })
    .await;

    for outcome in &outcomes {
        let key = &outcome.item;
        match &outcome.result {
            Ok(()) => deps
                .ui
                .print_styled(&format!("✓ Deleted {key}"), MessageStyle::Green),
            Err(error) => {
                warn!(key = %key, %error, "failed to delete variable");
                deps.ui.print_styled(
                    &format!("✗ Failed to delete {key}: {error}"),
                    MessageStyle::Red,
                );
            }
        }
    }

    let summary = RunSummary::from_outcomes(&outcomes);
    summary.print(deps.ui.as_ref());
    Ok(summary)
}

/// Resolve `raw`, then build dependencies for the resolved settings and run.
///
/// `make_deps` is only called once the settings are valid, so a configuration
/// error never reaches the API.
pub async fn run_with_deps<F>(raw: RawSettings, make_deps: F) -> Result<RunSummary>
where
    F: FnOnce(&Settings) -> Result<Arc<RemoveEnvVariablesDependencies>>,
{
    let settings = Settings::resolve(raw, Operation::RemoveEnvironmentVariables)?;
    let deps = make_deps(&settings)?;
    execute_with_deps(&settings, &deps).await
}

/// Execute the remove-env-variables command with default dependencies
pub async fn execute(raw: RawSettings) -> Result<RunSummary> {
    use ci_sync_common::RealUserInterface;

    run_with_deps(raw, |settings| {
        Ok(Arc::new(RemoveEnvVariablesDependencies {
            ui: Arc::new(RealUserInterface),
            api_client: Arc::new(GitLabClient::from_settings(settings)?),
        }))
    })
    .await
}

#[cfg(test)]
#[path = "remove_env_variables_tests.rs"]
mod tests;
