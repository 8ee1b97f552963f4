//! Upload variables from a JSON document into one environment scope

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use ci_sync_runtime::api_client::GitLabClient;
use ci_sync_runtime::config::{DEFAULT_VARIABLES_FILE, Operation, RawSettings, Settings};
use ci_sync_runtime::deps::{
    CiApiClient, FileSystem, MessageStyle, RealFileSystem, UserInterface,
};
use ci_sync_runtime::error::ApiError;

use crate::batch::{RunSummary, settle_all};
use crate::document::{InputDocument, VariableEntry};

/// Dependencies for the set-variables command
pub struct SetVariablesDependencies {
    /// User interface for output
    pub ui: Arc<dyn UserInterface>,
    /// API client for the target project
    pub api_client: Arc<dyn CiApiClient>,
    /// File system for reading the input document
    pub file_system: Arc<dyn FileSystem>,
}

/// What an upsert ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertAction {
    /// The variable existed and was updated
    Updated,
    /// The variable was absent and was created
    Created,
}

/// Update a variable in `scope`, creating it when the update reports it missing.
///
/// Any failure other than not-found on the update, and any failure on the
/// create, is returned as is.
pub async fn upsert_variable(
    client: &dyn CiApiClient,
    key: &str,
    value: &str,
    scope: &str,
) -> Result<UpsertAction, ApiError> {
    match client.update_variable(key, value, scope).await {
        Ok(()) => Ok(UpsertAction::Updated),
        Err(e) if e.is_not_found() => {
            debug!(key, scope, "variable not found, creating");
            client.create_variable(key, value, scope).await?;
            Ok(UpsertAction::Created)
        }
        Err(e) => Err(e),
    }
}

/// Execute the set-variables command with injected dependencies
pub async fn execute_with_deps(
    settings: &Settings,
    deps: &Arc<SetVariablesDependencies>,
) -> Result<RunSummary> {
    let scope = settings.environment_scope();
    let path = settings
        .variables_file
        .as_deref()
        .unwrap_or_else(|| Path::new(DEFAULT_VARIABLES_FILE));

    deps.ui.print_styled(
        &format!(
            "→ Setting variables for environment '{scope}' from {}",
            path.display()
        ),
        MessageStyle::Cyan,
    );

    let document = InputDocument::load(deps.file_system.as_ref(), path)?;
    info!(
        entries = document.entries.len(),
        skipped = document.skipped.len(),
        "loaded variables file"
    );

    for skipped in &document.skipped {
        warn!(key = %skipped.key, kind = skipped.kind, "skipping non-primitive value");
        deps.ui.print_styled(
            &format!(
                "⚠ Skipping {}: {} values are not supported",
                skipped.key, skipped.kind
            ),
            MessageStyle::Warning,
        );
    }

    let skipped = document.skipped.len();
    if document.entries.is_empty() {
        deps.ui
            .print_styled("No variables to set.", MessageStyle::Yellow);
        return Ok(RunSummary::default().with_skipped(skipped));
    }

    if settings.dry_run {
        for entry in &document.entries {
            deps.ui.print(&format!("  Would set {}", entry.key));
        }
        deps.ui.print_styled(
            &format!(
                "Dry run: {} variables would be set. Nothing was changed.",
                document.entries.len()
            ),
            MessageStyle::Yellow,
        );
        return Ok(RunSummary::default().with_skipped(skipped));
    }

    deps.ui
        .print(&format!("Setting {} variables...", document.entries.len()));

    let client = deps.api_client.as_ref();
    let outcomes = settle_all(document.entries, |entry: VariableEntry| async move {
        upsert_variable(client, &entry.key, &entry.value.to_string(), scope).await
    })
    .await;

    for outcome in &outcomes {
        let key = &outcome.item.key;
        match &outcome.result {
            Ok(UpsertAction::Updated) => deps
                .ui
                .print_styled(&format!("✓ Updated {key}"), MessageStyle::Green),
            Ok(UpsertAction::Created) => deps
                .ui
                .print_styled(&format!("✓ Created {key}"), MessageStyle::Green),
            Err(error) => {
                warn!(key = %key, %error, "failed to set variable");
                deps.ui.print_styled(
                    &format!("✗ Failed to set {key}: {error}"),
                    MessageStyle::Red,
                );
            }
        }
    }

    let summary = RunSummary::from_outcomes(&outcomes).with_skipped(skipped);
    summary.print(deps.ui.as_ref());
    Ok(summary)
}

/// Resolve `raw`, then build dependencies for the resolved settings and run.
///
/// `make_deps` is only called once the settings are valid, so a configuration
/// error never reaches the API.
pub async fn run_with_deps<F>(raw: RawSettings, make_deps: F) -> Result<RunSummary>
where
    F: FnOnce(&Settings) -> Result<Arc<SetVariablesDependencies>>,
{
    let settings = Settings::resolve(raw, Operation::SetVariables)?;
    let deps = make_deps(&settings)?;
    execute_with_deps(&settings, &deps).await
}

/// Execute the set-variables command with default dependencies
pub async fn execute(raw: RawSettings) -> Result<RunSummary> {
    use ci_sync_common::RealUserInterface;

    run_with_deps(raw, |settings| {
        Ok(Arc::new(SetVariablesDependencies {
            ui: Arc::new(RealUserInterface),
            api_client: Arc::new(GitLabClient::from_settings(settings)?),
            file_system: Arc::new(RealFileSystem),
        }))
    })
    .await
}

#[cfg(test)]
#[path = "set_variables_tests.rs"]
mod tests;
