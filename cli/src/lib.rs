//! Shared plumbing for the ci-sync binaries
//!
//! Each binary is a thin wrapper: it loads `.env`, sets up tracing, parses
//! its flags (every flag falls back to an environment variable), hands the
//! raw settings to its command and maps the outcome to an exit code.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::builder::FalseyValueParser;
use console::style;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use ci_sync_commands::batch::RunSummary;
use ci_sync_runtime::config::RawSettings;

/// Connection and batching flags shared by every binary
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// GitLab API base URL
    #[arg(long, env = "GITLAB_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Project id or `group/project` path
    #[arg(long, env = "GITLAB_PROJECT_ID", value_name = "ID")]
    pub project_id: Option<String>,

    /// Access token sent as `PRIVATE-TOKEN`
    #[arg(long, env = "GITLAB_TOKEN", value_name = "TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Page size used when listing (1-100)
    #[arg(long, env = "BATCH_SIZE", value_name = "N")]
    pub batch_size: Option<String>,

    /// List and report without changing anything
    #[arg(long, env = "DRY_RUN", value_parser = FalseyValueParser::new())]
    pub dry_run: bool,
}

/// Target environment flag for the variable commands
#[derive(Debug, Clone, Args)]
pub struct EnvironmentArgs {
    /// Environment scope to operate on
    #[arg(long, env = "GITLAB_ENVIRONMENT", value_name = "NAME")]
    pub environment: Option<String>,
}

impl CommonArgs {
    /// Collect the shared flags into raw settings
    pub fn into_raw(self) -> RawSettings {
        RawSettings {
            api_url: self.api_url,
            project_id: self.project_id,
            token: self.token,
            batch_size: self.batch_size,
            dry_run: self.dry_run,
            ..RawSettings::default()
        }
    }
}

/// Flags for `set-variables`
#[derive(Debug, Clone, Args)]
pub struct SetVariablesArgs {
    /// Connection and batching flags
    #[command(flatten)]
    pub common: CommonArgs,

    /// Target environment
    #[command(flatten)]
    pub environment: EnvironmentArgs,

    /// JSON file mapping variable names to values
    #[arg(long, env = "VARIABLES_FILE", value_name = "PATH")]
    pub variables_file: Option<PathBuf>,
}

impl From<SetVariablesArgs> for RawSettings {
    fn from(args: SetVariablesArgs) -> Self {
        Self {
            environment: args.environment.environment,
            variables_file: args.variables_file,
            ..args.common.into_raw()
        }
    }
}

/// Flags for `remove-env-variables`
#[derive(Debug, Clone, Args)]
pub struct RemoveEnvVariablesArgs {
    /// Connection and batching flags
    #[command(flatten)]
    pub common: CommonArgs,

    /// Target environment
    #[command(flatten)]
    pub environment: EnvironmentArgs,
}

impl From<RemoveEnvVariablesArgs> for RawSettings {
    fn from(args: RemoveEnvVariablesArgs) -> Self {
        Self {
            environment: args.environment.environment,
            ..args.common.into_raw()
        }
    }
}

/// Flags for `remove-pipelines`
#[derive(Debug, Clone, Args)]
pub struct RemovePipelinesArgs {
    /// Connection and batching flags
    #[command(flatten)]
    pub common: CommonArgs,

    /// Pause after each deletion, in milliseconds
    #[arg(long, env = "DELAY_MS", value_name = "MS")]
    pub delay_ms: Option<String>,

    /// Seconds to wait for Ctrl-C before deleting (0 skips the wait)
    #[arg(long, env = "CONFIRM_DELAY_SECS", value_name = "SECS")]
    pub confirm_delay_secs: Option<String>,
}

impl From<RemovePipelinesArgs> for RawSettings {
    fn from(args: RemovePipelinesArgs) -> Self {
        Self {
            delay_ms: args.delay_ms,
            confirm_delay_secs: args.confirm_delay_secs,
            ..args.common.into_raw()
        }
    }
}

/// Load `.env` and initialize tracing; call before parsing flags
pub fn init() {
    // A missing .env file is not an error
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
}

/// Map a command outcome to the process exit code
pub fn exit_code(outcome: anyhow::Result<RunSummary>) -> ExitCode {
    match outcome {
        Ok(summary) if summary.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            debug!(error = %format!("{e:#}"), "command failed");
            eprintln!("{} {e:#}", style("Error:").red().bold());
            ExitCode::FAILURE
        }
    }
}
