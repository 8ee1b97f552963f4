//! Centralized configuration for ci-sync
//!
//! Settings are read once at startup, before any network call, and are never
//! mutated afterwards. Each binary collects raw values (flags falling back to
//! environment variables) into [`RawSettings`] and resolves them against the
//! [`Operation`] it performs.
//!
//! # Environment Variables
//!
//! - `GITLAB_TOKEN`: access token sent in the `PRIVATE-TOKEN` header
//! - `GITLAB_PROJECT_ID`: numeric project id or URL path (`group/project`)
//! - `GITLAB_API_URL`: API base URL, defaults to `https://gitlab.com/api/v4`
//! - `GITLAB_ENVIRONMENT`: environment scope targeted by variable commands
//! - `VARIABLES_FILE`: input document for `set-variables`
//! - `BATCH_SIZE`: page size used when listing (1..=100)
//! - `DELAY_MS`: pause after each call in rate-limited mode
//! - `CONFIRM_DELAY_SECS`: countdown before destructive sequential batches
//! - `DRY_RUN`: list and report without mutating

use std::path::PathBuf;
use std::time::Duration;

use garde::Validate;

/// Default backend API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://gitlab.com/api/v4";

/// Environment variable name for the API URL
pub const API_URL_ENV_VAR: &str = "GITLAB_API_URL";

/// Environment variable name for the access token
pub const TOKEN_ENV_VAR: &str = "GITLAB_TOKEN";

/// Environment variable name for the project identifier
pub const PROJECT_ID_ENV_VAR: &str = "GITLAB_PROJECT_ID";

/// Environment variable name for the target environment scope
pub const ENVIRONMENT_ENV_VAR: &str = "GITLAB_ENVIRONMENT";

/// Environment variable name for the input document path
pub const VARIABLES_FILE_ENV_VAR: &str = "VARIABLES_FILE";

/// Environment variable name for the listing page size
pub const BATCH_SIZE_ENV_VAR: &str = "BATCH_SIZE";

/// Environment variable name for the inter-call delay
pub const DELAY_MS_ENV_VAR: &str = "DELAY_MS";

/// Environment variable name for the confirmation countdown
pub const CONFIRM_DELAY_ENV_VAR: &str = "CONFIRM_DELAY_SECS";

/// Environment variable name for dry-run mode
pub const DRY_RUN_ENV_VAR: &str = "DRY_RUN";

/// Default input document path
pub const DEFAULT_VARIABLES_FILE: &str = "variables.json";

/// Default listing page size
pub const DEFAULT_BATCH_SIZE: u32 = 20;

/// Largest page size the API accepts
pub const MAX_BATCH_SIZE: u32 = 100;

/// Default pause between pipeline deletions
pub const DEFAULT_PIPELINE_DELAY_MS: u64 = 1000;

/// Default countdown before destructive sequential batches
pub const DEFAULT_CONFIRM_DELAY_SECS: u64 = 5;

/// Default API timeout in seconds
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

/// The operation a binary performs; decides which settings are required
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Upload variables from the input document
    SetVariables,
    /// Delete every variable scoped to the target environment
    RemoveEnvironmentVariables,
    /// Delete every pipeline of the project
    RemovePipelines,
}

impl Operation {
    /// Whether the operation targets a single environment scope
    pub const fn requires_environment(self) -> bool {
        matches!(self, Self::SetVariables | Self::RemoveEnvironmentVariables)
    }

    /// Whether the operation reads the input document
    pub const fn requires_document(self) -> bool {
        matches!(self, Self::SetVariables)
    }

    /// Inter-call delay used when `DELAY_MS` is not set
    pub const fn default_delay_ms(self) -> u64 {
        match self {
            Self::RemovePipelines => DEFAULT_PIPELINE_DELAY_MS,
            Self::SetVariables | Self::RemoveEnvironmentVariables => 0,
        }
    }
}

/// Configuration errors; all are fatal and reported before any network call
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required setting is absent or blank
    #[error("missing required setting {name}")]
    Missing {
        /// Environment variable name of the setting
        name: &'static str,
    },

    /// A setting could not be parsed
    #[error("invalid value '{value}' for {name}: {reason}")]
    Malformed {
        /// Environment variable name of the setting
        name: &'static str,
        /// The offending raw value
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// Parsed settings failed validation
    #[error("invalid configuration: {0}")]
    Invalid(#[from] garde::Report),
}

/// Unvalidated settings as collected from flags and the environment
#[derive(Debug, Clone, Default)]
pub struct RawSettings {
    /// API base URL
    pub api_url: Option<String>,
    /// Project identifier
    pub project_id: Option<String>,
    /// Access token
    pub token: Option<String>,
    /// Target environment scope
    pub environment: Option<String>,
    /// Input document path
    pub variables_file: Option<PathBuf>,
    /// Listing page size
    pub batch_size: Option<String>,
    /// Inter-call delay in milliseconds
    pub delay_ms: Option<String>,
    /// Confirmation countdown in seconds
    pub confirm_delay_secs: Option<String>,
    /// Dry-run flag
    pub dry_run: bool,
}

/// Validated, immutable run configuration
#[derive(Debug, Clone, Validate)]
pub struct Settings {
    /// API base URL
    #[garde(pattern(r"^https?://[^\s/]+"))]
    pub api_url: String,

    /// Project identifier (numeric id or `group/project` path)
    #[garde(length(min = 1))]
    pub project_id: String,

    /// Access token
    #[garde(length(min = 1))]
    pub token: String,

    /// Target environment scope
    #[garde(length(min = 1))]
    pub environment: Option<String>,

    /// Input document path
    #[garde(skip)]
    pub variables_file: Option<PathBuf>,

    /// Listing page size
    #[garde(range(min = 1, max = 100))]
    pub batch_size: u32,

    /// Inter-call delay in milliseconds
    #[garde(skip)]
    pub delay_ms: u64,

    /// Confirmation countdown in seconds
    #[garde(skip)]
    pub confirm_delay_secs: u64,

    /// List and report without mutating
    #[garde(skip)]
    pub dry_run: bool,
}

impl Settings {
    /// Resolve raw values for `operation`, applying defaults and validation
    pub fn resolve(raw: RawSettings, operation: Operation) -> Result<Self, ConfigError> {
        let token = required(raw.token, TOKEN_ENV_VAR)?;
        let project_id = required(raw.project_id, PROJECT_ID_ENV_VAR)?;

        let environment = if operation.requires_environment() {
            Some(required(raw.environment, ENVIRONMENT_ENV_VAR)?)
        } else {
            None
        };

        let variables_file = operation.requires_document().then(|| {
            raw.variables_file
                .filter(|path| !path.as_os_str().is_empty())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_VARIABLES_FILE))
        });

        let api_url = non_blank(raw.api_url)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let settings = Self {
            api_url,
            project_id,
            token,
            environment,
            variables_file,
            batch_size: parse_or(raw.batch_size, BATCH_SIZE_ENV_VAR, DEFAULT_BATCH_SIZE)?,
            delay_ms: parse_or(raw.delay_ms, DELAY_MS_ENV_VAR, operation.default_delay_ms())?,
            confirm_delay_secs: parse_or(
                raw.confirm_delay_secs,
                CONFIRM_DELAY_ENV_VAR,
                DEFAULT_CONFIRM_DELAY_SECS,
            )?,
            dry_run: raw.dry_run,
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Target environment scope, empty when the operation has none
    pub fn environment_scope(&self) -> &str {
        self.environment.as_deref().unwrap_or_default()
    }

    /// Pause applied after each call in rate-limited mode
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    non_blank(value).ok_or(ConfigError::Missing { name })
}

fn parse_or<T>(value: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match non_blank(value) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Malformed {
            name,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
