//! HTTP client for the GitLab REST API (v4)
//!
//! Only the endpoints the ci-sync commands need are covered: project CI/CD
//! variables and project pipelines. Every call authenticates with the static
//! access token in the `PRIVATE-TOKEN` header. There is no retry or backoff:
//! a failed call is reported once as an [`ApiError`].

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{DEFAULT_API_TIMEOUT_SECS, Settings};
use crate::error::ApiError;

/// Response header carrying the total number of pages of a listing
pub const TOTAL_PAGES_HEADER: &str = "x-total-pages";

/// Header used to send the access token
pub const TOKEN_HEADER: &str = "private-token";

/// A project-level CI/CD variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Variable name
    pub key: String,
    /// Variable value; `null` for hidden variables
    #[serde(default)]
    pub value: Option<String>,
    /// Environment the variable is restricted to (`*` for all)
    #[serde(default = "default_scope")]
    pub environment_scope: String,
    /// Whether the variable is only exposed to protected refs
    #[serde(default)]
    pub protected: bool,
    /// Whether the variable is masked in job logs
    #[serde(default)]
    pub masked: bool,
    /// `env_var` or `file`
    #[serde(default = "default_variable_type")]
    pub variable_type: String,
}

fn default_scope() -> String {
    "*".to_string()
}

fn default_variable_type() -> String {
    "env_var".to_string()
}

/// A project pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    /// Instance-wide pipeline id, used to address the pipeline
    pub id: u64,
    /// Project-scoped pipeline number
    #[serde(default)]
    pub iid: Option<u64>,
    /// Pipeline status (`success`, `failed`, ...)
    #[serde(default)]
    pub status: String,
    /// Branch or tag the pipeline ran for
    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,
    /// Commit the pipeline ran for
    #[serde(default)]
    pub sha: Option<String>,
    /// Link to the pipeline in the web UI
    #[serde(default)]
    pub web_url: Option<String>,
}

/// One page of a collection listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page, in API order
    pub items: Vec<T>,
    /// Total page count reported by the API, if any
    pub total_pages: Option<u32>,
}

/// Body of a variable create call
#[derive(Debug, Clone, Serialize)]
pub struct CreateVariableRequest<'a> {
    /// Variable name
    pub key: &'a str,
    /// Variable value
    pub value: &'a str,
    /// Environment scope
    pub environment_scope: &'a str,
    /// Always `false`
    pub protected: bool,
    /// Always `false`
    pub masked: bool,
}

#[derive(Debug, Serialize)]
struct UpdateVariableRequest<'a> {
    value: &'a str,
}

/// Client for a single GitLab project
#[derive(Debug, Clone)]
pub struct GitLabClient {
    http: reqwest::Client,
    base_url: Url,
    project_id: String,
}

impl GitLabClient {
    /// Create a client for `project_id` under `base_url`
    pub fn new(base_url: &str, project_id: &str, token: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url).map_err(ApiError::transport)?;

        let mut headers = HeaderMap::new();
        let mut token_value = HeaderValue::from_str(token).map_err(ApiError::transport)?;
        token_value.set_sensitive(true);
        headers.insert(TOKEN_HEADER, token_value);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(DEFAULT_API_TIMEOUT_SECS))
            .user_agent(concat!("ci-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::transport)?;

        Ok(Self {
            http,
            base_url,
            project_id: project_id.to_string(),
        })
    }

    /// Create a client from resolved settings
    pub fn from_settings(settings: &Settings) -> Result<Self, ApiError> {
        Self::new(&settings.api_url, &settings.project_id, &settings.token)
    }

    /// Fetch one page of project variables
    pub async fn list_variables(&self, page: u32, per_page: u32) -> Result<Page<Variable>, ApiError> {
        self.list_page(&["variables"], page, per_page).await
    }

    /// Update the value of `key` within `environment_scope`
    pub async fn update_variable(
        &self,
        key: &str,
        value: &str,
        environment_scope: &str,
    ) -> Result<(), ApiError> {
        let request = self
            .request(Method::PUT, &["variables", key])?
            .query(&[("filter[environment_scope]", environment_scope)])
            .json(&UpdateVariableRequest { value });
        self.execute(request).await.map(drop)
    }

    /// Create a non-protected, non-masked variable
    pub async fn create_variable(
        &self,
        key: &str,
        value: &str,
        environment_scope: &str,
    ) -> Result<(), ApiError> {
        let body = CreateVariableRequest {
            key,
            value,
            environment_scope,
            protected: false,
            masked: false,
        };
        let request = self.request(Method::POST, &["variables"])?.json(&body);
        self.execute(request).await.map(drop)
    }

    /// Delete `key` within `environment_scope`
    pub async fn delete_variable(&self, key: &str, environment_scope: &str) -> Result<(), ApiError> {
        let request = self
            .request(Method::DELETE, &["variables", key])?
            .query(&[("filter[environment_scope]", environment_scope)]);
        self.execute(request).await.map(drop)
    }

    /// Fetch one page of project pipelines
    pub async fn list_pipelines(&self, page: u32, per_page: u32) -> Result<Page<Pipeline>, ApiError> {
        self.list_page(&["pipelines"], page, per_page).await
    }

    /// Delete the pipeline with instance-wide id `pipeline_id`
    pub async fn delete_pipeline(&self, pipeline_id: u64) -> Result<(), ApiError> {
        let id = pipeline_id.to_string();
        let request = self.request(Method::DELETE, &["pipelines", &id])?;
        self.execute(request).await.map(drop)
    }

    async fn list_page<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        page: u32,
        per_page: u32,
    ) -> Result<Page<T>, ApiError> {
        let request = self
            .request(Method::GET, segments)?
            .query(&[("page", page), ("per_page", per_page)]);
        let response = self.execute(request).await?;

        let total_pages = response
            .headers()
            .get(TOTAL_PAGES_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok());

        let status = response.status();
        let items = response
            .json::<Vec<T>>()
            .await
            .map_err(|e| ApiError::decode(status, e))?;

        debug!(page, per_page, count = items.len(), ?total_pages, "fetched page");
        Ok(Page { items, total_pages })
    }

    fn project_url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::transport(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .push("projects")
            .push(&self.project_id)
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        let url = self.project_url(segments)?;
        debug!(%method, %url, "sending request");
        Ok(self.http.request(method, url))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(ApiError::transport)?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(%status, body = %body, "request failed");
        Err(ApiError::from_status(status, body))
    }
}

#[cfg(test)]
#[path = "api_client_tests.rs"]
mod tests;
