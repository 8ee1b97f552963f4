//! Test helper utilities and mock implementations for ci-sync-commands
//!
//! The API mock is hand-written rather than generated: the commands need a
//! small in-memory model of a project (variables with scopes, pipelines) that
//! answers list calls page by page, plus a shared timeline so tests can check
//! the interleaving of calls and pauses.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use mockall::mock;

use ci_sync_runtime::api_client::{Page, Pipeline, Variable};
use ci_sync_runtime::config::{Operation, RawSettings, Settings};
use ci_sync_runtime::deps::{AsyncRuntime, CiApiClient, FileSystem, WaitOutcome};
use ci_sync_runtime::error::ApiError;

pub use ci_sync_common::ui::TestUserInterface;

// Mock implementation of the FileSystem trait for testing file operations.
//
// # Example
//
// ```rust
// let mut mock_fs = MockFileSystemMock::new();
// mock_fs.expect_read_to_string()
//     .times(1)
//     .returning(|_| Ok("{\"A\": \"1\"}".to_string()));
// ```
mock! {
    pub FileSystemMock {}

    impl FileSystem for FileSystemMock {
        fn exists(&self, path: &Path) -> bool;
        fn read_to_string(&self, path: &Path) -> Result<String>;
    }
}

/// A shared, ordered record of calls and pauses
pub type Timeline = Arc<Mutex<Vec<String>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One call received by [`MockCiApiClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    /// `list_variables(page, per_page)`
    ListVariables(u32, u32),
    /// `update_variable(key, value, scope)`
    UpdateVariable(String, String, String),
    /// `create_variable(key, value, scope)`
    CreateVariable(String, String, String),
    /// `delete_variable(key, scope)`
    DeleteVariable(String, String),
    /// `list_pipelines(page, per_page)`
    ListPipelines(u32, u32),
    /// `delete_pipeline(id)`
    DeletePipeline(u64),
}

impl ApiCall {
    /// Whether the call changes remote state
    pub const fn is_mutation(&self) -> bool {
        !matches!(self, Self::ListVariables(..) | Self::ListPipelines(..))
    }
}

#[derive(Default)]
struct MockState {
    variables: Vec<Variable>,
    pipelines: Vec<Pipeline>,
    calls: Vec<ApiCall>,
}

/// In-memory project answering the `CiApiClient` calls
#[derive(Default)]
pub struct MockCiApiClient {
    state: Mutex<MockState>,
    timeline: Timeline,
    send_total_pages: bool,
    failing_list_page: Option<u32>,
    failing_keys: HashMap<String, u16>,
    failing_creates: HashMap<String, u16>,
    failing_pipelines: HashSet<u64>,
}

impl MockCiApiClient {
    /// An empty project that reports `X-Total-Pages`
    pub fn new() -> Self {
        Self {
            send_total_pages: true,
            ..Self::default()
        }
    }

    /// Add an existing variable
    pub fn with_variable(self, key: &str, value: &str, scope: &str) -> Self {
        lock(&self.state).variables.push(variable(key, value, scope));
        self
    }

    /// Add a hidden variable, listed with a `null` value
    pub fn with_hidden_variable(self, key: &str, scope: &str) -> Self {
        let mut hidden = variable(key, "", scope);
        hidden.value = None;
        hidden.masked = true;
        lock(&self.state).variables.push(hidden);
        self
    }

    /// Add `count` pipelines with ids `1..=count`
    pub fn with_pipelines(self, count: u64) -> Self {
        lock(&self.state)
            .pipelines
            .extend((1..=count).map(pipeline));
        self
    }

    /// Stop sending the total page count header
    pub const fn without_total_pages(mut self) -> Self {
        self.send_total_pages = false;
        self
    }

    /// Make the given list page answer 500
    pub const fn failing_list_page(mut self, page: u32) -> Self {
        self.failing_list_page = Some(page);
        self
    }

    /// Make update and delete calls for `key` answer `status`
    pub fn failing_key(mut self, key: &str, status: u16) -> Self {
        self.failing_keys.insert(key.to_string(), status);
        self
    }

    /// Make create calls for `key` answer `status`
    pub fn failing_create(mut self, key: &str, status: u16) -> Self {
        self.failing_creates.insert(key.to_string(), status);
        self
    }

    /// Make deleting pipeline `id` answer 500
    pub fn failing_pipeline(mut self, id: u64) -> Self {
        self.failing_pipelines.insert(id);
        self
    }

    /// The timeline this client appends to
    pub fn timeline(&self) -> Timeline {
        Arc::clone(&self.timeline)
    }

    /// Every call received, in order
    pub fn calls(&self) -> Vec<ApiCall> {
        lock(&self.state).calls.clone()
    }

    /// Calls that change remote state
    pub fn mutations(&self) -> Vec<ApiCall> {
        self.calls().into_iter().filter(ApiCall::is_mutation).collect()
    }

    /// Current remote variables
    pub fn variables(&self) -> Vec<Variable> {
        lock(&self.state).variables.clone()
    }

    /// Current remote pipeline ids
    pub fn pipeline_ids(&self) -> Vec<u64> {
        lock(&self.state).pipelines.iter().map(|p| p.id).collect()
    }

    fn record(&self, call: ApiCall) {
        lock(&self.timeline).push(format!("{call:?}"));
        lock(&self.state).calls.push(call);
    }

    fn page<T: Clone>(&self, all: &[T], page: u32, per_page: u32) -> Result<Page<T>, ApiError> {
        if self.failing_list_page == Some(page) {
            return Err(ApiError::with_status(500, "500 Internal Server Error"));
        }

        let per_page = per_page.max(1) as usize;
        let start = (page.max(1) as usize - 1) * per_page;
        let items = all.iter().skip(start).take(per_page).cloned().collect();
        let total_pages = self
            .send_total_pages
            .then(|| all.len().div_ceil(per_page) as u32);

        Ok(Page { items, total_pages })
    }
}

#[async_trait]
impl CiApiClient for MockCiApiClient {
    async fn list_variables(&self, page: u32, per_page: u32) -> Result<Page<Variable>, ApiError> {
        self.record(ApiCall::ListVariables(page, per_page));
        let all = lock(&self.state).variables.clone();
        self.page(&all, page, per_page)
    }

    async fn update_variable(
        &self,
        key: &str,
        value: &str,
        environment_scope: &str,
    ) -> Result<(), ApiError> {
        self.record(ApiCall::UpdateVariable(
            key.to_string(),
            value.to_string(),
            environment_scope.to_string(),
        ));
        if let Some(status) = self.failing_keys.get(key) {
            return Err(ApiError::with_status(*status, format!("{status} update refused")));
        }

        let mut state = lock(&self.state);
        match state
            .variables
            .iter_mut()
            .find(|v| v.key == key && v.environment_scope == environment_scope)
        {
            Some(existing) => {
                existing.value = Some(value.to_string());
                Ok(())
            }
            None => Err(ApiError::with_status(
                404,
                "{\"message\":\"404 Variable Not Found\"}",
            )),
        }
    }

    async fn create_variable(
        &self,
        key: &str,
        value: &str,
        environment_scope: &str,
    ) -> Result<(), ApiError> {
        self.record(ApiCall::CreateVariable(
            key.to_string(),
            value.to_string(),
            environment_scope.to_string(),
        ));
        if let Some(status) = self.failing_creates.get(key) {
            return Err(ApiError::with_status(*status, format!("{status} create refused")));
        }

        lock(&self.state)
            .variables
            .push(variable(key, value, environment_scope));
        Ok(())
    }

    async fn delete_variable(&self, key: &str, environment_scope: &str) -> Result<(), ApiError> {
        self.record(ApiCall::DeleteVariable(
            key.to_string(),
            environment_scope.to_string(),
        ));
        if let Some(status) = self.failing_keys.get(key) {
            return Err(ApiError::with_status(*status, format!("{status} delete refused")));
        }

        let mut state = lock(&self.state);
        let before = state.variables.len();
        state
            .variables
            .retain(|v| !(v.key == key && v.environment_scope == environment_scope));
        if state.variables.len() == before {
            return Err(ApiError::with_status(404, "404 Variable Not Found"));
        }
        Ok(())
    }

    async fn list_pipelines(&self, page: u32, per_page: u32) -> Result<Page<Pipeline>, ApiError> {
        self.record(ApiCall::ListPipelines(page, per_page));
        let all = lock(&self.state).pipelines.clone();
        self.page(&all, page, per_page)
    }

    async fn delete_pipeline(&self, pipeline_id: u64) -> Result<(), ApiError> {
        self.record(ApiCall::DeletePipeline(pipeline_id));
        if self.failing_pipelines.contains(&pipeline_id) {
            return Err(ApiError::with_status(500, "500 Internal Server Error"));
        }

        lock(&self.state).pipelines.retain(|p| p.id != pipeline_id);
        Ok(())
    }
}

/// Runtime that records pauses instead of waiting
#[derive(Default)]
pub struct RecordingRuntime {
    timeline: Timeline,
    sleeps: Mutex<Vec<Duration>>,
    interrupt_after_ticks: Option<usize>,
    ticks: Mutex<usize>,
}

impl RecordingRuntime {
    /// A runtime with its own timeline
    pub fn new() -> Self {
        Self::default()
    }

    /// A runtime writing to an existing timeline
    pub fn with_timeline(timeline: Timeline) -> Self {
        Self {
            timeline,
            ..Self::default()
        }
    }

    /// Simulate Ctrl-C after `ticks` completed countdown ticks
    pub const fn interrupting_after(mut self, ticks: usize) -> Self {
        self.interrupt_after_ticks = Some(ticks);
        self
    }

    /// Durations passed to `sleep`
    pub fn sleeps(&self) -> Vec<Duration> {
        lock(&self.sleeps).clone()
    }

    /// Number of countdown ticks waited
    pub fn ticks(&self) -> usize {
        *lock(&self.ticks)
    }

    /// Everything recorded on this runtime's timeline
    pub fn timeline(&self) -> Vec<String> {
        lock(&self.timeline).clone()
    }
}

#[async_trait]
impl AsyncRuntime for RecordingRuntime {
    async fn sleep(&self, duration: Duration) {
        lock(&self.timeline).push(format!("sleep {}ms", duration.as_millis()));
        lock(&self.sleeps).push(duration);
    }

    async fn sleep_unless_interrupted(&self, _duration: Duration) -> WaitOutcome {
        let mut ticks = lock(&self.ticks);
        if self.interrupt_after_ticks == Some(*ticks) {
            return WaitOutcome::Interrupted;
        }
        *ticks += 1;
        WaitOutcome::Elapsed
    }

    fn exit_on_interrupt(&self, message: &str) {
        lock(&self.timeline).push(format!("exit on interrupt: {message}"));
    }
}

/// Build a variable as the API would return it
pub fn variable(key: &str, value: &str, scope: &str) -> Variable {
    Variable {
        key: key.to_string(),
        value: Some(value.to_string()),
        environment_scope: scope.to_string(),
        protected: false,
        masked: false,
        variable_type: "env_var".to_string(),
    }
}

/// Build a pipeline with the given id
pub fn pipeline(id: u64) -> Pipeline {
    Pipeline {
        id,
        iid: Some(id),
        status: "success".to_string(),
        git_ref: Some("main".to_string()),
        sha: None,
        web_url: None,
    }
}

/// Settings for `operation` against project `42`, environment `staging`,
/// with no countdown and no delay
pub fn test_settings(operation: Operation) -> Settings {
    let raw = RawSettings {
        token: Some("test-token".to_string()),
        project_id: Some("42".to_string()),
        environment: Some("staging".to_string()),
        confirm_delay_secs: Some("0".to_string()),
        delay_ms: Some("0".to_string()),
        ..RawSettings::default()
    };
    Settings::resolve(raw, operation).expect("test settings are valid")
}
