use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::http::HttpClient;

/// Task runs ("builds") of an application.
#[derive(Debug, Clone)]
pub struct AppTaskManager {
    http: Arc<HttpClient>,
}

impl AppTaskManager {
    /// Create a manager over the shared client.
    pub const fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// The shared HTTP client.
    pub const fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }

    fn tasks_path(workspace: &str, app: &str) -> String {
        format!("/workspace/{workspace}/application/{app}/tasks")
    }

    fn build_path(workspace: &str, app: &str, task: &str, build: &str) -> String {
        format!("{}/{task}/{build}", Self::tasks_path(workspace, app))
    }

    /// List task runs of an application.
    pub async fn list(&self, workspace: &str, app: &str) -> Result<Value> {
        self.http.get(&Self::tasks_path(workspace, app)).await
    }

    /// Fetch one task run.
    pub async fn get(&self, workspace: &str, app: &str, task: &str, build: &str) -> Result<Value> {
        self.http
            .get(&Self::build_path(workspace, app, task, build))
            .await
    }

    /// Pods backing a task run.
    pub async fn pods(&self, workspace: &str, app: &str, task: &str, build: &str) -> Result<Value> {
        let path = format!("{}/pods", Self::build_path(workspace, app, task, build));
        self.http.get(&path).await
    }

    /// Logs of one pod of a task run, as plain text.
    pub async fn logs(
        &self,
        workspace: &str,
        app: &str,
        task: &str,
        build: &str,
        pod: &str,
    ) -> Result<String> {
        let path = format!(
            "{}/pods/{pod}/logs",
            Self::build_path(workspace, app, task, build)
        );
        self.http.get_text(&path).await
    }

    /// Start a new run of a configured task.
    pub async fn run(&self, workspace: &str, app: &str, task: &str) -> Result<Value> {
        let path = format!("{}/{task}/run", Self::tasks_path(workspace, app));
        self.http.post_empty(&path).await
    }

    /// Create a task run from an explicit task document.
    pub async fn create(&self, workspace: &str, app: &str, body: &Value) -> Result<Value> {
        self.http
            .post(&Self::tasks_path(workspace, app), body)
            .await
    }

    /// Delete a task run.
    pub async fn delete(&self, workspace: &str, app: &str, task: &str, build: &str) -> Result<Value> {
        self.http
            .delete(&Self::build_path(workspace, app, task, build))
            .await
    }
}
