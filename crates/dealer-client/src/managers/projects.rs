use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::http::HttpClient;

/// Projects inside a workspace.
#[derive(Debug, Clone)]
pub struct ProjectManager {
    http: Arc<HttpClient>,
}

impl ProjectManager {
    /// Create a manager over the shared client.
    pub const fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// The shared HTTP client.
    pub const fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }

    /// List projects of a workspace.
    pub async fn list(&self, workspace: &str) -> Result<Value> {
        self.http.get(&format!("/workspace/{workspace}/projects")).await
    }

    /// Fetch one project.
    pub async fn get(&self, workspace: &str, project: &str) -> Result<Value> {
        self.http
            .get(&format!("/workspace/{workspace}/projects/{project}"))
            .await
    }

    /// Create a project.
    pub async fn create(&self, workspace: &str, body: &Value) -> Result<Value> {
        self.http
            .post(&format!("/workspace/{workspace}/projects"), body)
            .await
    }

    /// Update a project.
    pub async fn update(&self, workspace: &str, project: &str, body: &Value) -> Result<Value> {
        self.http
            .put(&format!("/workspace/{workspace}/projects/{project}"), body)
            .await
    }

    /// Delete a project.
    pub async fn delete(&self, workspace: &str, project: &str) -> Result<Value> {
        self.http
            .delete(&format!("/workspace/{workspace}/projects/{project}"))
            .await
    }
}
