use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::http::HttpClient;

/// Workspaces visible to the authenticated account.
#[derive(Debug, Clone)]
pub struct WorkspaceManager {
    http: Arc<HttpClient>,
}

impl WorkspaceManager {
    /// Create a manager over the shared client.
    pub const fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// The shared HTTP client.
    pub const fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }

    /// List workspaces.
    pub async fn list(&self) -> Result<Value> {
        self.http.get("/workspace").await
    }

    /// Fetch one workspace.
    pub async fn get(&self, workspace: &str) -> Result<Value> {
        self.http.get(&format!("/workspace/{workspace}")).await
    }
}
