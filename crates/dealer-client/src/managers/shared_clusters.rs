use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::http::HttpClient;

/// Shared clusters: those a workspace owns and those shared with it.
#[derive(Debug, Clone)]
pub struct SharedClusterManager {
    http: Arc<HttpClient>,
}

impl SharedClusterManager {
    /// Create a manager over the shared client.
    pub const fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// The shared HTTP client.
    pub const fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }

    /// Clusters shared with the workspace by others.
    pub async fn list_available(&self, workspace: &str) -> Result<Value> {
        self.http
            .get(&format!("/workspace/{workspace}/sharedclusters/available"))
            .await
    }

    /// Clusters the workspace shares.
    pub async fn list_own(&self, workspace: &str) -> Result<Value> {
        self.http
            .get(&format!("/workspace/{workspace}/sharedclusters"))
            .await
    }

    /// One available cluster.
    pub async fn get_available(&self, workspace: &str, cluster: &str) -> Result<Value> {
        self.http
            .get(&format!(
                "/workspace/{workspace}/sharedclusters/available/{cluster}"
            ))
            .await
    }

    /// One owned cluster.
    pub async fn get_own(&self, workspace: &str, cluster: &str) -> Result<Value> {
        self.http
            .get(&format!("/workspace/{workspace}/sharedclusters/{cluster}"))
            .await
    }

    /// Drop access to a cluster shared with the workspace.
    pub async fn delete_available(&self, workspace: &str, cluster: &str) -> Result<Value> {
        self.http
            .delete(&format!(
                "/workspace/{workspace}/sharedclusters/available/{cluster}"
            ))
            .await
    }

    /// Stop sharing an owned cluster.
    pub async fn delete_own(&self, workspace: &str, cluster: &str) -> Result<Value> {
        self.http
            .delete(&format!("/workspace/{workspace}/sharedclusters/{cluster}"))
            .await
    }
}
