use std::path::Path;
use std::sync::Arc;

use reqwest::multipart::Form;
use serde_json::Value;

use super::file_part;
use crate::error::Result;
use crate::http::HttpClient;

/// Version selector understood by the chart endpoints.
pub const LATEST_VERSION: &str = "latest";

/// Chart catalog and per-workspace charts.
#[derive(Debug, Clone)]
pub struct ChartManager {
    http: Arc<HttpClient>,
}

impl ChartManager {
    /// Create a manager over the shared client.
    pub const fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// The shared HTTP client.
    pub const fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }

    fn chart_path(workspace: &str, chart: &str) -> String {
        format!("/workspace/{workspace}/mlapp/{chart}")
    }

    fn version_path(workspace: &str, chart: &str, version: &str) -> String {
        format!("{}/versions/{version}", Self::chart_path(workspace, chart))
    }

    /// Search the public catalog.
    pub async fn catalog(&self, search: Option<&str>, limit: Option<u32>) -> Result<Value> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(search) = search {
            query.push(("search", search.to_string()));
        }
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        self.http.get_query("/catalog", &query).await
    }

    /// Charts of a workspace.
    pub async fn list(&self, workspace: &str) -> Result<Value> {
        self.http.get(&format!("/workspace/{workspace}/mlapp")).await
    }

    /// One chart.
    pub async fn get(&self, workspace: &str, chart: &str) -> Result<Value> {
        self.http.get(&Self::chart_path(workspace, chart)).await
    }

    /// Published versions of a chart.
    pub async fn versions(&self, workspace: &str, chart: &str) -> Result<Value> {
        let path = format!("{}/versions", Self::chart_path(workspace, chart));
        self.http.get(&path).await
    }

    /// Rendered chart YAML of one version.
    pub async fn yaml(&self, workspace: &str, chart: &str, version: &str) -> Result<String> {
        let path = format!("{}/yaml", Self::version_path(workspace, chart, version));
        self.http.get_text(&path).await
    }

    /// Default values file of one version.
    pub async fn values(&self, workspace: &str, chart: &str, version: &str) -> Result<String> {
        let path = format!("{}/values", Self::version_path(workspace, chart, version));
        self.http.get_text(&path).await
    }

    /// Chart archive of one version.
    pub async fn download(&self, workspace: &str, chart: &str, version: &str) -> Result<Vec<u8>> {
        let path = format!("{}/download", Self::version_path(workspace, chart, version));
        self.http.get_bytes(&path).await
    }

    /// Upload a packaged chart archive into a workspace.
    pub async fn create(&self, workspace: &str, archive: &Path) -> Result<Value> {
        let form = Form::new().part("chart", file_part(archive)?);
        self.http
            .post_multipart(&format!("/workspace/{workspace}/mlapp"), form)
            .await
    }

    /// Install a chart version as an application.
    pub async fn install(
        &self,
        workspace: &str,
        chart: &str,
        version: &str,
        body: &Value,
    ) -> Result<Value> {
        let path = format!("{}/install", Self::version_path(workspace, chart, version));
        self.http.post(&path, body).await
    }

    /// Delete a chart.
    pub async fn delete(&self, workspace: &str, chart: &str) -> Result<Value> {
        self.http.delete(&Self::chart_path(workspace, chart)).await
    }
}
