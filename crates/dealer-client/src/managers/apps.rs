use std::path::Path;
use std::sync::Arc;

use reqwest::multipart::Form;
use serde_json::{Value, json};

use super::file_part;
use crate::error::Result;
use crate::http::HttpClient;

/// Applications installed in a workspace, plus their sources,
/// destinations, status, config and package managers.
#[derive(Debug, Clone)]
pub struct AppManager {
    http: Arc<HttpClient>,
}

impl AppManager {
    /// Create a manager over the shared client.
    pub const fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// The shared HTTP client.
    pub const fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }

    fn app_path(workspace: &str, app: &str) -> String {
        format!("/workspace/{workspace}/application/{app}")
    }

    /// List applications of a workspace.
    pub async fn list(&self, workspace: &str) -> Result<Value> {
        self.http
            .get(&format!("/workspace/{workspace}/application"))
            .await
    }

    /// Fetch one application.
    pub async fn get(&self, workspace: &str, app: &str) -> Result<Value> {
        self.http.get(&Self::app_path(workspace, app)).await
    }

    /// Upload a local file into one of the application's destinations.
    pub async fn upload_file(
        &self,
        workspace: &str,
        app: &str,
        destination: &str,
        file: &Path,
    ) -> Result<Value> {
        let form = Form::new().part("file", file_part(file)?);
        let path = format!("{}/upload/{destination}", Self::app_path(workspace, app));
        self.http.post_multipart(&path, form).await
    }

    /// List data destinations (volumes the app writes to).
    pub async fn destinations(&self, workspace: &str, app: &str) -> Result<Value> {
        let path = format!("{}/destinations", Self::app_path(workspace, app));
        self.http.get(&path).await
    }

    /// Fetch one destination.
    pub async fn destination(&self, workspace: &str, app: &str, name: &str) -> Result<Value> {
        let path = format!("{}/destinations/{name}", Self::app_path(workspace, app));
        self.http.get(&path).await
    }

    /// List data sources.
    pub async fn sources(&self, workspace: &str, app: &str) -> Result<Value> {
        let path = format!("{}/sources", Self::app_path(workspace, app));
        self.http.get(&path).await
    }

    /// Fetch one source.
    pub async fn source(&self, workspace: &str, app: &str, name: &str) -> Result<Value> {
        let path = format!("{}/sources/{name}", Self::app_path(workspace, app));
        self.http.get(&path).await
    }

    /// Component status list.
    pub async fn statuses(&self, workspace: &str, app: &str) -> Result<Value> {
        let path = format!("{}/status", Self::app_path(workspace, app));
        self.http.get(&path).await
    }

    /// Status of one component.
    pub async fn status(&self, workspace: &str, app: &str, component: &str) -> Result<Value> {
        let path = format!("{}/status/{component}", Self::app_path(workspace, app));
        self.http.get(&path).await
    }

    /// Full application configuration.
    pub async fn config(&self, workspace: &str, app: &str) -> Result<Value> {
        let path = format!("{}/config", Self::app_path(workspace, app));
        self.http.get(&path).await
    }

    /// Tasks declared in the application configuration.
    pub async fn config_tasks(&self, workspace: &str, app: &str) -> Result<Value> {
        let path = format!("{}/config/tasks", Self::app_path(workspace, app));
        self.http.get(&path).await
    }

    /// One task declared in the application configuration.
    pub async fn config_task(&self, workspace: &str, app: &str, task: &str) -> Result<Value> {
        let path = format!("{}/config/tasks/{task}", Self::app_path(workspace, app));
        self.http.get(&path).await
    }

    /// Install an application from a configuration document.
    pub async fn install(&self, workspace: &str, body: &Value) -> Result<Value> {
        self.http
            .post(&format!("/workspace/{workspace}/application"), body)
            .await
    }

    /// Delete an application. `force` also removes its data volumes.
    pub async fn delete(&self, workspace: &str, app: &str, force: bool) -> Result<Value> {
        let path = Self::app_path(workspace, app);
        if force {
            self.http.delete_query(&path, &[("force", "true")]).await
        } else {
            self.http.delete(&path).await
        }
    }

    /// Enable (start) an application.
    pub async fn enable(&self, workspace: &str, app: &str) -> Result<Value> {
        let path = format!("{}/enable", Self::app_path(workspace, app));
        self.http.post_empty(&path).await
    }

    /// Disable (stop) an application.
    pub async fn disable(&self, workspace: &str, app: &str) -> Result<Value> {
        let path = format!("{}/disable", Self::app_path(workspace, app));
        self.http.post_empty(&path).await
    }

    /// Install packages through one of the app's package managers
    /// (`pip`, `apt`, ...).
    pub async fn install_packages(
        &self,
        workspace: &str,
        app: &str,
        manager: &str,
        packages: &[String],
    ) -> Result<Value> {
        let path = format!("{}/packages/{manager}", Self::app_path(workspace, app));
        self.http.post(&path, &json!({ "packages": packages })).await
    }

    /// List package managers and their installed packages.
    pub async fn package_managers(&self, workspace: &str, app: &str) -> Result<Value> {
        let path = format!("{}/packages", Self::app_path(workspace, app));
        self.http.get(&path).await
    }

    /// Packages installed through one package manager.
    pub async fn package_manager(&self, workspace: &str, app: &str, manager: &str) -> Result<Value> {
        let path = format!("{}/packages/{manager}", Self::app_path(workspace, app));
        self.http.get(&path).await
    }
}
