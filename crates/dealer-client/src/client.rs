//! Composition root: one HTTP client, one manager per resource domain.

use std::sync::Arc;

use reqwest::Url;
use tracing::debug;

use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::managers::{
    AppManager, AppTaskManager, ChartManager, OrganizationManager, ProjectManager,
    SharedClusterManager, WorkspaceManager,
};
use crate::session::{Session, create_session};

/// Base URL used when no source supplies one.
pub const DEFAULT_BASE_URL: &str = "https://go.kuberlab.io/api/v0.2";

/// Dealer API client.
///
/// Every manager references the same [`HttpClient`], which in turn shares
/// the single [`Session`] of the run.
#[derive(Debug, Clone)]
pub struct Client {
    http: Arc<HttpClient>,
    /// Workspaces.
    pub workspaces: WorkspaceManager,
    /// Organizations.
    pub organizations: OrganizationManager,
    /// Projects.
    pub projects: ProjectManager,
    /// Applications.
    pub apps: AppManager,
    /// Application task runs.
    pub app_tasks: AppTaskManager,
    /// Shared clusters.
    pub shared_clusters: SharedClusterManager,
    /// Charts and catalog.
    pub charts: ChartManager,
}

impl Client {
    /// Build the client around an existing session. An absent or empty
    /// `base_url` selects [`DEFAULT_BASE_URL`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the URL is not an absolute
    /// `http`/`https` URL.
    pub fn new(session: Arc<Session>, base_url: Option<&str>) -> Result<Self> {
        let base_url = effective_base_url(base_url);
        validate_base_url(base_url)?;

        let http = Arc::new(HttpClient::new(base_url, session));
        debug!(base_url = %http.base_url(), "creating resource managers");

        Ok(Self {
            workspaces: WorkspaceManager::new(Arc::clone(&http)),
            organizations: OrganizationManager::new(Arc::clone(&http)),
            projects: ProjectManager::new(Arc::clone(&http)),
            apps: AppManager::new(Arc::clone(&http)),
            app_tasks: AppTaskManager::new(Arc::clone(&http)),
            shared_clusters: SharedClusterManager::new(Arc::clone(&http)),
            charts: ChartManager::new(Arc::clone(&http)),
            http,
        })
    }

    /// Create the session and the client in one step.
    ///
    /// # Errors
    ///
    /// Propagates [`create_session`] and [`Client::new`] failures.
    pub async fn connect(
        base_url: Option<&str>,
        credentials: &Credentials,
        insecure: bool,
    ) -> Result<Self> {
        let base_url = effective_base_url(base_url);
        validate_base_url(base_url)?;
        let session = create_session(base_url, credentials, insecure).await?;
        Self::new(Arc::new(session), Some(base_url))
    }

    /// The HTTP client shared by all managers.
    pub const fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }
}

fn effective_base_url(base_url: Option<&str>) -> &str {
    base_url.filter(|u| !u.is_empty()).unwrap_or(DEFAULT_BASE_URL)
}

fn validate_base_url(base_url: &str) -> Result<()> {
    let url = Url::parse(base_url)
        .map_err(|e| Error::invalid_parameter(format!("dealer url '{base_url}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::invalid_parameter(format!(
            "dealer url must use http or https, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn session() -> Arc<Session> {
        Arc::new(
            create_session(DEFAULT_BASE_URL, &Credentials::Token("t".into()), false)
                .await
                .expect("session"),
        )
    }

    #[tokio::test]
    async fn all_managers_share_one_http_client() {
        let client = Client::new(session().await, Some("http://dealer.local/api")).expect("client");
        let shared = client.http();

        assert!(Arc::ptr_eq(shared, client.workspaces.http()));
        assert!(Arc::ptr_eq(shared, client.organizations.http()));
        assert!(Arc::ptr_eq(shared, client.projects.http()));
        assert!(Arc::ptr_eq(shared, client.apps.http()));
        assert!(Arc::ptr_eq(shared, client.app_tasks.http()));
        assert!(Arc::ptr_eq(shared, client.shared_clusters.http()));
        assert!(Arc::ptr_eq(shared, client.charts.http()));
        // client.http + seven managers
        assert_eq!(Arc::strong_count(shared), 8);
    }

    #[tokio::test]
    async fn default_base_url_when_absent_or_empty() {
        let client = Client::new(session().await, None).expect("client");
        assert_eq!(client.http().base_url(), DEFAULT_BASE_URL);

        let client = Client::new(session().await, Some("")).expect("client");
        assert_eq!(client.http().base_url(), DEFAULT_BASE_URL);
    }

    #[tokio::test]
    async fn rejects_non_http_url() {
        let err = Client::new(session().await, Some("ftp://dealer")).expect_err("should fail");
        assert!(matches!(err, Error::InvalidParameter { .. }));

        let err = Client::new(session().await, Some("not a url")).expect_err("should fail");
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }

    #[tokio::test]
    async fn connect_with_token_is_offline() {
        let client = Client::connect(
            Some("http://127.0.0.1:1"),
            &Credentials::Token("t".into()),
            false,
        )
        .await
        .expect("client");
        assert_eq!(client.http().base_url(), "http://127.0.0.1:1");
    }
}
