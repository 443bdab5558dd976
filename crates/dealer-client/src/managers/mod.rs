//! Typed facades over the Dealer API, one per resource domain.
//!
//! Every manager holds the same [`HttpClient`](crate::http::HttpClient)
//! and issues exactly one HTTP call per operation. Payloads are passed
//! through as [`serde_json::Value`]; the managers own the URL layout only.

mod app_tasks;
mod apps;
mod charts;
mod organizations;
mod projects;
mod shared_clusters;
mod workspaces;

use std::path::Path;

use reqwest::multipart::Part;

use crate::error::{Error, Result};

pub use app_tasks::AppTaskManager;
pub use apps::AppManager;
pub use charts::{ChartManager, LATEST_VERSION};
pub use organizations::OrganizationManager;
pub use projects::ProjectManager;
pub use shared_clusters::SharedClusterManager;
pub use workspaces::WorkspaceManager;

/// Read a local file into a multipart part named after the file.
pub(crate) fn file_part(path: &Path) -> Result<Part> {
    let data = std::fs::read(path).map_err(|source| Error::File {
        path: path.display().to_string(),
        source,
    })?;
    let name = path
        .file_name()
        .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
    Ok(Part::bytes(data).file_name(name))
}
