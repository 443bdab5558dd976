use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::http::HttpClient;

/// Organization CRUD.
#[derive(Debug, Clone)]
pub struct OrganizationManager {
    http: Arc<HttpClient>,
}

impl OrganizationManager {
    /// Create a manager over the shared client.
    pub const fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// The shared HTTP client.
    pub const fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }

    /// List organizations.
    pub async fn list(&self) -> Result<Value> {
        self.http.get("/org").await
    }

    /// Fetch one organization.
    pub async fn get(&self, org: &str) -> Result<Value> {
        self.http.get(&format!("/org/{org}")).await
    }

    /// Create an organization.
    pub async fn create(&self, body: &Value) -> Result<Value> {
        self.http.post("/org", body).await
    }

    /// Update an organization.
    pub async fn update(&self, org: &str, body: &Value) -> Result<Value> {
        self.http.put(&format!("/org/{org}"), body).await
    }

    /// Delete an organization.
    pub async fn delete(&self, org: &str) -> Result<Value> {
        self.http.delete(&format!("/org/{org}")).await
    }
}
