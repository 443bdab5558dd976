//! HTTP client bound to one base URL and one shared session.

use std::sync::Arc;

use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::session::Session;

/// Thin request helper used by every resource manager.
///
/// Immutable after construction. The [`Session`] is shared, so it may
/// outlive any particular `HttpClient`.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    session: Arc<Session>,
}

impl HttpClient {
    /// Bind a session to a base URL. A trailing `/` is dropped.
    pub fn new(base_url: impl Into<String>, session: Arc<Session>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url, session }
    }

    /// Base URL every path is joined to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The shared session.
    pub const fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Absolute URL for an API path such as `/workspace`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `GET` a JSON document.
    pub async fn get(&self, path: &str) -> Result<Value> {
        let response = self.send(self.request(Method::GET, path)).await?;
        decode(response).await
    }

    /// `GET` a JSON document with query parameters.
    pub async fn get_query<Q: Serialize + ?Sized>(&self, path: &str, query: &Q) -> Result<Value> {
        let response = self
            .send(self.request(Method::GET, path).query(query))
            .await?;
        decode(response).await
    }

    /// `GET` a plain-text body.
    pub async fn get_text(&self, path: &str) -> Result<String> {
        let response = self.send(self.request(Method::GET, path)).await?;
        Ok(response.text().await?)
    }

    /// `GET` a binary body.
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let response = self.send(self.request(Method::GET, path)).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// `POST` a JSON body.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let response = self.send(self.request(Method::POST, path).json(body)).await?;
        decode(response).await
    }

    /// `POST` with no body, used for state-changing actions.
    pub async fn post_empty(&self, path: &str) -> Result<Value> {
        let response = self.send(self.request(Method::POST, path)).await?;
        decode(response).await
    }

    /// `POST` a multipart form.
    pub async fn post_multipart(&self, path: &str, form: Form) -> Result<Value> {
        let response = self
            .send(self.request(Method::POST, path).multipart(form))
            .await?;
        decode(response).await
    }

    /// `PUT` a JSON body.
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let response = self.send(self.request(Method::PUT, path).json(body)).await?;
        decode(response).await
    }

    /// `DELETE` a resource.
    pub async fn delete(&self, path: &str) -> Result<Value> {
        let response = self.send(self.request(Method::DELETE, path)).await?;
        decode(response).await
    }

    /// `DELETE` a resource with query parameters.
    pub async fn delete_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Value> {
        let response = self
            .send(self.request(Method::DELETE, path).query(query))
            .await?;
        decode(response).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        trace!(%method, url = %url, "building request");
        self.session.http().request(method, url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "response");

        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_else(|e| {
                warn!(status = status.as_u16(), error = %e, "failed to read error response body");
                String::new()
            });
            Err(Error::Api {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// Empty bodies decode to `null`; anything else must be JSON.
async fn decode(response: Response) -> Result<Value> {
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
}
