//! Session bootstrap.
//!
//! A [`Session`] is the authenticated transport shared by every request of
//! one process run. It is built exactly once by [`create_session`]:
//!
//! - token credentials attach an `Authorization: Bearer` default header and
//!   never touch the network;
//! - username/password credentials perform a single `POST /auth/login` and
//!   keep whatever cookies the response sets;
//! - anything else fails before a request is attempted.
//!
//! No retry is performed on the login call.

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::credentials::Credentials;
use crate::error::{Error, Result};

/// Path of the login endpoint, relative to the base URL.
pub const LOGIN_PATH: &str = "/auth/login";

/// How an established session authenticates its requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// Static bearer token header.
    Bearer,
    /// Cookies obtained from the login exchange.
    Login,
}

/// Authenticated transport handle.
#[derive(Debug, Clone)]
pub struct Session {
    http: reqwest::Client,
    scheme: AuthScheme,
}

impl Session {
    /// The underlying HTTP client carrying auth headers and cookies.
    pub const fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The authentication scheme this session was built with.
    pub const fn scheme(&self) -> AuthScheme {
        self.scheme
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    #[serde(rename = "LoginOrEmail")]
    login_or_email: &'a str,
    #[serde(rename = "Password")]
    password: &'a str,
}

/// Build the session for one process run.
///
/// `insecure` disables TLS certificate verification on the transport.
///
/// # Errors
///
/// - [`Error::InvalidParameter`] when no credential shape is present or the
///   token cannot be used as a header value;
/// - [`Error::Authentication`] when the login endpoint answers non-200;
/// - [`Error::LoginUnreachable`] when the login request cannot complete.
pub async fn create_session(
    base_url: &str,
    credentials: &Credentials,
    insecure: bool,
) -> Result<Session> {
    match credentials {
        Credentials::Token(token) => token_session(token, insecure),
        Credentials::Password { username, password } => {
            login_session(base_url, username, password, insecure).await
        }
        Credentials::None => Err(Error::invalid_parameter(
            "provide either token or username and password",
        )),
    }
}

fn builder(insecure: bool) -> reqwest::ClientBuilder {
    let builder = reqwest::Client::builder()
        .user_agent(concat!("dealer-client/", env!("CARGO_PKG_VERSION")));
    if insecure {
        builder.danger_accept_invalid_certs(true)
    } else {
        builder
    }
}

fn token_session(token: &str, insecure: bool) -> Result<Session> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| Error::invalid_parameter("token contains characters not allowed in a header"))?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);

    let http = builder(insecure).default_headers(headers).build()?;
    debug!(insecure, "created bearer token session");

    Ok(Session {
        http,
        scheme: AuthScheme::Bearer,
    })
}

async fn login_session(
    base_url: &str,
    username: &str,
    password: &str,
    insecure: bool,
) -> Result<Session> {
    let http = builder(insecure).cookie_store(true).build()?;
    let url = format!("{}{LOGIN_PATH}", base_url.trim_end_matches('/'));

    debug!(url = %url, username, "logging in");
    let response = http
        .post(&url)
        .json(&LoginRequest {
            login_or_email: username,
            password,
        })
        .send()
        .await
        .map_err(Error::LoginUnreachable)?;

    let status = response.status();
    if status != StatusCode::OK {
        let body = response.text().await.unwrap_or_else(|e| {
            warn!(status = status.as_u16(), error = %e, "failed to read login response body");
            String::new()
        });
        return Err(Error::Authentication {
            status: status.as_u16(),
            body,
        });
    }

    info!(username, "authenticated");
    Ok(Session {
        http,
        scheme: AuthScheme::Login,
    })
}
