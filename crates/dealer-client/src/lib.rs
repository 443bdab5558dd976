//! # dealer-client
//!
//! Client library for the Dealer platform API (workspaces, organizations,
//! projects, applications, tasks, shared clusters, charts).
//!
//! # Architecture
//!
//! ```text
//! Credentials ──► create_session ──► Session ─(Arc)─► HttpClient ─(Arc)─► managers
//!                  (token: local,                      base_url            workspaces
//!                   password: 1 login call)                                 apps, charts, ...
//! ```
//!
//! The [`Client`] builds one [`HttpClient`] around one [`Session`] and hands
//! the same instance to every resource manager.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod credentials;
pub mod error;
pub mod http;
pub mod managers;
pub mod session;

pub use client::{Client, DEFAULT_BASE_URL};
pub use credentials::Credentials;
pub use error::{Error, Result};
pub use http::HttpClient;
pub use session::{AuthScheme, LOGIN_PATH, Session, create_session};
