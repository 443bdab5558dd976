//! Error types for the Dealer API client.

use thiserror::Error;

/// Errors produced while authenticating against or calling the Dealer API.
#[derive(Debug, Error)]
pub enum Error {
    /// A connection parameter is missing or malformed. Raised before any
    /// network access.
    #[error("invalid parameter: {reason}")]
    InvalidParameter {
        /// Why the parameter was rejected.
        reason: String,
    },

    /// The login exchange was answered with a non-200 status.
    #[error("invalid auth ({status}): {body}")]
    Authentication {
        /// HTTP status returned by the login endpoint.
        status: u16,
        /// Raw response body, kept verbatim for diagnostics.
        body: String,
    },

    /// The login request itself could not be completed.
    #[error("invalid auth: login request failed")]
    LoginUnreachable(#[source] reqwest::Error),

    /// A resource call returned a non-success status.
    #[error("api request failed ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// A request could not be sent or its body could not be read.
    #[error("http transport error")]
    Transport(#[from] reqwest::Error),

    /// A response body was not the JSON document the call expected.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A local file used as a request payload could not be read.
    #[error("cannot read {path}")]
    File {
        /// The file that failed to open or read.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Shorthand for [`Error::InvalidParameter`].
    pub fn invalid_parameter(reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }

    /// True for failures of the authentication exchange.
    pub const fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::LoginUnreachable(_))
    }

    /// HTTP status attached to the error, when the server answered.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } | Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;
