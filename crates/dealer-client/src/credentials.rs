//! Credential shapes accepted by the session factory.

use std::fmt;

/// How the client proves its identity to the Dealer API.
///
/// Exactly one shape is chosen from the raw inputs: a non-empty token wins,
/// then a complete username/password pair. Anything else is [`Credentials::None`],
/// which the session factory rejects.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// API token sent as `Authorization: Bearer <token>`.
    Token(String),
    /// Login exchanged once against `/auth/login`.
    Password {
        /// Login name or e-mail.
        username: String,
        /// Account password.
        password: String,
    },
    /// No usable credential source.
    None,
}

impl Credentials {
    /// Pick the credential shape from optional raw values. Empty strings
    /// count as absent.
    pub fn from_parts(
        username: Option<&str>,
        password: Option<&str>,
        token: Option<&str>,
    ) -> Self {
        fn present(v: Option<&str>) -> Option<&str> {
            v.filter(|s| !s.is_empty())
        }

        if let Some(token) = present(token) {
            return Self::Token(token.to_string());
        }
        match (present(username), present(password)) {
            (Some(username), Some(password)) => Self::Password {
                username: username.to_string(),
                password: password.to_string(),
            },
            _ => Self::None,
        }
    }

    /// Whether a usable shape was resolved.
    pub const fn is_present(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(_) => f.debug_tuple("Token").field(&"<redacted>").finish(),
            Self::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::None => f.write_str("None"),
        }
    }
}
