//! CLI error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Exit code for fatal configuration, authentication, API and dispatch errors.
pub const EXIT_FAILURE: u8 = 1;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Session bootstrap or API call failed.
    #[error(transparent)]
    Client(#[from] dealer_client::Error),

    /// Resolved configuration is unusable.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// No handler is registered under the requested name.
    #[error("unknown command '{0}', see 'dealer help'")]
    UnknownCommand(String),

    /// Command arguments were rejected by the parser.
    #[error(transparent)]
    Usage(#[from] clap::Error),

    /// An argument value is unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A request document could not be read.
    #[error("cannot read {}", path.display())]
    Input {
        /// File that failed to open.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// A downloaded file could not be written.
    #[error("cannot write {}", path.display())]
    Output {
        /// Destination path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// A request document is not valid YAML or JSON.
    #[error("cannot parse {}", path.display())]
    Document {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_yaml::Error,
    },

    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code for this error. Usage errors keep the parser's code.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(e) => u8::try_from(e.exit_code()).unwrap_or(EXIT_FAILURE),
            _ => EXIT_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_error_display_unknown_command() {
        let err = CliError::UnknownCommand("wokspace-list".into());
        assert_eq!(err.to_string(), "unknown command 'wokspace-list', see 'dealer help'");
    }

    #[test]
    fn client_error_is_transparent() {
        let err = CliError::from(dealer_client::Error::Authentication {
            status: 401,
            body: "nope".into(),
        });
        assert_eq!(err.to_string(), "invalid auth (401): nope");
        assert_eq!(err.exit_code(), EXIT_FAILURE);
    }

    #[test]
    fn cli_error_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let cli_err = CliError::from(io_err);
        assert!(matches!(cli_err, CliError::Io(_)));
    }

    #[test]
    fn usage_error_keeps_parser_exit_code() {
        let err = clap::Command::new("x")
            .try_get_matches_from(["x", "--nope"])
            .expect_err("unknown flag");
        assert_eq!(CliError::from(err).exit_code(), 2);
    }
}
