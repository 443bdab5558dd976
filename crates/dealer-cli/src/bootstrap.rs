//! Configuration and session bootstrap.
//!
//! The shell reaches configuration and the login endpoint only through
//! [`Bootstrap`], so the paths that must work without credentials can be
//! checked for never calling it.

use async_trait::async_trait;
use dealer_client::Client;
use tracing::{debug, info};

use crate::cli::ConnectionArgs;
use crate::config::{ConfigResolver, EffectiveConfig, EnvVars};
use crate::error::CliError;

/// Resolves configuration and opens an authenticated client.
#[async_trait]
pub trait Bootstrap: Send + Sync {
    /// Merge flags, environment and config file.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured value is unusable.
    fn resolve(&self, flags: &ConnectionArgs) -> Result<EffectiveConfig, CliError>;

    /// Create the session and the client for `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or login fails.
    async fn connect(&self, config: &EffectiveConfig) -> Result<Client, CliError>;
}

/// Bootstrap against the real environment and API.
#[derive(Debug, Clone, Default)]
pub struct PlatformBootstrap {
    env: EnvVars,
}

impl PlatformBootstrap {
    /// Bootstrap reading the given environment snapshot.
    #[must_use]
    pub const fn new(env: EnvVars) -> Self {
        Self { env }
    }
}

#[async_trait]
impl Bootstrap for PlatformBootstrap {
    fn resolve(&self, flags: &ConnectionArgs) -> Result<EffectiveConfig, CliError> {
        ConfigResolver::new(&self.env).resolve(flags)
    }

    async fn connect(&self, config: &EffectiveConfig) -> Result<Client, CliError> {
        let credentials = config.credentials();
        debug!(base_url = %config.base_url, ?credentials, insecure = config.insecure, "creating session");
        let client = Client::connect(Some(&config.base_url), &credentials, config.insecure).await?;
        info!(base_url = %config.base_url, "session ready");
        Ok(client)
    }
}
