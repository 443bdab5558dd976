//! # dealer-cli
//!
//! Command-line interface to the Dealer platform.
//!
//! Provides:
//! - Configuration resolution (flags, `DEALER_*` environment, config file)
//! - Session bootstrap through [`dealer_client`]
//! - A flat command namespace (`workspace-list`, `app-task-run`, ...)
//! - Shell completion that works without credentials
//!
//! # Architecture
//!
//! ```text
//! argv ──► Shell ──► CommandRegistry ──► CommandHandler ──► Client managers
//!            │                                                  ▲
//!            └──► Bootstrap (ConfigResolver + login) ───────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bootstrap;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod registry;
pub mod shell;

pub use bootstrap::{Bootstrap, PlatformBootstrap};
pub use cli::{Cli, ConnectionArgs, Format};
pub use config::{ConfigResolver, EffectiveConfig, EnvVars};
pub use error::CliError;
pub use output::OutputFormat;
pub use registry::CommandRegistry;
pub use shell::Shell;
