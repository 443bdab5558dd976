//! Global command-line flags, parsed with clap.
//!
//! Everything from the command name on is handed to that command's own
//! parser, which also accepts the global options in [`TrailingFlags`]. Values
//! given after the command name take precedence over the ones before it.

use std::path::PathBuf;

use clap::{ArgAction, Args, CommandFactory, Parser, ValueEnum};

/// Command-line interface to the Dealer APIs.
#[derive(Parser, Debug, Clone)]
#[command(name = "dealer", version, about, long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Show program's version number and exit.
    #[arg(long, action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,

    /// Increase verbosity of output. Can be repeated.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress output except warnings and errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Show this help message and exit.
    #[arg(short, long)]
    pub help: bool,

    /// Show full error details on failure.
    #[arg(long)]
    pub debug: bool,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Connection and authentication options.
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Command to run, followed by its arguments.
    #[arg(value_name = "COMMAND", trailing_var_arg = true)]
    pub command: Vec<String>,
}

/// Flags feeding the configuration resolver. Each falls back to an
/// environment variable, then to the config file.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionArgs {
    /// Config containing url, user/pass/token parameters.
    /// Default "~/.kuberlab/config" (Env: `DEALER_CONFIG`).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Dealer API base url (Env: `DEALER_URL`).
    #[arg(long = "dealer-url", value_name = "URL")]
    pub dealer_url: Option<String>,

    /// Authentication username (Env: `DEALER_USERNAME`).
    #[arg(long)]
    pub username: Option<String>,

    /// Authentication password (Env: `DEALER_PASSWORD`).
    #[arg(long)]
    pub password: Option<String>,

    /// Disables SSL/TLS certificate verification (Env: `DEALER_CLIENT_INSECURE`).
    #[arg(long)]
    pub insecure: bool,

    /// API token used to authenticate in cloud-dealer (Env: `DEALER_TOKEN`).
    #[arg(long)]
    pub token: Option<String>,
}

impl ConnectionArgs {
    /// Overlay `later` onto `self`: set values in `later` win.
    #[must_use]
    pub fn overlay(self, later: Self) -> Self {
        Self {
            config: later.config.or(self.config),
            dealer_url: later.dealer_url.or(self.dealer_url),
            username: later.username.or(self.username),
            password: later.password.or(self.password),
            insecure: self.insecure || later.insecure,
            token: later.token.or(self.token),
        }
    }
}

/// Global options also accepted after the command name.
///
/// `-h` and `--version` are left out: after the command they belong to the
/// command itself.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
#[command(next_help_heading = "Global options")]
pub struct TrailingFlags {
    /// Increase verbosity of output. Can be repeated.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress output except warnings and errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Show full error details on failure.
    #[arg(long)]
    pub debug: bool,

    /// Output format.
    #[arg(short, long, value_enum)]
    pub format: Option<Format>,

    /// Connection and authentication options.
    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
    /// YAML output.
    Yaml,
}

impl Cli {
    /// Effective verbosity: starts at 1, each `-v` adds one, `-q` forces 0.
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }

    /// Fold in global options given after the command name.
    pub fn absorb(&mut self, trailing: TrailingFlags) {
        self.verbose = self.verbose.saturating_add(trailing.verbose);
        self.quiet |= trailing.quiet;
        self.debug |= trailing.debug;
        if let Some(format) = trailing.format {
            self.format = format;
        }
        self.connection = std::mem::take(&mut self.connection).overlay(trailing.connection);
    }

    /// Name of the selected command, if any.
    pub fn command_name(&self) -> Option<&str> {
        self.command.first().map(String::as_str)
    }

    /// Arguments following the command name.
    pub fn command_args(&self) -> &[String] {
        self.command.get(1..).unwrap_or_default()
    }
}

/// Every global flag string (`-v`, `--verbose`, ...), sorted.
pub fn global_flag_strings() -> Vec<String> {
    let cmd = Cli::command();
    let mut flags: Vec<String> = cmd
        .get_arguments()
        .filter(|arg| !arg.is_positional())
        .flat_map(|arg| {
            let short = arg.get_short().map(|c| format!("-{c}"));
            let long = arg.get_long().map(|l| format!("--{l}"));
            short.into_iter().chain(long)
        })
        .collect();
    flags.sort();
    flags.dedup();
    flags
}

/// Rendered usage and option list of the global parser.
pub fn render_global_help() -> String {
    Cli::command().render_help().to_string()
}
