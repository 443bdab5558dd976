//! The `dealer` entry point: `run(argv) -> exit code`.
//!
//! ```text
//! parse global flags ─┬─ -h/--help ──────────► command listing, exit 0
//!                     ├─ bash-completion ────► names + flags, no config, no auth
//!                     └─ command ─► parse its args (+ trailing globals)
//!                                   ─► resolve ─► connect ─► run
//! ```

use std::error::Error as _;
use std::ffi::{OsStr, OsString};
use std::io::Write;

use clap::{ArgMatches, FromArgMatches, Parser};
use tracing::debug;
use tracing::instrument::WithSubscriber;

use crate::bootstrap::Bootstrap;
use crate::cli::{Cli, TrailingFlags};
use crate::commands::builtin::write_command_listing;
use crate::commands::{
    COMPLETION_COMMAND, CommandContext, CommandHandler, builtin_commands, command_parser, domain_commands,
};
use crate::error::{CliError, EXIT_FAILURE};
use crate::logging::LogContext;
use crate::output::OutputFormat;
use crate::registry::CommandRegistry;

/// Single entry point of the CLI.
#[derive(Debug, Clone)]
pub struct Shell<B> {
    bootstrap: B,
}

impl<B: Bootstrap> Shell<B> {
    /// Create a shell using `bootstrap` for configuration and login.
    #[must_use]
    pub const fn new(bootstrap: B) -> Self {
        Self { bootstrap }
    }

    /// The bootstrap in use.
    pub const fn bootstrap(&self) -> &B {
        &self.bootstrap
    }

    /// Run one invocation on a current-thread runtime and return its exit
    /// code. `argv` includes the program name.
    pub fn run<I, T>(&self, argv: I, out: &mut (dyn Write + Send), err: &mut (dyn Write + Send)) -> u8
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
            Ok(rt) => rt,
            Err(e) => {
                let _ = writeln!(err, "error: failed to create async runtime: {e}");
                return EXIT_FAILURE;
            }
        };
        runtime.block_on(self.run_async(argv, out, err))
    }

    /// Async body of [`Shell::run`].
    pub async fn run_async<I, T>(&self, argv: I, out: &mut (dyn Write + Send), err: &mut (dyn Write + Send)) -> u8
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
        let completion = argv
            .iter()
            .skip(1)
            .any(|arg| arg.as_os_str() == OsStr::new(COMPLETION_COMMAND));

        let mut cli = match Cli::try_parse_from(&argv) {
            Ok(cli) => cli,
            Err(e) => return report_parse(&e, out, err),
        };

        let registry = CommandRegistry::build(builtin_commands(), domain_commands());
        let invocation = match Invocation::prepare(&mut cli, completion, &registry) {
            Ok(invocation) => invocation,
            Err(e) => return finish(Err(e), cli.debug, out, err),
        };

        let logging = LogContext::new(cli.verbosity(), cli.debug);
        let result = self
            .dispatch(&cli, invocation, &registry, completion, &mut *out)
            .with_subscriber(logging.dispatch().clone())
            .await;
        let _ = out.flush();
        finish(result, logging.debug(), out, err)
    }

    async fn dispatch(
        &self,
        cli: &Cli,
        invocation: Invocation,
        registry: &CommandRegistry,
        completion: bool,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let Invocation::Command { name, handler, args } = invocation else {
            return write_command_listing(out, registry);
        };

        let client = if handler.requires_client() && !completion {
            let config = self.bootstrap.resolve(&cli.connection)?;
            Some(self.bootstrap.connect(&config).await?)
        } else {
            None
        };

        debug!(command = name, authenticated = client.is_some(), "dispatching command");
        let ctx = CommandContext::new(client.as_ref(), registry, OutputFormat::new(cli.format));
        handler.run(&ctx, &args, out).await
    }
}

/// What one invocation will do, decided before any configuration is read.
enum Invocation {
    /// Print the command listing.
    Listing,
    /// Run a registered command with its parsed arguments.
    Command {
        name: &'static str,
        handler: Box<dyn CommandHandler>,
        args: ArgMatches,
    },
}

impl Invocation {
    /// Look up the command and parse its arguments. Global options found
    /// among them are folded into `cli`.
    fn prepare(cli: &mut Cli, completion: bool, registry: &CommandRegistry) -> Result<Self, CliError> {
        if cli.help {
            return Ok(Self::Listing);
        }

        let (requested, argv) = if completion {
            (COMPLETION_COMMAND.to_string(), Vec::new())
        } else {
            match cli.command_name() {
                Some(name) => (name.to_string(), cli.command_args().to_vec()),
                None => return Ok(Self::Listing),
            }
        };

        let (name, handler) = registry
            .get(&requested)
            .ok_or(CliError::UnknownCommand(requested))?;
        let args = command_parser(name, handler.as_ref()).try_get_matches_from(argv)?;
        cli.absorb(TrailingFlags::from_arg_matches(&args)?);
        Ok(Self::Command { name, handler, args })
    }
}

/// Exit code for `result`, reporting any error.
fn finish(result: Result<(), CliError>, debug: bool, out: &mut (dyn Write + Send), err: &mut (dyn Write + Send)) -> u8 {
    match result {
        Ok(()) => 0,
        Err(CliError::Usage(e)) => report_parse(&e, out, err),
        Err(e) => {
            report_error(&e, debug, err);
            e.exit_code()
        }
    }
}

/// Print a parser outcome: help and version go to `out` with exit 0,
/// usage errors go to `err` with the parser's code.
fn report_parse(e: &clap::Error, out: &mut (dyn Write + Send), err: &mut (dyn Write + Send)) -> u8 {
    let rendered = e.render().to_string();
    if e.use_stderr() {
        write_flushed(err, &rendered);
    } else {
        write_flushed(out, &rendered);
    }
    u8::try_from(e.exit_code()).unwrap_or(EXIT_FAILURE)
}

fn write_flushed(target: &mut (dyn Write + Send), text: &str) {
    let _ = target.write_all(text.as_bytes());
    let _ = target.flush();
}

/// One `error:` line, or the full source chain with `--debug`.
fn report_error(e: &CliError, debug: bool, err: &mut (dyn Write + Send)) {
    let _ = writeln!(err, "error: {e}");
    if debug {
        let mut source = e.source();
        while let Some(cause) = source {
            let _ = writeln!(err, "  caused by: {cause}");
            source = cause.source();
        }
    }
    let _ = err.flush();
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn report_error_is_one_line_without_debug() {
        let e = CliError::Input {
            path: "/tmp/body.yaml".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        let mut err = Vec::new();
        report_error(&e, false, &mut err);
        assert_eq!(String::from_utf8(err).expect("utf-8"), "error: cannot read /tmp/body.yaml\n");
    }

    #[test]
    fn report_error_prints_chain_with_debug() {
        let e = CliError::Input {
            path: "/tmp/body.yaml".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        let mut err = Vec::new();
        report_error(&e, true, &mut err);
        assert_eq!(
            String::from_utf8(err).expect("utf-8"),
            "error: cannot read /tmp/body.yaml\n  caused by: no such file\n"
        );
    }

    #[test]
    fn report_parse_routes_help_to_stdout() {
        let e = clap::Command::new("x")
            .try_get_matches_from(["x", "--help"])
            .expect_err("help exits");
        let (mut out, mut err) = (Vec::new(), Vec::new());
        assert_eq!(report_parse(&e, &mut out, &mut err), 0);
        assert!(!out.is_empty());
        assert!(err.is_empty());
    }

    #[test]
    fn report_parse_routes_errors_to_stderr() {
        let e = clap::Command::new("x")
            .try_get_matches_from(["x", "--nope"])
            .expect_err("unknown flag");
        let (mut out, mut err) = (Vec::new(), Vec::new());
        assert_eq!(report_parse(&e, &mut out, &mut err), 2);
        assert!(out.is_empty());
        assert!(!err.is_empty());
    }
}
