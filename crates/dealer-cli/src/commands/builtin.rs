//! Built-in commands that work without credentials.

use std::io::Write;

use async_trait::async_trait;
use clap::{Arg, ArgMatches, Command};

use super::{CommandContext, CommandHandler, command_parser, optional};
use crate::cli::{global_flag_strings, render_global_help};
use crate::error::CliError;
use crate::registry::CommandRegistry;

/// Write the global help followed by every registered command and its
/// one-line description, names padded to the longest one.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_command_listing<W: Write + ?Sized>(out: &mut W, registry: &CommandRegistry) -> Result<(), CliError> {
    out.write_all(render_global_help().as_bytes())?;
    writeln!(out, "\nCommands for API:")?;

    let entries = registry.descriptions();
    let width = entries.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, one_liner) in entries {
        writeln!(out, "  {name:<width$}  {one_liner}")?;
    }
    Ok(())
}

/// `help [COMMAND]`.
#[derive(Debug, Default)]
pub struct Help;

#[async_trait]
impl CommandHandler for Help {
    fn description(&self) -> &'static str {
        "Print detailed help for another command"
    }

    fn args(&self, cmd: Command) -> Command {
        cmd.arg(Arg::new("command").value_name("COMMAND").help("Name of the command"))
    }

    fn requires_client(&self) -> bool {
        false
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let Some(name) = optional(args, "command") else {
            return write_command_listing(out, ctx.registry());
        };
        let (name, handler) = ctx
            .registry()
            .get(name)
            .ok_or_else(|| CliError::UnknownCommand(name.to_string()))?;
        let help = command_parser(name, handler.as_ref())
            .bin_name(format!("dealer {name}"))
            .render_help();
        write!(out, "{help}")?;
        Ok(())
    }
}

/// `complete`: print a bash completion script for the current command set.
#[derive(Debug, Default)]
pub struct Complete;

#[async_trait]
impl CommandHandler for Complete {
    fn description(&self) -> &'static str {
        "Print bash completion command"
    }

    fn args(&self, cmd: Command) -> Command {
        cmd.arg(
            Arg::new("name")
                .long("name")
                .default_value("dealer")
                .help("Command name to complete"),
        )
    }

    fn requires_client(&self) -> bool {
        false
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let name = optional(args, "name").unwrap_or("dealer");
        let words = ctx.registry().list_for_completion(&global_flag_strings()).join(" ");
        let function = format!("_{}", name.replace('-', "_"));
        write!(
            out,
            "{function}()\n\
             {{\n    \
                 local cur=\"${{COMP_WORDS[COMP_CWORD]}}\"\n    \
                 local words=\"{words}\"\n    \
                 COMPREPLY=($(compgen -W \"${{words}}\" -- \"${{cur}}\"))\n    \
                 return 0\n\
             }}\n\
             complete -F {function} {name}\n"
        )?;
        Ok(())
    }
}

/// `bash-completion`: every command name and global flag, space-joined.
#[derive(Debug, Default)]
pub struct BashCompletion;

#[async_trait]
impl CommandHandler for BashCompletion {
    fn description(&self) -> &'static str {
        "Prints all of the commands and options for bash-completion"
    }

    fn args(&self, cmd: Command) -> Command {
        // Completion consumers pass the partial command line through.
        cmd.arg(Arg::new("words").num_args(0..).trailing_var_arg(true).allow_hyphen_values(true).hide(true))
    }

    fn requires_client(&self) -> bool {
        false
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        _args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let words = ctx.registry().list_for_completion(&global_flag_strings());
        writeln!(out, "{}", words.join(" "))?;
        Ok(())
    }
}
