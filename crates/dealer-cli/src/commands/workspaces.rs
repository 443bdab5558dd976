//! Workspace commands.

use std::io::Write;

use async_trait::async_trait;
use clap::{ArgMatches, Command};

use super::{CommandContext, CommandHandler, required, workspace_arg};
use crate::error::CliError;
use crate::output::{Column, Listing, Record};

const COLUMNS: &[Column] = &[
    Column::new("NAME", "Name"),
    Column::new("DISPLAY NAME", "DisplayName"),
    Column::new("TYPE", "Type"),
];

/// `workspace-list`.
#[derive(Debug, Default)]
pub struct List;

#[async_trait]
impl CommandHandler for List {
    fn description(&self) -> &'static str {
        "List workspaces"
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        _args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let workspaces = ctx.client()?.workspaces.list().await?;
        ctx.format().write(out, &Listing::new(COLUMNS, workspaces))
    }
}

/// `workspace-get`.
#[derive(Debug, Default)]
pub struct Get;

#[async_trait]
impl CommandHandler for Get {
    fn description(&self) -> &'static str {
        "Show details of a workspace"
    }

    fn args(&self, cmd: Command) -> Command {
        cmd.arg(workspace_arg())
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let workspace = required(args, "workspace")?;
        let detail = ctx.client()?.workspaces.get(workspace).await?;
        ctx.format().write(out, &Record::new(detail))
    }
}
