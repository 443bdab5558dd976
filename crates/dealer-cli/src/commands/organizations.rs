//! Organization management commands.
//!
//! Create and update build their body from `--display-name`/`--description`
//! on top of an optional `--config-file` document.

use std::io::Write;

use async_trait::async_trait;
use clap::{ArgMatches, Command};

use super::{CommandContext, CommandHandler, named_body, named_body_args, positional, required};
use crate::error::CliError;
use crate::output::{Column, Listing, Message, Record};

const COLUMNS: &[Column] = &[
    Column::new("NAME", "Name"),
    Column::new("DISPLAY NAME", "DisplayName"),
    Column::new("DESCRIPTION", "Description"),
];

fn org_arg() -> clap::Arg {
    positional("org", "Organization name")
}

/// `org-list`.
#[derive(Debug, Default)]
pub struct List;

#[async_trait]
impl CommandHandler for List {
    fn description(&self) -> &'static str {
        "List organizations"
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        _args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let orgs = ctx.client()?.organizations.list().await?;
        ctx.format().write(out, &Listing::new(COLUMNS, orgs))
    }
}

/// `org-get`.
#[derive(Debug, Default)]
pub struct Get;

#[async_trait]
impl CommandHandler for Get {
    fn description(&self) -> &'static str {
        "Show details of an organization"
    }

    fn args(&self, cmd: Command) -> Command {
        cmd.arg(org_arg())
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let org = ctx.client()?.organizations.get(required(args, "org")?).await?;
        ctx.format().write(out, &Record::new(org))
    }
}

/// `org-create`.
#[derive(Debug, Default)]
pub struct Create;

#[async_trait]
impl CommandHandler for Create {
    fn description(&self) -> &'static str {
        "Create an organization"
    }

    fn args(&self, cmd: Command) -> Command {
        named_body_args(cmd.arg(org_arg()))
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let body = named_body(args, Some(required(args, "org")?))?;
        let created = ctx.client()?.organizations.create(&body).await?;
        ctx.format().write(out, &Record::new(created))
    }
}

/// `org-update`.
#[derive(Debug, Default)]
pub struct Update;

#[async_trait]
impl CommandHandler for Update {
    fn description(&self) -> &'static str {
        "Update an organization"
    }

    fn args(&self, cmd: Command) -> Command {
        named_body_args(cmd.arg(org_arg()))
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let org = required(args, "org")?;
        let body = named_body(args, None)?;
        let updated = ctx.client()?.organizations.update(org, &body).await?;
        ctx.format().write(out, &Record::new(updated))
    }
}

/// `org-delete`.
#[derive(Debug, Default)]
pub struct Delete;

#[async_trait]
impl CommandHandler for Delete {
    fn description(&self) -> &'static str {
        "Delete an organization"
    }

    fn args(&self, cmd: Command) -> Command {
        cmd.arg(org_arg())
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let org = required(args, "org")?;
        ctx.client()?.organizations.delete(org).await?;
        ctx.format()
            .write(out, &Message::success(format!("Organization '{org}' deleted")))
    }
}
