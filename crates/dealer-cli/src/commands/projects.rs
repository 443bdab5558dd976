//! Project commands.

use std::io::Write;

use async_trait::async_trait;
use clap::{ArgMatches, Command};

use super::{CommandContext, CommandHandler, named_body, named_body_args, positional, required, workspace_arg};
use crate::error::CliError;
use crate::output::{Column, Listing, Message, Record};

const COLUMNS: &[Column] = &[
    Column::new("NAME", "Name"),
    Column::new("DISPLAY NAME", "DisplayName"),
    Column::new("ENVIRONMENT", "Environment"),
    Column::new("DESCRIPTION", "Description"),
];

fn with_project(cmd: Command) -> Command {
    cmd.arg(workspace_arg())
        .arg(positional("project", "Project name"))
}

/// `project-list`.
#[derive(Debug, Default)]
pub struct List;

#[async_trait]
impl CommandHandler for List {
    fn description(&self) -> &'static str {
        "List projects of a workspace"
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
        let projects = ctx.client()?.projects.list(required(args, "workspace")?).await?;
        ctx.format().write(out, &Listing::new(COLUMNS, projects))
    }
}

/// `project-get`.
#[derive(Debug, Default)]
pub struct Get;

#[async_trait]
impl CommandHandler for Get {
    fn description(&self) -> &'static str {
        "Show details of a project"
    }

    fn args(&self, cmd: Command) -> Command {
        with_project(cmd)
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let project = ctx
            .client()?
            .projects
            .get(required(args, "workspace")?, required(args, "project")?)
            .await?;
        ctx.format().write(out, &Record::new(project))
    }
}

/// `project-create`.
#[derive(Debug, Default)]
pub struct Create;

#[async_trait]
impl CommandHandler for Create {
    fn description(&self) -> &'static str {
        "Create a project"
    }

    fn args(&self, cmd: Command) -> Command {
        named_body_args(with_project(cmd))
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let workspace = required(args, "workspace")?;
        let body = named_body(args, Some(required(args, "project")?))?;
        let created = ctx.client()?.projects.create(workspace, &body).await?;
        ctx.format().write(out, &Record::new(created))
    }
}

/// `project-update`.
#[derive(Debug, Default)]
pub struct Update;

#[async_trait]
impl CommandHandler for Update {
    fn description(&self) -> &'static str {
        "Update a project"
    }

    fn args(&self, cmd: Command) -> Command {
        named_body_args(with_project(cmd))
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let workspace = required(args, "workspace")?;
        let project = required(args, "project")?;
        let body = named_body(args, None)?;
        let updated = ctx.client()?.projects.update(workspace, project, &body).await?;
        ctx.format().write(out, &Record::new(updated))
    }
}

/// `project-delete`.
#[derive(Debug, Default)]
pub struct Delete;

#[async_trait]
impl CommandHandler for Delete {
    fn description(&self) -> &'static str {
        "Delete a project"
    }

    fn args(&self, cmd: Command) -> Command {
        with_project(cmd)
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let workspace = required(args, "workspace")?;
        let project = required(args, "project")?;
        ctx.client()?.projects.delete(workspace, project).await?;
        ctx.format()
            .write(out, &Message::success(format!("Project '{project}' deleted")))
    }
}
