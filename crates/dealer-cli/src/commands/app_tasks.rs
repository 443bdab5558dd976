//! Application task commands: runs, their pods and logs.

use std::io::Write;

use async_trait::async_trait;
use clap::{ArgMatches, Command};

use super::{
    CommandContext, CommandHandler, app_arg, config_file_arg, document_arg, positional, required, workspace_arg,
};
use crate::error::CliError;
use crate::output::{Column, Listing, Message, Record, Text};

const TASK_COLUMNS: &[Column] = &[
    Column::new("NAME", "Name"),
    Column::new("BUILD", "Build"),
    Column::new("STATUS", "Status"),
    Column::new("STARTED", "StartTime"),
    Column::new("COMPLETED", "CompletionTime"),
];

const POD_COLUMNS: &[Column] = &[
    Column::new("NAME", "Name"),
    Column::new("STATUS", "Status"),
];

fn with_app(cmd: Command) -> Command {
    cmd.arg(workspace_arg()).arg(app_arg())
}

fn with_build(cmd: Command) -> Command {
    with_app(cmd)
        .arg(positional("task", "Task name"))
        .arg(positional("build", "Build (run) identifier"))
}

/// Workspace, app, task and build of a task-run command.
struct BuildRef<'m> {
    workspace: &'m str,
    app: &'m str,
    task: &'m str,
    build: &'m str,
}

impl<'m> BuildRef<'m> {
    fn from_args(args: &'m ArgMatches) -> Result<Self, CliError> {
        Ok(Self {
            workspace: required(args, "workspace")?,
            app: required(args, "app")?,
            task: required(args, "task")?,
            build: required(args, "build")?,
        })
    }
}

/// `app-task-list`.
#[derive(Debug, Default)]
pub struct List;

#[async_trait]
impl CommandHandler for List {
    fn description(&self) -> &'static str {
        "List task runs of an application"
    }

    fn args(&self, cmd: Command) -> Command {
        with_app(cmd)
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let tasks = ctx
            .client()?
            .app_tasks
            .list(required(args, "workspace")?, required(args, "app")?)
            .await?;
        ctx.format().write(out, &Listing::new(TASK_COLUMNS, tasks))
    }
}

/// `app-task-get`.
#[derive(Debug, Default)]
pub struct Get;

#[async_trait]
impl CommandHandler for Get {
    fn description(&self) -> &'static str {
        "Show details of a task run"
    }

    fn args(&self, cmd: Command) -> Command {
        with_build(cmd)
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let r = BuildRef::from_args(args)?;
        let task = ctx
            .client()?
            .app_tasks
            .get(r.workspace, r.app, r.task, r.build)
            .await?;
        ctx.format().write(out, &Record::new(task))
    }
}

/// `app-task-pods`.
#[derive(Debug, Default)]
pub struct Pods;

#[async_trait]
impl CommandHandler for Pods {
    fn description(&self) -> &'static str {
        "List pods of a task run"
    }

    fn args(&self, cmd: Command) -> Command {
        with_build(cmd)
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let r = BuildRef::from_args(args)?;
        let pods = ctx
            .client()?
            .app_tasks
            .pods(r.workspace, r.app, r.task, r.build)
            .await?;
        ctx.format().write(out, &Listing::new(POD_COLUMNS, pods))
    }
}

/// `app-task-logs`.
#[derive(Debug, Default)]
pub struct Logs;

#[async_trait]
impl CommandHandler for Logs {
    fn description(&self) -> &'static str {
        "Print logs of one pod of a task run"
    }

    fn args(&self, cmd: Command) -> Command {
        with_build(cmd).arg(positional("pod", "Pod name"))
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let r = BuildRef::from_args(args)?;
        let pod = required(args, "pod")?;
        let logs = ctx
            .client()?
            .app_tasks
            .logs(r.workspace, r.app, r.task, r.build, pod)
            .await?;
        ctx.format().write(out, &Text(logs))
    }
}

/// `app-task-run`: start a configured task.
#[derive(Debug, Default)]
pub struct Run;

#[async_trait]
impl CommandHandler for Run {
    fn description(&self) -> &'static str {
        "Run a configured task"
    }

    fn args(&self, cmd: Command) -> Command {
        with_app(cmd).arg(positional("task", "Task name"))
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let started = ctx
            .client()?
            .app_tasks
            .run(
                required(args, "workspace")?,
                required(args, "app")?,
                required(args, "task")?,
            )
            .await?;
        ctx.format().write(out, &Record::new(started))
    }
}

/// `app-task-create`.
#[derive(Debug, Default)]
pub struct Create;

#[async_trait]
impl CommandHandler for Create {
    fn description(&self) -> &'static str {
        "Create a task run from a task document"
    }

    fn args(&self, cmd: Command) -> Command {
        with_app(cmd).arg(config_file_arg(true))
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let workspace = required(args, "workspace")?;
        let app = required(args, "app")?;
        let body = document_arg(args)?
            .ok_or_else(|| CliError::InvalidArgument("missing --config-file".into()))?;
        let created = ctx.client()?.app_tasks.create(workspace, app, &body).await?;
        ctx.format().write(out, &Record::new(created))
    }
}

/// `app-task-delete`.
#[derive(Debug, Default)]
pub struct Delete;

#[async_trait]
impl CommandHandler for Delete {
    fn description(&self) -> &'static str {
        "Delete a task run"
    }

    fn args(&self, cmd: Command) -> Command {
        with_build(cmd)
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let r = BuildRef::from_args(args)?;
        ctx.client()?
            .app_tasks
            .delete(r.workspace, r.app, r.task, r.build)
            .await?;
        ctx.format().write(
            out,
            &Message::success(format!("Task run {}/{} deleted", r.task, r.build)),
        )
    }
}
