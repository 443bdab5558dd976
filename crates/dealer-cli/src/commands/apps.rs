//! Application commands.
//!
//! Covers the application itself plus its data sources and destinations,
//! component status, config, and package managers.

use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

use super::{
    CommandContext, CommandHandler, app_arg, config_file_arg, document_arg, positional, required, switch,
    workspace_arg,
};
use crate::error::CliError;
use crate::output::{Column, Listing, Message, Record};

const APP_COLUMNS: &[Column] = &[
    Column::new("NAME", "Name"),
    Column::new("DISPLAY NAME", "DisplayName"),
    Column::new("PROJECT", "ProjectName"),
    Column::new("ENABLED", "Enabled"),
];

const VOLUME_COLUMNS: &[Column] = &[
    Column::new("NAME", "Name"),
    Column::new("TYPE", "Type"),
    Column::new("MOUNT PATH", "MountPath"),
];

const STATUS_COLUMNS: &[Column] = &[
    Column::new("COMPONENT", "Name"),
    Column::new("STATUS", "Status"),
    Column::new("REASON", "Reason"),
];

const TASK_COLUMNS: &[Column] = &[
    Column::new("NAME", "Name"),
    Column::new("RESOURCES", "Resources"),
];

const PACKAGE_COLUMNS: &[Column] = &[
    Column::new("MANAGER", "Manager"),
    Column::new("PACKAGES", "Packages"),
];

fn with_app(cmd: Command) -> Command {
    cmd.arg(workspace_arg()).arg(app_arg())
}

fn ws_app(args: &ArgMatches) -> Result<(&str, &str), CliError> {
    Ok((required(args, "workspace")?, required(args, "app")?))
}

/// `app-list`.
#[derive(Debug, Default)]
pub struct List;

#[async_trait]
impl CommandHandler for List {
    fn description(&self) -> &'static str {
        "List applications of a workspace"
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
        let apps = ctx.client()?.apps.list(required(args, "workspace")?).await?;
        ctx.format().write(out, &Listing::new(APP_COLUMNS, apps))
    }
}

/// `app-get`.
#[derive(Debug, Default)]
pub struct Get;

#[async_trait]
impl CommandHandler for Get {
    fn description(&self) -> &'static str {
        "Show details of an application"
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
        let (workspace, app) = ws_app(args)?;
        let detail = ctx.client()?.apps.get(workspace, app).await?;
        ctx.format().write(out, &Record::new(detail))
    }
}

/// `app-file-upload`: upload a local file into a data destination.
#[derive(Debug, Default)]
pub struct UploadFile;

#[async_trait]
impl CommandHandler for UploadFile {
    fn description(&self) -> &'static str {
        "Upload a file to an application destination"
    }

    fn args(&self, cmd: Command) -> Command {
        with_app(cmd)
            .arg(positional("destination", "Destination name"))
            .arg(
                Arg::new("file")
                    .required(true)
                    .value_parser(value_parser!(PathBuf))
                    .help("Local file to upload"),
            )
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let (workspace, app) = ws_app(args)?;
        let destination = required(args, "destination")?;
        let file = args
            .get_one::<PathBuf>("file")
            .ok_or_else(|| CliError::InvalidArgument("missing <file>".into()))?;
        ctx.client()?
            .apps
            .upload_file(workspace, app, destination, file)
            .await?;
        ctx.format().write(
            out,
            &Message::success(format!("Uploaded {} to {destination}", file.display())),
        )
    }
}

/// `app-destination-list`.
#[derive(Debug, Default)]
pub struct DestinationList;

#[async_trait]
impl CommandHandler for DestinationList {
    fn description(&self) -> &'static str {
        "List data destinations of an application"
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
        let (workspace, app) = ws_app(args)?;
        let destinations = ctx.client()?.apps.destinations(workspace, app).await?;
        ctx.format().write(out, &Listing::new(VOLUME_COLUMNS, destinations))
    }
}

/// `app-destination-get`.
#[derive(Debug, Default)]
pub struct DestinationGet;

#[async_trait]
impl CommandHandler for DestinationGet {
    fn description(&self) -> &'static str {
        "Show one data destination of an application"
    }

    fn args(&self, cmd: Command) -> Command {
        with_app(cmd).arg(positional("name", "Destination name"))
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let (workspace, app) = ws_app(args)?;
        let destination = ctx
            .client()?
            .apps
            .destination(workspace, app, required(args, "name")?)
            .await?;
        ctx.format().write(out, &Record::new(destination))
    }
}

/// `app-source-list`.
#[derive(Debug, Default)]
pub struct SourceList;

#[async_trait]
impl CommandHandler for SourceList {
    fn description(&self) -> &'static str {
        "List data sources of an application"
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
        let (workspace, app) = ws_app(args)?;
        let sources = ctx.client()?.apps.sources(workspace, app).await?;
        ctx.format().write(out, &Listing::new(VOLUME_COLUMNS, sources))
    }
}

/// `app-source-get`.
#[derive(Debug, Default)]
pub struct SourceGet;

#[async_trait]
impl CommandHandler for SourceGet {
    fn description(&self) -> &'static str {
        "Show one data source of an application"
    }

    fn args(&self, cmd: Command) -> Command {
        with_app(cmd).arg(positional("name", "Source name"))
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let (workspace, app) = ws_app(args)?;
        let source = ctx
            .client()?
            .apps
            .source(workspace, app, required(args, "name")?)
            .await?;
        ctx.format().write(out, &Record::new(source))
    }
}

/// `app-status-list`.
#[derive(Debug, Default)]
pub struct StatusList;

#[async_trait]
impl CommandHandler for StatusList {
    fn description(&self) -> &'static str {
        "Show status of every application component"
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
        let (workspace, app) = ws_app(args)?;
        let statuses = ctx.client()?.apps.statuses(workspace, app).await?;
        ctx.format().write(out, &Listing::new(STATUS_COLUMNS, statuses))
    }
}

/// `app-status-get`.
#[derive(Debug, Default)]
pub struct StatusGet;

#[async_trait]
impl CommandHandler for StatusGet {
    fn description(&self) -> &'static str {
        "Show status of one application component"
    }

    fn args(&self, cmd: Command) -> Command {
        with_app(cmd).arg(positional("component", "Component name"))
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let (workspace, app) = ws_app(args)?;
        let status = ctx
            .client()?
            .apps
            .status(workspace, app, required(args, "component")?)
            .await?;
        ctx.format().write(out, &Record::new(status))
    }
}

/// `app-config`.
#[derive(Debug, Default)]
pub struct Config;

#[async_trait]
impl CommandHandler for Config {
    fn description(&self) -> &'static str {
        "Show the configuration of an application"
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
        let (workspace, app) = ws_app(args)?;
        let config = ctx.client()?.apps.config(workspace, app).await?;
        ctx.format().write(out, &Record::new(config))
    }
}

/// `app-config-task-list`.
#[derive(Debug, Default)]
pub struct ConfigTaskList;

#[async_trait]
impl CommandHandler for ConfigTaskList {
    fn description(&self) -> &'static str {
        "List tasks configured for an application"
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
        let (workspace, app) = ws_app(args)?;
        let tasks = ctx.client()?.apps.config_tasks(workspace, app).await?;
        ctx.format().write(out, &Listing::new(TASK_COLUMNS, tasks))
    }
}

/// `app-config-task-get`.
#[derive(Debug, Default)]
pub struct ConfigTaskGet;

#[async_trait]
impl CommandHandler for ConfigTaskGet {
    fn description(&self) -> &'static str {
        "Show one configured task of an application"
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
        let (workspace, app) = ws_app(args)?;
        let task = ctx
            .client()?
            .apps
            .config_task(workspace, app, required(args, "task")?)
            .await?;
        ctx.format().write(out, &Record::new(task))
    }
}

/// `app-install`: install an application from a document.
#[derive(Debug, Default)]
pub struct Install;

#[async_trait]
impl CommandHandler for Install {
    fn description(&self) -> &'static str {
        "Install an application from a config file"
    }

    fn args(&self, cmd: Command) -> Command {
        cmd.arg(workspace_arg()).arg(config_file_arg(true))
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let workspace = required(args, "workspace")?;
        let body = document_arg(args)?
            .ok_or_else(|| CliError::InvalidArgument("missing --config-file".into()))?;
        let installed = ctx.client()?.apps.install(workspace, &body).await?;
        ctx.format().write(out, &Record::new(installed))
    }
}

/// `app-delete`.
#[derive(Debug, Default)]
pub struct Delete;

#[async_trait]
impl CommandHandler for Delete {
    fn description(&self) -> &'static str {
        "Delete an application"
    }

    fn args(&self, cmd: Command) -> Command {
        with_app(cmd).arg(switch("force", "Also remove the application's volumes"))
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let (workspace, app) = ws_app(args)?;
        let force = args.get_flag("force");
        ctx.client()?.apps.delete(workspace, app, force).await?;
        ctx.format()
            .write(out, &Message::success(format!("Application '{app}' deleted")))
    }
}

/// `app-enable`.
#[derive(Debug, Default)]
pub struct Enable;

#[async_trait]
impl CommandHandler for Enable {
    fn description(&self) -> &'static str {
        "Enable an application"
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
        let (workspace, app) = ws_app(args)?;
        ctx.client()?.apps.enable(workspace, app).await?;
        ctx.format()
            .write(out, &Message::success(format!("Application '{app}' enabled")))
    }
}

/// `app-disable`.
#[derive(Debug, Default)]
pub struct Disable;

#[async_trait]
impl CommandHandler for Disable {
    fn description(&self) -> &'static str {
        "Disable an application"
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
        let (workspace, app) = ws_app(args)?;
        ctx.client()?.apps.disable(workspace, app).await?;
        ctx.format()
            .write(out, &Message::success(format!("Application '{app}' disabled")))
    }
}

/// `app-package-install`.
#[derive(Debug, Default)]
pub struct PackageInstall;

#[async_trait]
impl CommandHandler for PackageInstall {
    fn description(&self) -> &'static str {
        "Install packages into an application"
    }

    fn args(&self, cmd: Command) -> Command {
        with_app(cmd)
            .arg(
                Arg::new("manager")
                    .long("manager")
                    .default_value("pip")
                    .help("Package manager to install with"),
            )
            .arg(
                Arg::new("packages")
                    .required(true)
                    .num_args(1..)
                    .action(ArgAction::Append)
                    .help("Packages to install"),
            )
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let (workspace, app) = ws_app(args)?;
        let manager = required(args, "manager")?;
        let packages: Vec<String> = args
            .get_many::<String>("packages")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        ctx.client()?
            .apps
            .install_packages(workspace, app, manager, &packages)
            .await?;
        ctx.format().write(
            out,
            &Message::success(format!("Installed {} with {manager}", packages.join(", "))),
        )
    }
}

/// `app-package-manager-list`.
#[derive(Debug, Default)]
pub struct PackageManagerList;

#[async_trait]
impl CommandHandler for PackageManagerList {
    fn description(&self) -> &'static str {
        "List package managers of an application"
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
        let (workspace, app) = ws_app(args)?;
        let managers = ctx.client()?.apps.package_managers(workspace, app).await?;
        ctx.format().write(out, &Listing::new(PACKAGE_COLUMNS, managers))
    }
}

/// `app-package-manager-get`.
#[derive(Debug, Default)]
pub struct PackageManagerGet;

#[async_trait]
impl CommandHandler for PackageManagerGet {
    fn description(&self) -> &'static str {
        "List packages installed by one package manager"
    }

    fn args(&self, cmd: Command) -> Command {
        with_app(cmd).arg(positional("manager", "Package manager name"))
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let (workspace, app) = ws_app(args)?;
        let packages = ctx
            .client()?
            .apps
            .package_manager(workspace, app, required(args, "manager")?)
            .await?;
        ctx.format().write(out, &Record::new(packages))
    }
}
