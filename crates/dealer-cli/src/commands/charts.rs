//! Chart catalog and chart commands.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;
use clap::{Arg, ArgMatches, Command, value_parser};
use dealer_client::managers::LATEST_VERSION;
use serde_json::{Map, Value};
use tracing::info;

use super::{CommandContext, CommandHandler, option, optional, positional, required, workspace_arg};
use crate::error::CliError;
use crate::output::{Column, Listing, Message, Record, Text};

const CHART_COLUMNS: &[Column] = &[
    Column::new("NAME", "Name"),
    Column::new("WORKSPACE", "WorkspaceName"),
    Column::new("VERSION", "Version"),
    Column::new("DESCRIPTION", "Description"),
];

const VERSION_COLUMNS: &[Column] = &[
    Column::new("VERSION", "Version"),
    Column::new("CREATED", "Created"),
    Column::new("MESSAGE", "Message"),
];

fn with_chart(cmd: Command) -> Command {
    cmd.arg(workspace_arg()).arg(positional("chart", "Chart name"))
}

fn with_version(cmd: Command) -> Command {
    with_chart(cmd).arg(
        Arg::new("version")
            .long("version")
            .default_value(LATEST_VERSION)
            .help("Chart version"),
    )
}

fn path_arg(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id).value_parser(value_parser!(PathBuf)).help(help)
}

fn path_value<'m>(args: &'m ArgMatches, id: &str) -> Option<&'m PathBuf> {
    args.get_one::<PathBuf>(id)
}

/// Workspace, chart and version of a versioned chart command.
fn chart_version(args: &ArgMatches) -> Result<(&str, &str, &str), CliError> {
    Ok((
        required(args, "workspace")?,
        required(args, "chart")?,
        optional(args, "version").unwrap_or(LATEST_VERSION),
    ))
}

/// `catalog`: search the public chart catalog.
#[derive(Debug, Default)]
pub struct Catalog;

#[async_trait]
impl CommandHandler for Catalog {
    fn description(&self) -> &'static str {
        "Search the chart catalog"
    }

    fn args(&self, cmd: Command) -> Command {
        cmd.arg(option("search", "Substring to search for"))
            .arg(
                Arg::new("limit")
                    .long("limit")
                    .value_parser(value_parser!(u32))
                    .help("Maximum number of results"),
            )
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let search = optional(args, "search");
        let limit = args.get_one::<u32>("limit").copied();
        let charts = ctx.client()?.charts.catalog(search, limit).await?;
        ctx.format().write(out, &Listing::new(CHART_COLUMNS, charts))
    }
}

/// `chart-list`.
#[derive(Debug, Default)]
pub struct List;

#[async_trait]
impl CommandHandler for List {
    fn description(&self) -> &'static str {
        "List charts of a workspace"
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
        let charts = ctx.client()?.charts.list(required(args, "workspace")?).await?;
        ctx.format().write(out, &Listing::new(CHART_COLUMNS, charts))
    }
}

/// `chart-get`.
#[derive(Debug, Default)]
pub struct Get;

#[async_trait]
impl CommandHandler for Get {
    fn description(&self) -> &'static str {
        "Show details of a chart"
    }

    fn args(&self, cmd: Command) -> Command {
        with_chart(cmd)
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let chart = ctx
            .client()?
            .charts
            .get(required(args, "workspace")?, required(args, "chart")?)
            .await?;
        ctx.format().write(out, &Record::new(chart))
    }
}

/// `chart-delete`.
#[derive(Debug, Default)]
pub struct Delete;

#[async_trait]
impl CommandHandler for Delete {
    fn description(&self) -> &'static str {
        "Delete a chart"
    }

    fn args(&self, cmd: Command) -> Command {
        with_chart(cmd)
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let chart = required(args, "chart")?;
        ctx.client()?
            .charts
            .delete(required(args, "workspace")?, chart)
            .await?;
        ctx.format()
            .write(out, &Message::success(format!("Chart '{chart}' deleted")))
    }
}

/// `chart-version-list`.
#[derive(Debug, Default)]
pub struct VersionList;

#[async_trait]
impl CommandHandler for VersionList {
    fn description(&self) -> &'static str {
        "List published versions of a chart"
    }

    fn args(&self, cmd: Command) -> Command {
        with_chart(cmd)
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let versions = ctx
            .client()?
            .charts
            .versions(required(args, "workspace")?, required(args, "chart")?)
            .await?;
        ctx.format().write(out, &Listing::new(VERSION_COLUMNS, versions))
    }
}

/// `chart-get-yaml`.
#[derive(Debug, Default)]
pub struct GetYaml;

#[async_trait]
impl CommandHandler for GetYaml {
    fn description(&self) -> &'static str {
        "Print the chart YAML of a version"
    }

    fn args(&self, cmd: Command) -> Command {
        with_version(cmd)
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let (workspace, chart, version) = chart_version(args)?;
        let yaml = ctx.client()?.charts.yaml(workspace, chart, version).await?;
        ctx.format().write(out, &Text(yaml))
    }
}

/// `chart-values`.
#[derive(Debug, Default)]
pub struct Values;

#[async_trait]
impl CommandHandler for Values {
    fn description(&self) -> &'static str {
        "Print the default values of a chart version"
    }

    fn args(&self, cmd: Command) -> Command {
        with_version(cmd)
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let (workspace, chart, version) = chart_version(args)?;
        let values = ctx.client()?.charts.values(workspace, chart, version).await?;
        ctx.format().write(out, &Text(values))
    }
}

/// `chart-download`: save a chart archive to disk.
#[derive(Debug, Default)]
pub struct Download;

#[async_trait]
impl CommandHandler for Download {
    fn description(&self) -> &'static str {
        "Download a chart archive"
    }

    fn args(&self, cmd: Command) -> Command {
        with_version(cmd).arg(
            path_arg("output", "File to write; defaults to <chart>-<version>.tgz")
                .long("output")
                .short('o'),
        )
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let (workspace, chart, version) = chart_version(args)?;
        let target = path_value(args, "output")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(format!("{chart}-{version}.tgz")));

        let archive = ctx.client()?.charts.download(workspace, chart, version).await?;
        fs::write(&target, &archive).map_err(|source| CliError::Output {
            path: target.clone(),
            source,
        })?;
        info!(path = %target.display(), bytes = archive.len(), "chart archive saved");

        ctx.format()
            .write(out, &Message::success(format!("Saved {}", target.display())))
    }
}

/// `chart-create`: upload a packaged chart.
#[derive(Debug, Default)]
pub struct Create;

#[async_trait]
impl CommandHandler for Create {
    fn description(&self) -> &'static str {
        "Upload a packaged chart to a workspace"
    }

    fn args(&self, cmd: Command) -> Command {
        cmd.arg(workspace_arg())
            .arg(path_arg("archive", "Chart archive (.tgz)").required(true))
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let workspace = required(args, "workspace")?;
        let archive = path_value(args, "archive")
            .ok_or_else(|| CliError::InvalidArgument("missing <archive>".into()))?;
        let chart = ctx.client()?.charts.create(workspace, archive).await?;
        ctx.format().write(out, &Record::new(chart))
    }
}

/// `chart-install`: install a chart version as an application.
#[derive(Debug, Default)]
pub struct Install;

impl Install {
    fn body(args: &ArgMatches) -> Result<Value, CliError> {
        let mut body = Map::new();
        if let Some(target) = optional(args, "target-workspace") {
            body.insert("workspace_name".into(), Value::String(target.to_string()));
        }
        if let Some(name) = optional(args, "name") {
            body.insert("name".into(), Value::String(name.to_string()));
        }
        if let Some(path) = path_value(args, "values-file") {
            let values = fs::read_to_string(path).map_err(|source| CliError::Input {
                path: path.clone(),
                source,
            })?;
            body.insert("values".into(), Value::String(values));
        }
        Ok(Value::Object(body))
    }
}

#[async_trait]
impl CommandHandler for Install {
    fn description(&self) -> &'static str {
        "Install a chart version as an application"
    }

    fn args(&self, cmd: Command) -> Command {
        with_version(cmd)
            .arg(option("target-workspace", "Workspace to install into"))
            .arg(option("name", "Name of the new application"))
            .arg(path_arg("values-file", "YAML values overriding the chart defaults").long("values-file"))
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let (workspace, chart, version) = chart_version(args)?;
        let body = Self::body(args)?;
        let installed = ctx
            .client()?
            .charts
            .install(workspace, chart, version, &body)
            .await?;
        ctx.format().write(out, &Record::new(installed))
    }
}
