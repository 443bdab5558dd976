//! Shared cluster commands.
//!
//! "Available" clusters are shared with the workspace by others; "own"
//! clusters are the ones the workspace shares.

use std::io::Write;

use async_trait::async_trait;
use clap::{ArgMatches, Command};

use super::{CommandContext, CommandHandler, positional, required, workspace_arg};
use crate::error::CliError;
use crate::output::{Column, Listing, Message, Record};

const COLUMNS: &[Column] = &[
    Column::new("ID", "ID"),
    Column::new("NAME", "Name"),
    Column::new("DISPLAY NAME", "DisplayName"),
    Column::new("CLUSTER", "ClusterID"),
];

fn with_cluster(cmd: Command) -> Command {
    cmd.arg(workspace_arg())
        .arg(positional("cluster", "Shared cluster identifier"))
}

fn ws_cluster(args: &ArgMatches) -> Result<(&str, &str), CliError> {
    Ok((required(args, "workspace")?, required(args, "cluster")?))
}

/// `shared-cluster-available-list`.
#[derive(Debug, Default)]
pub struct AvailableList;

#[async_trait]
impl CommandHandler for AvailableList {
    fn description(&self) -> &'static str {
        "List clusters shared with a workspace"
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
        let clusters = ctx
            .client()?
            .shared_clusters
            .list_available(required(args, "workspace")?)
            .await?;
        ctx.format().write(out, &Listing::new(COLUMNS, clusters))
    }
}

/// `shared-cluster-available-get`.
#[derive(Debug, Default)]
pub struct AvailableGet;

#[async_trait]
impl CommandHandler for AvailableGet {
    fn description(&self) -> &'static str {
        "Show a cluster shared with a workspace"
    }

    fn args(&self, cmd: Command) -> Command {
        with_cluster(cmd)
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let (workspace, cluster) = ws_cluster(args)?;
        let detail = ctx
            .client()?
            .shared_clusters
            .get_available(workspace, cluster)
            .await?;
        ctx.format().write(out, &Record::new(detail))
    }
}

/// `shared-cluster-available-delete`.
#[derive(Debug, Default)]
pub struct AvailableDelete;

#[async_trait]
impl CommandHandler for AvailableDelete {
    fn description(&self) -> &'static str {
        "Remove access to a cluster shared with a workspace"
    }

    fn args(&self, cmd: Command) -> Command {
        with_cluster(cmd)
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let (workspace, cluster) = ws_cluster(args)?;
        ctx.client()?
            .shared_clusters
            .delete_available(workspace, cluster)
            .await?;
        ctx.format()
            .write(out, &Message::success(format!("Shared cluster '{cluster}' removed")))
    }
}

/// `shared-cluster-own-list`.
#[derive(Debug, Default)]
pub struct OwnList;

#[async_trait]
impl CommandHandler for OwnList {
    fn description(&self) -> &'static str {
        "List clusters a workspace shares"
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
        let clusters = ctx
            .client()?
            .shared_clusters
            .list_own(required(args, "workspace")?)
            .await?;
        ctx.format().write(out, &Listing::new(COLUMNS, clusters))
    }
}

/// `shared-cluster-own-get`.
#[derive(Debug, Default)]
pub struct OwnGet;

#[async_trait]
impl CommandHandler for OwnGet {
    fn description(&self) -> &'static str {
        "Show a cluster a workspace shares"
    }

    fn args(&self, cmd: Command) -> Command {
        with_cluster(cmd)
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let (workspace, cluster) = ws_cluster(args)?;
        let detail = ctx.client()?.shared_clusters.get_own(workspace, cluster).await?;
        ctx.format().write(out, &Record::new(detail))
    }
}

/// `shared-cluster-own-delete`.
#[derive(Debug, Default)]
pub struct OwnDelete;

#[async_trait]
impl CommandHandler for OwnDelete {
    fn description(&self) -> &'static str {
        "Stop sharing a cluster"
    }

    fn args(&self, cmd: Command) -> Command {
        with_cluster(cmd)
    }

    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError> {
        let (workspace, cluster) = ws_cluster(args)?;
        ctx.client()?
            .shared_clusters
            .delete_own(workspace, cluster)
            .await?;
        ctx.format()
            .write(out, &Message::success(format!("Cluster '{cluster}' is no longer shared")))
    }
}
