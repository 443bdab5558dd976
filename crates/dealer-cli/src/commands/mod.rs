//! CLI command implementations.
//!
//! Each submodule groups the handlers for one API resource:
//! - [`builtin`] - `help`, `complete` and `bash-completion`
//! - [`workspaces`] - Workspace lookups
//! - [`organizations`] - Organization CRUD
//! - [`projects`] - Project CRUD
//! - [`apps`] - Applications, their files, packages and config
//! - [`app_tasks`] - Application tasks, pods and logs
//! - [`shared_clusters`] - Shared clusters
//! - [`charts`] - Chart catalog and charts
//!
//! The flat command namespace is a static table: [`builtin_commands`] holds
//! the protected names, [`domain_commands`] everything else.

pub mod app_tasks;
pub mod apps;
pub mod builtin;
pub mod charts;
pub mod organizations;
pub mod projects;
pub mod shared_clusters;
pub mod workspaces;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use clap::{Arg, ArgAction, ArgMatches, Args, Command, value_parser};
use dealer_client::Client;
use serde_json::Value;

use crate::cli::TrailingFlags;
use crate::error::CliError;
use crate::output::OutputFormat;
use crate::registry::CommandRegistry;

/// Names a registry clear never removes.
pub const PROTECTED_COMMANDS: &[&str] = &["help", "complete"];

/// Reserved command listing every command and flag for shell completion.
pub const COMPLETION_COMMAND: &str = "bash-completion";

/// A command bound to one name in the registry.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// One-line description shown in the help listing.
    fn description(&self) -> &'static str;

    /// Declare this command's arguments on `cmd`.
    fn args(&self, cmd: Command) -> Command {
        cmd
    }

    /// Whether the command needs an authenticated client.
    fn requires_client(&self) -> bool {
        true
    }

    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call or output fails.
    async fn run(
        &self,
        ctx: &CommandContext<'_>,
        args: &ArgMatches,
        out: &mut (dyn Write + Send),
    ) -> Result<(), CliError>;
}

/// Creates a fresh handler instance.
pub type CommandFactory = fn() -> Box<dyn CommandHandler>;

/// Factory for a handler type.
pub fn factory<H: CommandHandler + Default + 'static>() -> Box<dyn CommandHandler> {
    Box::new(H::default())
}

/// What a running command can reach.
pub struct CommandContext<'a> {
    client: Option<&'a Client>,
    registry: &'a CommandRegistry,
    format: OutputFormat,
}

impl<'a> CommandContext<'a> {
    /// Creates a new context.
    #[must_use]
    pub const fn new(client: Option<&'a Client>, registry: &'a CommandRegistry, format: OutputFormat) -> Self {
        Self {
            client,
            registry,
            format,
        }
    }

    /// The authenticated client.
    ///
    /// # Errors
    ///
    /// Returns an error when the command runs without a session.
    pub fn client(&self) -> Result<&'a Client, CliError> {
        self.client
            .ok_or_else(|| CliError::InvalidParameter("this command requires an authenticated session".into()))
    }

    /// The registry the command was dispatched from.
    pub const fn registry(&self) -> &'a CommandRegistry {
        self.registry
    }

    /// Output formatter.
    pub const fn format(&self) -> &OutputFormat {
        &self.format
    }
}

/// Protected built-in commands.
pub fn builtin_commands() -> Vec<(&'static str, CommandFactory)> {
    vec![
        ("help", factory::<builtin::Help>),
        ("complete", factory::<builtin::Complete>),
    ]
}

/// Every domain command, by name.
pub fn domain_commands() -> Vec<(&'static str, CommandFactory)> {
    vec![
        (COMPLETION_COMMAND, factory::<builtin::BashCompletion>),
        ("workspace-list", factory::<workspaces::List>),
        ("workspace-get", factory::<workspaces::Get>),
        ("org-list", factory::<organizations::List>),
        ("org-get", factory::<organizations::Get>),
        ("org-create", factory::<organizations::Create>),
        ("org-update", factory::<organizations::Update>),
        ("org-delete", factory::<organizations::Delete>),
        ("project-list", factory::<projects::List>),
        ("project-get", factory::<projects::Get>),
        ("project-create", factory::<projects::Create>),
        ("project-update", factory::<projects::Update>),
        ("project-delete", factory::<projects::Delete>),
        ("app-list", factory::<apps::List>),
        ("app-get", factory::<apps::Get>),
        ("app-file-upload", factory::<apps::UploadFile>),
        ("app-destination-list", factory::<apps::DestinationList>),
        ("app-destination-get", factory::<apps::DestinationGet>),
        ("app-source-list", factory::<apps::SourceList>),
        ("app-source-get", factory::<apps::SourceGet>),
        ("app-status-list", factory::<apps::StatusList>),
        ("app-status-get", factory::<apps::StatusGet>),
        ("app-config", factory::<apps::Config>),
        ("app-config-task-list", factory::<apps::ConfigTaskList>),
        ("app-config-task-get", factory::<apps::ConfigTaskGet>),
        ("app-install", factory::<apps::Install>),
        ("app-delete", factory::<apps::Delete>),
        ("app-enable", factory::<apps::Enable>),
        ("app-disable", factory::<apps::Disable>),
        ("app-package-install", factory::<apps::PackageInstall>),
        ("app-package-manager-list", factory::<apps::PackageManagerList>),
        ("app-package-manager-get", factory::<apps::PackageManagerGet>),
        ("app-task-list", factory::<app_tasks::List>),
        ("app-task-get", factory::<app_tasks::Get>),
        ("app-task-pods", factory::<app_tasks::Pods>),
        ("app-task-logs", factory::<app_tasks::Logs>),
        ("app-task-run", factory::<app_tasks::Run>),
        ("app-task-create", factory::<app_tasks::Create>),
        ("app-task-delete", factory::<app_tasks::Delete>),
        ("shared-cluster-available-list", factory::<shared_clusters::AvailableList>),
        ("shared-cluster-available-get", factory::<shared_clusters::AvailableGet>),
        ("shared-cluster-available-delete", factory::<shared_clusters::AvailableDelete>),
        ("shared-cluster-own-list", factory::<shared_clusters::OwnList>),
        ("shared-cluster-own-get", factory::<shared_clusters::OwnGet>),
        ("shared-cluster-own-delete", factory::<shared_clusters::OwnDelete>),
        ("catalog", factory::<charts::Catalog>),
        ("chart-list", factory::<charts::List>),
        ("chart-get", factory::<charts::Get>),
        ("chart-delete", factory::<charts::Delete>),
        ("chart-version-list", factory::<charts::VersionList>),
        ("chart-get-yaml", factory::<charts::GetYaml>),
        ("chart-values", factory::<charts::Values>),
        ("chart-download", factory::<charts::Download>),
        ("chart-create", factory::<charts::Create>),
        ("chart-install", factory::<charts::Install>),
    ]
}

/// Argument parser for one registered command, global options included.
pub fn command_parser(name: &'static str, handler: &dyn CommandHandler) -> Command {
    let cmd = Command::new(name)
        .about(handler.description())
        .no_binary_name(true)
        .disable_version_flag(true);
    TrailingFlags::augment_args(handler.args(cmd))
}

/// Required positional argument.
pub(crate) fn positional(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id).required(true).help(help)
}

/// The `workspace` positional most commands start with.
pub(crate) fn workspace_arg() -> Arg {
    positional("workspace", "Workspace name")
}

/// The `app` positional.
pub(crate) fn app_arg() -> Arg {
    positional("app", "Application name")
}

/// Optional `--KEY VALUE` flag.
pub(crate) fn option(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id).long(id).help(help)
}

/// `--config-file PATH` holding a YAML or JSON request body.
pub(crate) fn config_file_arg(required: bool) -> Arg {
    Arg::new("config-file")
        .long("config-file")
        .value_name("PATH")
        .value_parser(value_parser!(PathBuf))
        .required(required)
        .help("YAML or JSON file with the request body")
}

/// Boolean `--KEY` switch.
pub(crate) fn switch(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id).long(id).action(ArgAction::SetTrue).help(help)
}

/// Value of a required string argument.
pub(crate) fn required<'m>(args: &'m ArgMatches, id: &str) -> Result<&'m str, CliError> {
    optional(args, id).ok_or_else(|| CliError::InvalidArgument(format!("missing <{id}>")))
}

/// Value of an optional string argument.
pub(crate) fn optional<'m>(args: &'m ArgMatches, id: &str) -> Option<&'m str> {
    args.get_one::<String>(id).map(String::as_str)
}

/// Read a YAML or JSON document into a request body.
///
/// # Errors
///
/// Returns [`CliError::Input`] if the file cannot be read and
/// [`CliError::Document`] if it does not parse.
pub(crate) fn read_document(path: &Path) -> Result<Value, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&text).map_err(|source| CliError::Document {
        path: path.to_path_buf(),
        source,
    })
}

/// Request body from `--config-file`, if given.
pub(crate) fn document_arg(args: &ArgMatches) -> Result<Option<Value>, CliError> {
    args.get_one::<PathBuf>("config-file")
        .map(|path| read_document(path))
        .transpose()
}

/// Body for a name/display-name/description resource, optionally seeded
/// from `--config-file`. Flags override document fields.
pub(crate) fn named_body(args: &ArgMatches, name: Option<&str>) -> Result<Value, CliError> {
    let mut body = document_arg(args)?.unwrap_or_else(|| Value::Object(serde_json::Map::new()));
    let Value::Object(map) = &mut body else {
        return Err(CliError::InvalidArgument("request body must be a mapping".into()));
    };
    if let Some(name) = name {
        map.insert("Name".into(), Value::String(name.to_string()));
    }
    if let Some(display_name) = optional(args, "display-name") {
        map.insert("DisplayName".into(), Value::String(display_name.to_string()));
    }
    if let Some(description) = optional(args, "description") {
        map.insert("Description".into(), Value::String(description.to_string()));
    }
    Ok(body)
}

/// Flags shared by resources with a display name and description.
pub(crate) fn named_body_args(cmd: Command) -> Command {
    cmd.arg(option("display-name", "Human-readable name"))
        .arg(option("description", "Free-form description"))
        .arg(config_file_arg(false))
}
