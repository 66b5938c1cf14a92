//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "homeboard",
    version,
    about = "Homeboard admin - manage articles, listings and users",
    long_about = "Manage the articles, property listings and users of a Homeboard site.\n\n\
                  Collections are stored as JSON files in a data directory; every change\n\
                  rewrites the whole collection atomically."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Settings file (default: platform config directory).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Data directory (overrides `storage.data_dir` from the settings).
    #[arg(long = "data-dir", value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List one page of a collection.
    List(ListArgs),

    /// Print one record as JSON.
    Show(IdArgs),

    /// Add a record from field=value pairs.
    Add(AddArgs),

    /// Change fields of one record.
    Update(UpdateArgs),

    /// Delete one record.
    Remove(IdArgs),

    /// Remove or update the selected records of a filtered list.
    Bulk(BulkArgs),

    /// Manage the in-progress draft of a resource form.
    Draft {
        #[command(subcommand)]
        command: DraftCommand,
    },

    /// Show the effective settings, or write a default settings file.
    Config(ConfigArgs),
}

impl Command {
    /// The resource a command operates on, if any.
    pub fn resource(&self) -> Option<Resource> {
        match self {
            Self::List(args) => Some(args.resource),
            Self::Show(args) | Self::Remove(args) => Some(args.resource),
            Self::Add(args) => Some(args.resource),
            Self::Update(args) => Some(args.resource),
            Self::Bulk(args) => Some(args.resource),
            Self::Draft { command } => Some(command.resource()),
            Self::Config(_) => None,
        }
    }
}

/// Resource collections managed by the admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Resource {
    Articles,
    Listings,
    Users,
}

/// Search, filter, sort and page options shared by `list` and `bulk`.
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Case-insensitive search over the resource's text fields.
    #[arg(long = "search", short = 's', value_name = "TERM")]
    pub search: Option<String>,

    /// Categorical filter, e.g. `--filter status=Published` (repeatable).
    #[arg(long = "filter", short = 'f', value_name = "FIELD=VALUE", value_parser = parse_key_value)]
    pub filters: Vec<(String, String)>,

    /// Only records dated on or after this day (YYYY-MM-DD).
    #[arg(long = "since", value_name = "DATE")]
    pub since: Option<String>,

    /// Field to sort by.
    #[arg(long = "sort", value_name = "FIELD")]
    pub sort: Option<String>,

    /// Sort descending instead of ascending.
    #[arg(long = "desc", requires = "sort")]
    pub descending: bool,

    /// Page to show (1-based; out-of-range pages show the last page).
    #[arg(long = "page", short = 'p', default_value_t = 1)]
    pub page: usize,

    /// Rows per page (default from settings).
    #[arg(long = "page-size", value_name = "N")]
    pub page_size: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[arg(value_enum)]
    pub resource: Resource,

    #[command(flatten)]
    pub query: QueryArgs,
}

#[derive(Args, Debug, Clone)]
pub struct IdArgs {
    #[arg(value_enum)]
    pub resource: Resource,

    pub id: String,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    #[arg(value_enum)]
    pub resource: Resource,

    /// Record id (default: a fresh UUID).
    #[arg(long = "id")]
    pub id: Option<String>,

    /// Field value, e.g. `--set title="Spring report"` (repeatable).
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_key_value)]
    pub fields: Vec<(String, String)>,
}

#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    #[arg(value_enum)]
    pub resource: Resource,

    pub id: String,

    /// Field value to change (repeatable).
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_key_value, required = true)]
    pub fields: Vec<(String, String)>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BulkAction {
    Remove,
    Update,
}

#[derive(Args, Debug, Clone)]
pub struct BulkArgs {
    #[arg(value_enum)]
    pub resource: Resource,

    #[arg(value_enum)]
    pub action: BulkAction,

    /// Select a record by id (repeatable). Ids hidden by the filter are skipped.
    #[arg(long = "select", value_name = "ID")]
    pub select: Vec<String>,

    /// Select every record on the requested page.
    #[arg(long = "all-on-page")]
    pub all_on_page: bool,

    /// Field value applied by `update` (repeatable).
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_key_value)]
    pub fields: Vec<(String, String)>,

    #[command(flatten)]
    pub query: QueryArgs,
}

#[derive(Subcommand, Debug, Clone)]
pub enum DraftCommand {
    /// Print the stored draft.
    Show {
        #[arg(value_enum)]
        resource: Resource,
    },

    /// Change fields of the draft and save it.
    Set {
        #[arg(value_enum)]
        resource: Resource,

        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_key_value, required = true)]
        fields: Vec<(String, String)>,
    },

    /// Discard the draft.
    Clear {
        #[arg(value_enum)]
        resource: Resource,
    },

    /// Turn the draft into a record and discard it.
    Publish {
        #[arg(value_enum)]
        resource: Resource,

        /// Record id (default: a fresh UUID).
        #[arg(long = "id")]
        id: Option<String>,
    },
}

impl DraftCommand {
    pub fn resource(&self) -> Resource {
        match self {
            Self::Show { resource }
            | Self::Set { resource, .. }
            | Self::Clear { resource }
            | Self::Publish { resource, .. } => *resource,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Write the default settings to the settings file.
    #[arg(long = "init")]
    pub init: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

/// Parse `FIELD=VALUE`. The value may itself contain `=`.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got `{raw}`"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in `{raw}`"));
    }
    Ok((field.to_string(), value.to_string()))
}
