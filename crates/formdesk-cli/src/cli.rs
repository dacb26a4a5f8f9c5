//! CLI argument definitions for formdesk.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "formdesk",
    version,
    about = "Formdesk - manage stored forms and their submissions",
    long_about = "Manage stored forms and their submissions.\n\n\
                  List and filter submissions the way the admin table does,\n\
                  export them as CSV, and purge a form's submissions in\n\
                  resumable batches."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding forms, submissions and user options.
    #[arg(long = "data-dir", value_name = "DIR", default_value = "formdesk-data", global = true)]
    pub data_dir: PathBuf,

    /// Acting admin user id (scopes hidden columns and purge progress).
    #[arg(long = "user", value_name = "ID", default_value_t = 1, global = true)]
    pub user: u64,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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
}

#[derive(Subcommand)]
pub enum Command {
    /// List the stored forms.
    Forms,

    /// List a form's submissions with the admin table's filters.
    List(ListArgs),

    /// Export a form's submissions as CSV.
    Export(ExportArgs),

    /// Delete all of a form's submissions in resumable batches.
    Purge(PurgeArgs),
}

#[derive(Parser)]
pub struct ListArgs {
    /// Form whose submissions to list.
    #[arg(long = "form", value_name = "ID")]
    pub form_id: u64,

    /// Inclusive begin date (YYYY-MM-DD).
    #[arg(long = "begin-date", value_name = "DATE")]
    pub begin_date: Option<String>,

    /// Inclusive end date (YYYY-MM-DD).
    #[arg(long = "end-date", value_name = "DATE")]
    pub end_date: Option<String>,

    /// Status filter (publish, trash).
    #[arg(long = "status", default_value = "publish")]
    pub status: String,

    /// Sort column: id, sub_date, or form_<form>_field_<field>.
    #[arg(long = "orderby", value_name = "COLUMN")]
    pub orderby: Option<String>,

    /// Sort descending instead of ascending.
    #[arg(long = "desc")]
    pub desc: bool,

    /// Free-text search across submitted values.
    #[arg(short = 's', long = "search", value_name = "TERMS")]
    pub search: Option<String>,

    /// 1-based page number.
    #[arg(long = "page", default_value_t = 1)]
    pub page: usize,

    /// Rows per page.
    #[arg(long = "per-page", default_value_t = 20)]
    pub per_page: usize,

    /// Show every derived column, ignoring per-user hidden columns.
    #[arg(long = "all-columns")]
    pub all_columns: bool,
}

#[derive(Parser)]
pub struct ExportArgs {
    /// Form whose submissions to export.
    #[arg(long = "form", value_name = "ID")]
    pub form_id: u64,

    /// Export exactly one submission.
    #[arg(long = "single", value_name = "ID", conflicts_with = "ids")]
    pub single: Option<u64>,

    /// Export a comma-separated selection of submission ids.
    #[arg(long = "ids", value_name = "IDS", value_delimiter = ',')]
    pub ids: Vec<u64>,

    /// Output file (default: <form-slug>-subs-<date>.csv).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct PurgeArgs {
    /// Form whose submissions to delete.
    #[arg(long = "form", value_name = "ID")]
    pub form_id: u64,

    /// Filename recorded for the post-purge download redirect.
    #[arg(long = "filename", value_name = "NAME")]
    pub filename: Option<String>,
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
