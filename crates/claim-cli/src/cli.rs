//! CLI argument definitions for the claim checker.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "claim-check",
    version,
    about = "Decode and validate health-insurance claim envelopes",
    long_about = "Decode health-insurance claim envelopes (GIAMDINHHS) and validate\n\
                  every claim against a configurable rule list.\n\n\
                  Results carry the row index of the offending line item, the same\n\
                  index shown by the `rows` command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

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

    /// Allow claim identifiers and field values in log output.
    ///
    /// Claim data is medical data; it is redacted from logs unless this flag
    /// is set.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Decode envelopes and validate every claim.
    Check(CheckArgs),

    /// List the rule set.
    Rules(RulesArgs),

    /// Print the line items of one group with their row index.
    Rows(RowsArgs),
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Envelope files, or directories containing `.xml` envelopes.
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// JSON rule list (default: built-in rules).
    #[arg(long = "rules", value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Report format printed to stdout.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: ReportFormatArg,

    /// Also write the JSON report to this file.
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct RulesArgs {
    /// JSON rule list (default: built-in rules).
    #[arg(long = "rules", value_name = "FILE")]
    pub rules: Option<PathBuf>,
}

#[derive(Parser)]
pub struct RowsArgs {
    /// Envelope file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Group type, e.g. XML3.
    #[arg(long = "group", value_name = "TYPE")]
    pub group: String,

    /// Claim key (MA_LK); defaults to the first claim in the envelope.
    #[arg(long = "claim", value_name = "ID")]
    pub claim: Option<String>,

    /// JSON rule list used to mark rows with results (default: built-in rules).
    #[arg(long = "rules", value_name = "FILE")]
    pub rules: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormatArg {
    Table,
    Json,
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
