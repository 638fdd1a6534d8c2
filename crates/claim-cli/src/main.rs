//! Claim envelope checker CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use claim_cli::commands::{load_rule_list, run_check, run_rows, write_json_report};
use claim_cli::logging::{LogConfig, LogFormat, init_logging};
use claim_validate::RuleSet;
use tracing::level_filters::LevelFilter;

mod cli;
mod summary;

use crate::cli::{CheckArgs, Cli, Command, LogFormatArg, LogLevelArg, ReportFormatArg};
use crate::summary::{print_check_summary, print_rows, print_rules};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let outcome = match &cli.command {
        Command::Check(args) => check(args),
        Command::Rules(args) => load_rule_list(args.rules.as_deref()).map(|rules| {
            print_rules(&RuleSet::compile(rules));
            0
        }),
        Command::Rows(args) => run_rows(
            &args.file,
            &args.group,
            args.claim.as_deref(),
            args.rules.as_deref(),
        )
        .map(|view| {
            print_rows(&view);
            0
        }),
    };
    let exit_code = match outcome {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn check(args: &CheckArgs) -> anyhow::Result<i32> {
    let report = run_check(&args.paths, args.rules.as_deref())?;
    if let Some(path) = &args.output {
        write_json_report(&report, path)?;
    }
    match args.format {
        ReportFormatArg::Table => print_check_summary(&report),
        ReportFormatArg::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(if report.has_failures() { 1 } else { 0 })
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
