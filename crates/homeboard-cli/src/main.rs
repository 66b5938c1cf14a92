//! Homeboard admin CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use homeboard_cli::cli::{Cli, LogFormatArg, LogLevelArg};
use homeboard_cli::commands::{Outcome, Workspace, degraded_notice, execute};
use homeboard_cli::logging::{LogConfig, LogFormat, init_logging};
use homeboard_cli::settings::Settings;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let mut settings = Settings::load(cli.config.as_deref());
    if let Some(dir) = &cli.data_dir {
        settings.storage.data_dir = Some(dir.clone());
    }
    let config_path = cli.config.clone().unwrap_or_else(Settings::config_path);
    let workspace = Workspace::open(settings, config_path);

    let exit_code = match execute(&workspace, cli.command) {
        Ok(outcome) => {
            print_outcome(&outcome);
            0
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    if workspace.is_degraded() {
        eprintln!("warning: {}", degraded_notice());
    }
    std::process::exit(exit_code);
}

fn print_outcome(outcome: &Outcome) {
    if let Some(body) = &outcome.body {
        println!("{body}");
    }
    println!("{}", outcome.summary);
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
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
