//! layerconf
//!
//! Resolves a configuration schema against a YAML file, the process
//! environment and forwarded command-line flags.

use anyhow::{Context, Result};
use clap::Parser;
use layerconf::cli::Cli;
use layerconf::config::{ConfigReader, FileSource};
use layerconf::error::ConfigError;
use layerconf::format::{Report, render};
use std::fs::OpenOptions;
use std::io::Write;
use std::process::ExitCode;
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

fn init_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)
                .with_context(|| format!("opening log file {filename}"))?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    // The schema itself must load; only the config file is optional.
    let schema = FileSource::new(&cli.schema)
        .load()
        .context("loading schema")?;
    let mut reader = ConfigReader::new(schema, cli.prefix.clone())
        .with_file(&cli.config)
        .with_args(cli.forwarded_args());

    if let Some(path) = &cli.help_tree {
        let help = FileSource::new(path).load().context("loading help tree")?;
        reader = reader.with_help(&help);
    }
    debug!(config = %reader.file_path().display(), prefix = %cli.prefix, "Resolving configuration");

    let verification = match reader.resolve() {
        Ok(verification) => verification,
        Err(ConfigError::Arguments(err)) => err.exit(),
        Err(err) => return Err(err.into()),
    };

    let config = reader.into_tree();
    let output = if cli.report {
        render(&Report::new(&config, &verification), cli.format)?
    } else {
        render(&config, cli.format)?
    };
    std::io::stdout().write_all(output.as_bytes())?;

    Ok(if verification.is_complete() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
