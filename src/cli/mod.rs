//! CLI definitions for the `layerconf` binary.
//!
//! The binary resolves a schema against a config file, the process
//! environment and any arguments given after `--`, then prints the result.

use crate::config::DEFAULT_CONFIG_PATH;
use crate::format::OutputFormat;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "APP";

/// Resolve a configuration from file, environment and arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// YAML file holding the configuration schema (empty strings mark unset values)
    #[arg(short, long)]
    pub schema: PathBuf,

    /// YAML file holding help text, shaped like the schema
    #[arg(long)]
    pub help_tree: Option<PathBuf>,

    /// Path to the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Environment variable prefix
    #[arg(short, long, default_value = DEFAULT_ENV_PREFIX)]
    pub prefix: String,

    /// Output format for the resolved configuration
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,

    /// Print the completeness report alongside the configuration
    #[arg(long)]
    pub report: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2")]
    pub log: String,

    /// Arguments forwarded to the configuration flags, e.g. `-- --db_host localhost`
    #[arg(last = true)]
    pub args: Vec<OsString>,
}

impl Cli {
    /// Argument vector for the configuration flags, with a program name in front.
    pub fn forwarded_args(&self) -> Vec<OsString> {
        std::iter::once(OsString::from(env!("CARGO_PKG_NAME")))
            .chain(self.args.iter().cloned())
            .collect()
    }
}
