//! Command-line argument source.
//!
//! One long flag is generated per schema key (`db.host` becomes
//! `--db_host`). Flag ids keep the dotted key, so parsed values are
//! returned under the same keys the store uses.

use super::{Source, SourceKind, SourcePair};
use crate::config::flatten::{FlatConfig, KEY_SEPARATOR, flatten};
use crate::error::ConfigResult;
use clap::{Arg, ArgAction, Command, value_parser};
use serde_json::Value;
use std::collections::HashSet;
use std::ffi::OsString;
use tracing::warn;

/// Long flag name for a dotted key.
pub fn flag_name(key: &str) -> String {
    key.replace(KEY_SEPARATOR, "_")
}

/// Clap rejects long names that are empty, start with `-` or contain `=`.
fn is_valid_flag(long: &str) -> bool {
    !long.is_empty() && !long.starts_with('-') && !long.contains('=')
}

/// Parses an argument vector against flags generated from the schema.
#[derive(Debug, Clone)]
pub struct ArgSource {
    args: Vec<OsString>,
    help: FlatConfig,
}

impl ArgSource {
    /// Parse an explicit argument vector. The first element is the program name.
    pub fn new<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            help: FlatConfig::new(),
        }
    }

    /// Parse the process argument vector.
    pub fn from_env() -> Self {
        Self::new(std::env::args_os())
    }

    /// Replace the argument vector, keeping any help text.
    pub fn with_args<I, T>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Attach help text, given as a tree shaped like the configuration.
    pub fn with_help(mut self, help: &Value) -> Self {
        self.help = flatten(help);
        self
    }

    /// Help text for a key, empty when none was given.
    pub fn help_for(&self, key: &str) -> String {
        match self.help.get(key) {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    /// Build the parser for `schema`, returning it with the keys it declares.
    pub fn command(&self, schema: &FlatConfig) -> (Command, Vec<String>) {
        let mut command = Command::new("app")
            .about("Configuration overrides")
            .disable_version_flag(true);
        let mut declared = Vec::new();
        let mut longs = HashSet::new();

        for key in schema.keys() {
            let long = flag_name(key);
            if long == "help" {
                warn!(key = %key, "Configuration key collides with --help, no flag generated");
                continue;
            }
            if !is_valid_flag(&long) {
                warn!(key = %key, flag = %long, "Configuration key is not a usable flag name, skipping");
                continue;
            }
            if !longs.insert(long.clone()) {
                warn!(key = %key, flag = %long, "Duplicate flag for configuration key, skipping");
                continue;
            }
            command = command.arg(
                Arg::new(key.clone())
                    .long(long)
                    .value_name("VALUE")
                    .help(self.help_for(key))
                    .action(ArgAction::Set)
                    .value_parser(value_parser!(String)),
            );
            declared.push(key.clone());
        }
        (command, declared)
    }
}

impl Source for ArgSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Arguments
    }

    fn read(&self, schema: &FlatConfig) -> ConfigResult<Vec<SourcePair>> {
        let (command, declared) = self.command(schema);
        let matches = command.try_get_matches_from(self.args.iter())?;

        let pairs = declared
            .into_iter()
            .filter_map(|key| {
                let value = matches.get_one::<String>(&key)?.clone();
                Some((key, Value::String(value)))
            })
            .collect();
        Ok(pairs)
    }
}
