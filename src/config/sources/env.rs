//! Environment variable source.

use super::{Source, SourceKind, SourcePair};
use crate::config::flatten::{FlatConfig, KEY_SEPARATOR};
use crate::error::ConfigResult;
use serde_json::Value;
use std::ffi::OsString;
use std::fmt;
use tracing::warn;

/// Looks up a variable by name; `None` means the variable is not defined.
pub type EnvLookup = Box<dyn Fn(&str) -> Option<String>>;

/// Variable name for a dotted key: `APP` + `db.host` gives `APP_DB_HOST`.
pub fn env_var_name(prefix: &str, key: &str) -> String {
    let key = key.replace(KEY_SEPARATOR, "_").to_uppercase();
    if prefix.is_empty() {
        key
    } else {
        format!("{prefix}_{key}")
    }
}

/// Decode a process variable, treating non-Unicode values as absent.
fn decode_var(name: &str, value: Option<OsString>) -> Option<String> {
    match value?.into_string() {
        Ok(value) => Some(value),
        Err(raw) => {
            warn!(
                variable = %name,
                value = %raw.to_string_lossy(),
                "Environment variable is not valid Unicode, ignoring it"
            );
            None
        }
    }
}

/// Reads one variable per schema key.
///
/// A defined variable is applied even when empty.
pub struct EnvSource {
    prefix: String,
    lookup: EnvLookup,
}

impl EnvSource {
    /// Read from the process environment.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::with_lookup(prefix, |name| decode_var(name, std::env::var_os(name)))
    }

    /// Read through an explicit lookup function.
    pub fn with_lookup(
        prefix: impl Into<String>,
        lookup: impl Fn(&str) -> Option<String> + 'static,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            lookup: Box::new(lookup),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl fmt::Debug for EnvSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvSource")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl Source for EnvSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Environment
    }

    fn read(&self, schema: &FlatConfig) -> ConfigResult<Vec<SourcePair>> {
        let pairs = schema
            .keys()
            .filter_map(|key| {
                let name = env_var_name(&self.prefix, key);
                (self.lookup)(&name).map(|value| (key.clone(), Value::String(value)))
            })
            .collect();
        Ok(pairs)
    }
}
