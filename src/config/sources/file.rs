//! YAML configuration file source.

use super::{Source, SourceKind, SourcePair};
use crate::config::flatten::{FlatConfig, flatten};
use crate::config::verify::is_unset;
use crate::error::{ConfigError, ConfigResult};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Path used when no configuration file is given.
pub const DEFAULT_CONFIG_PATH: &str = "./config.yaml";

/// Reads values from a YAML document.
///
/// A missing, unreadable or malformed file is not an error: it is logged
/// and contributes nothing. Empty-string and null leaves count as unset
/// and are skipped.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and parse the document, without applying any filtering.
    pub fn load(&self) -> ConfigResult<Value> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| ConfigError::source_unavailable(&self.path, e))?;
        serde_yaml::from_str::<Value>(&content)
            .map_err(|e| ConfigError::source_unavailable(&self.path, e))
    }
}

impl Default for FileSource {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_PATH)
    }
}

impl Source for FileSource {
    fn kind(&self) -> SourceKind {
        SourceKind::File
    }

    fn read(&self, schema: &FlatConfig) -> ConfigResult<Vec<SourcePair>> {
        let document = match self.load() {
            Ok(document) => document,
            Err(e) => {
                warn!("{e}");
                return Ok(Vec::new());
            }
        };

        match document {
            Value::Object(_) => {}
            Value::Null => {
                debug!(path = %self.path.display(), "Configuration file is empty");
                return Ok(Vec::new());
            }
            _ => {
                warn!(
                    path = %self.path.display(),
                    "Configuration file root is not a mapping, ignoring it"
                );
                return Ok(Vec::new());
            }
        }

        let mut pairs = Vec::new();
        for (key, value) in flatten(&document) {
            if value.is_null() || is_unset(&value) {
                continue;
            }
            if !schema.contains_key(&key) {
                warn!(
                    path = %self.path.display(),
                    key = %key,
                    "Ignoring configuration file key not present in schema"
                );
                continue;
            }
            pairs.push((key, value));
        }
        Ok(pairs)
    }
}
