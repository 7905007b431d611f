//! Input sources that contribute values to a configuration schema.
//!
//! Each source is handed the current flattened configuration (the schema)
//! and returns the `(dotted key, value)` pairs it found. Keys a source has
//! no value for are left out, so the existing value stays in place.

mod args;
mod env;
mod file;

pub use args::{ArgSource, flag_name};
pub use env::{EnvLookup, EnvSource, env_var_name};
pub use file::{DEFAULT_CONFIG_PATH, FileSource};

use super::flatten::FlatConfig;
use crate::error::ConfigResult;
use serde_json::Value;

/// One value found by a source.
pub type SourcePair = (String, Value);

/// Where a value came from, ordered lowest priority to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceKind {
    /// Configuration file (lowest priority)
    File = 0,
    /// Environment variables
    Environment = 1,
    /// Command-line arguments (highest priority)
    Arguments = 2,
}

impl SourceKind {
    /// All sources in the order they are applied.
    pub const APPLY_ORDER: [SourceKind; 3] = [
        SourceKind::File,
        SourceKind::Environment,
        SourceKind::Arguments,
    ];
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::File => write!(f, "file"),
            SourceKind::Environment => write!(f, "environment"),
            SourceKind::Arguments => write!(f, "arguments"),
        }
    }
}

/// Produces configuration values from one input.
pub trait Source {
    fn kind(&self) -> SourceKind;

    /// Collect the values this source provides for keys in `schema`.
    fn read(&self, schema: &FlatConfig) -> ConfigResult<Vec<SourcePair>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_order_is_ascending_priority() {
        let mut sorted = SourceKind::APPLY_ORDER;
        sorted.sort();
        assert_eq!(sorted, SourceKind::APPLY_ORDER);
        assert!(SourceKind::Arguments > SourceKind::Environment);
        assert!(SourceKind::Environment > SourceKind::File);
    }

    #[test]
    fn test_display() {
        assert_eq!(SourceKind::File.to_string(), "file");
        assert_eq!(SourceKind::Environment.to_string(), "environment");
        assert_eq!(SourceKind::Arguments.to_string(), "arguments");
    }
}
