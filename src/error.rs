//! Error types for configuration resolution.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving a configuration.
///
/// Only the lookup failures and [`ConfigError::Arguments`] ever escape [`crate::config::ConfigReader::read`].
/// An unavailable configuration file is logged and skipped.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A segment of the dotted key does not name an existing mapping node.
    #[error("configuration key '{key}' does not exist: no mapping at '{segment}'")]
    KeyNotFound { key: String, segment: String },

    /// The dotted key points at a mapping node rather than a leaf.
    #[error("configuration key '{key}' names a section, not a value")]
    NotALeaf { key: String },

    /// A mapping was given as the value for a leaf.
    #[error("configuration key '{key}' cannot take a section as its value")]
    SectionValue { key: String },

    /// The configuration file could not be read or parsed.
    #[error("configuration file {path} unavailable: {reason}", path = .path.display())]
    SourceUnavailable { path: PathBuf, reason: String },

    /// The argument vector did not match the generated flags.
    #[error(transparent)]
    Arguments(#[from] clap::Error),
}

impl ConfigError {
    pub fn key_not_found(key: &str, segment: &str) -> Self {
        Self::KeyNotFound {
            key: key.to_string(),
            segment: segment.to_string(),
        }
    }

    pub fn not_a_leaf(key: &str) -> Self {
        Self::NotALeaf {
            key: key.to_string(),
        }
    }

    pub fn section_value(key: &str) -> Self {
        Self::SectionValue {
            key: key.to_string(),
        }
    }

    pub fn source_unavailable(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True for the lookup failures raised by [`crate::config::ConfigStore::set`].
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            Self::KeyNotFound { .. } | Self::NotALeaf { .. } | Self::SectionValue { .. }
        )
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
