//! Layered configuration resolution.
//!
//! Resolves one configuration tree from a YAML file, environment variables
//! and command-line flags, then reports any values left unset.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
