//! Output formatting for resolved configurations.

use crate::config::Verification;
use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;

/// Output format for the resolved configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Resolved configuration together with its completeness report.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub complete: bool,
    pub unset: &'a [String],
    pub config: &'a Value,
}

impl<'a> Report<'a> {
    pub fn new(config: &'a Value, verification: &'a Verification) -> Self {
        Self {
            complete: verification.is_complete(),
            unset: verification.unset_keys(),
            config,
        }
    }
}

/// Render any serializable value in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(value)?;
            json.push('\n');
            json
        }
    };
    Ok(rendered)
}
