//! Resolution of one configuration from file, environment and arguments.

use super::sources::{
    ArgSource, DEFAULT_CONFIG_PATH, EnvSource, FileSource, Source, SourceKind,
};
use super::store::ConfigStore;
use super::verify::{Verification, verify};
use crate::error::ConfigResult;
use serde_json::Value;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Resolves a configuration tree against its three sources.
///
/// Sources are applied lowest priority first (file, environment, then
/// arguments), so later sources overwrite earlier ones. Every source is
/// consulted on each [`ConfigReader::read`].
///
/// # Example
/// ```
/// use serde_json::json;
/// use layerconf::config::ConfigReader;
///
/// let mut reader = ConfigReader::new(json!({"db": {"host": "", "port": ""}}), "APP")
///     .with_file("/nonexistent/config.yaml")
///     .with_args(["app", "--db_port", "5432"])
///     .with_env_lookup(|name| (name == "APP_DB_HOST").then(|| "localhost".to_string()));
///
/// assert!(reader.read().unwrap());
/// assert_eq!(reader.get("db.host"), Some(&json!("localhost")));
/// assert_eq!(reader.get("db.port"), Some(&json!("5432")));
/// ```
#[derive(Debug)]
pub struct ConfigReader {
    store: ConfigStore,
    file: FileSource,
    env: EnvSource,
    args: ArgSource,
}

impl ConfigReader {
    /// Create a reader over `tree`, using the process environment and
    /// arguments and `./config.yaml`.
    pub fn new(tree: Value, env_prefix: impl Into<String>) -> Self {
        Self {
            store: ConfigStore::new(tree),
            file: FileSource::new(DEFAULT_CONFIG_PATH),
            env: EnvSource::new(env_prefix),
            args: ArgSource::from_env(),
        }
    }

    /// Help text for the generated flags, shaped like the configuration.
    pub fn with_help(mut self, help: &Value) -> Self {
        self.args = self.args.with_help(help);
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = FileSource::new(path);
        self
    }

    /// Parse `args` instead of the process arguments. The first element is
    /// the program name.
    pub fn with_args<I, T>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        self.args = self.args.with_args(args);
        self
    }

    /// Look up environment variables through `lookup` instead of the process.
    pub fn with_env_lookup(mut self, lookup: impl Fn(&str) -> Option<String> + 'static) -> Self {
        let prefix = self.env.prefix().to_string();
        self.env = EnvSource::with_lookup(prefix, lookup);
        self
    }

    pub fn file_path(&self) -> &Path {
        self.file.path()
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.store.get(key)
    }

    /// Hand the resolved configuration tree back to the caller.
    pub fn into_tree(self) -> Value {
        self.store.into_tree()
    }

    /// Apply all sources, then check that every key has a value.
    ///
    /// Returns `Ok(false)` when some keys are still unset; each of them has
    /// already been logged.
    pub fn read(&mut self) -> ConfigResult<bool> {
        Ok(self.resolve()?.is_complete())
    }

    /// Like [`ConfigReader::read`], returning the full [`Verification`].
    pub fn resolve(&mut self) -> ConfigResult<Verification> {
        for kind in SourceKind::APPLY_ORDER {
            let source: &dyn Source = match kind {
                SourceKind::File => &self.file,
                SourceKind::Environment => &self.env,
                SourceKind::Arguments => &self.args,
            };
            let applied = apply(&mut self.store, source)?;
            debug!(source = %source.kind(), applied, "Source applied");
        }

        let verification = verify(self.store.flattened());
        info!(
            keys = self.store.flattened().len(),
            unset = verification.unset_keys().len(),
            "Configuration resolved"
        );
        Ok(verification)
    }
}

/// Write every pair `source` provides into `store`.
fn apply(store: &mut ConfigStore, source: &dyn Source) -> ConfigResult<usize> {
    let pairs = source.read(store.flattened())?;
    let count = pairs.len();
    for (key, value) in pairs {
        debug!(source = %source.kind(), key = %key, "Applying configuration value");
        store.set(&key, value)?;
    }
    Ok(count)
}
