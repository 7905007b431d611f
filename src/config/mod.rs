//! Configuration resolution.
//!
//! One configuration tree is filled from three sources, lowest priority first:
//! 1. **File** - a YAML document, `./config.yaml` by default
//! 2. **Environment** - `{PREFIX}_{KEY}`, e.g. `APP_DB_HOST` for `db.host`
//! 3. **Arguments** - `--{key}` with dots as underscores, e.g. `--db_host`
//!
//! Keys are dotted paths into the tree. A leaf holding an empty string is
//! unset; after all sources are applied, every unset key is reported.

mod flatten;
mod resolver;
pub mod sources;
mod store;
mod verify;

pub use flatten::{FlatConfig, KEY_SEPARATOR, flatten, unflatten};
pub use resolver::ConfigReader;
pub use sources::{
    ArgSource, DEFAULT_CONFIG_PATH, EnvSource, FileSource, Source, SourceKind, env_var_name,
    flag_name,
};
pub use store::ConfigStore;
pub use verify::{Verification, is_unset, verify};
