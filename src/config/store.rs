//! Owner of the configuration tree and its flattened view.

use super::flatten::{FlatConfig, KEY_SEPARATOR, flatten};
use crate::error::{ConfigError, ConfigResult};
use serde_json::{Map, Value};
use std::cell::OnceCell;
use tracing::warn;

/// Nested configuration plus a memoized flattened view.
///
/// All mutation goes through [`ConfigStore::set`], which writes both views,
/// so the flattened key set always matches the tree's leaves.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    tree: Value,
    flat: OnceCell<FlatConfig>,
}

impl ConfigStore {
    /// Take ownership of an initial configuration tree.
    ///
    /// The root must be a mapping; any other root is replaced by an empty one.
    pub fn new(tree: Value) -> Self {
        let tree = match tree {
            Value::Object(_) => tree,
            Value::Null => Value::Object(Map::new()),
            other => {
                warn!(root = %other, "Configuration root is not a mapping, starting empty");
                Value::Object(Map::new())
            }
        };
        for path in dotted_segment_paths(&tree) {
            warn!(
                path = %path,
                "Schema segment contains '.', values for keys below it cannot be set"
            );
        }
        Self {
            tree,
            flat: OnceCell::new(),
        }
    }

    /// The flattened view, computed on first access.
    pub fn flattened(&self) -> &FlatConfig {
        self.flat.get_or_init(|| flatten(&self.tree))
    }

    /// Look up a leaf by dotted key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.flattened().get(key)
    }

    /// Iterate over every dotted key in the schema.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.flattened().keys().map(String::as_str)
    }

    pub fn tree(&self) -> &Value {
        &self.tree
    }

    /// Hand the nested configuration back to the caller.
    pub fn into_tree(self) -> Value {
        self.tree
    }

    /// Write `value` at `key` in both views.
    ///
    /// Fails without mutating anything when an intermediate segment is not an
    /// existing mapping, when `key` names a mapping node, or when `value` is
    /// itself a mapping.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> ConfigResult<()> {
        let value = value.into();
        if value.is_object() {
            return Err(ConfigError::section_value(key));
        }
        let (parent, leaf) = self.resolve_path(key)?;
        if matches!(parent.get(leaf), Some(Value::Object(_))) {
            return Err(ConfigError::not_a_leaf(key));
        }
        parent.insert(leaf.to_string(), value.clone());

        if let Some(flat) = self.flat.get_mut() {
            flat.insert(key.to_string(), value);
        }
        Ok(())
    }

    /// Resolve a dotted key to its parent mapping and final segment.
    fn resolve_path<'k>(
        &mut self,
        key: &'k str,
    ) -> ConfigResult<(&mut Map<String, Value>, &'k str)> {
        if key.split(KEY_SEPARATOR).any(str::is_empty) {
            return Err(ConfigError::key_not_found(key, ""));
        }
        let (parents, leaf) = match key.rsplit_once(KEY_SEPARATOR) {
            Some((parents, leaf)) => (Some(parents), leaf),
            None => (None, key),
        };

        let mut node = match &mut self.tree {
            Value::Object(map) => map,
            _ => return Err(ConfigError::key_not_found(key, "")),
        };
        if let Some(parents) = parents {
            for segment in parents.split(KEY_SEPARATOR) {
                node = match node.get_mut(segment) {
                    Some(Value::Object(child)) => child,
                    _ => return Err(ConfigError::key_not_found(key, segment)),
                };
            }
        }
        Ok((node, leaf))
    }
}

/// Paths (segments joined with '/') whose last segment contains the key separator.
fn dotted_segment_paths(tree: &Value) -> Vec<String> {
    fn walk(map: &Map<String, Value>, prefix: &str, out: &mut Vec<String>) {
        for (segment, value) in map {
            let path = if prefix.is_empty() {
                segment.clone()
            } else {
                format!("{prefix}/{segment}")
            };
            if segment.contains(KEY_SEPARATOR) {
                out.push(path.clone());
            }
            if let Value::Object(child) = value {
                walk(child, &path, out);
            }
        }
    }

    let mut out = Vec::new();
    if let Value::Object(map) = tree {
        walk(map, "", &mut out);
    }
    out
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(Value::Object(Map::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> ConfigStore {
        ConfigStore::new(json!({
            "db": {"host": "", "port": ""},
            "log": {"file": {"path": "/tmp/app.log"}},
            "debug": false
        }))
    }

    #[test]
    fn test_flattened_keys() {
        let store = store();
        let keys: Vec<&str> = store.keys().collect();
        assert_eq!(keys, vec!["db.host", "db.port", "log.file.path", "debug"]);
    }

    #[test]
    fn test_set_updates_both_views() {
        let mut store = store();
        store.flattened();
        store.set("db.host", "localhost").unwrap();

        assert_eq!(store.get("db.host"), Some(&json!("localhost")));
        assert_eq!(store.tree()["db"]["host"], json!("localhost"));
    }

    #[test]
    fn test_set_before_first_flatten_is_visible() {
        let mut store = store();
        store.set("log.file.path", "/var/log/app.log").unwrap();
        assert_eq!(store.get("log.file.path"), Some(&json!("/var/log/app.log")));
    }

    #[test]
    fn test_last_write_wins() {
        let mut store = store();
        store.set("db.port", 5432).unwrap();
        store.set("db.port", 6543).unwrap();

        assert_eq!(store.get("db.port"), Some(&json!(6543)));
        assert_eq!(store.tree()["db"]["port"], json!(6543));
    }

    #[test]
    fn test_missing_intermediate_fails_without_mutation() {
        let mut store = store();
        store.flattened();
        let before_tree = store.tree().clone();
        let before_flat = store.flattened().clone();

        let err = store.set("cache.ttl", 30).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::KeyNotFound { ref segment, .. } if segment == "cache"
        ));
        assert!(err.is_lookup());
        assert_eq!(store.tree(), &before_tree);
        assert_eq!(store.flattened(), &before_flat);
    }

    #[test]
    fn test_leaf_used_as_intermediate_fails() {
        let mut store = store();
        let err = store.set("debug.level", 1).unwrap_err();
        assert!(matches!(err, ConfigError::KeyNotFound { .. }));
    }

    #[test]
    fn test_section_cannot_be_overwritten() {
        let mut store = store();
        let err = store.set("db", "oops").unwrap_err();
        assert!(matches!(err, ConfigError::NotALeaf { .. }));
        assert_eq!(store.get("db.host"), Some(&json!("")));
    }

    #[test]
    fn test_empty_segment_rejected() {
        let mut store = store();
        assert!(store.set("db..host", "x").is_err());
        assert!(store.set("", "x").is_err());
    }

    #[test]
    fn test_resolve_path_returns_parent_and_leaf() {
        let mut store = store();
        let (parent, leaf) = store.resolve_path("log.file.path").unwrap();
        assert_eq!(leaf, "path");
        assert!(parent.contains_key("path"));
    }

    #[test]
    fn test_mapping_value_rejected_without_mutation() {
        let mut store = store();
        store.flattened();
        let before_tree = store.tree().clone();
        let before_flat = store.flattened().clone();

        let err = store.set("db.host", json!({"name": "x"})).unwrap_err();
        assert!(matches!(err, ConfigError::SectionValue { .. }));
        assert!(err.is_lookup());
        assert_eq!(store.tree(), &before_tree);
        assert_eq!(store.flattened(), &before_flat);
        assert_eq!(flatten(store.tree()), before_flat);
    }

    #[test]
    fn test_dotted_segments_detected() {
        let tree = json!({"a.b": {"c": ""}, "d": {"e.f": 1, "g": 2}, "h": ""});
        assert_eq!(dotted_segment_paths(&tree), vec!["a.b", "d/e.f"]);
        assert!(dotted_segment_paths(store().tree()).is_empty());
    }

    #[test]
    fn test_non_mapping_root_starts_empty() {
        let store = ConfigStore::new(json!([1, 2]));
        assert!(store.flattened().is_empty());
    }
}
