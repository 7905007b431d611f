//! Conversion between nested configuration trees and dotted-path maps.
//!
//! Only leaves are emitted. Mapping nodes contribute their children and
//! never appear as keys themselves; arrays are treated as opaque leaves.

use serde_json::{Map, Value};

/// Separator between path segments in a flattened key.
pub const KEY_SEPARATOR: char = '.';

/// Dotted-path key to leaf value.
pub type FlatConfig = Map<String, Value>;

/// Flatten a configuration tree into dotted-path keys.
///
/// A non-mapping root has no path, so it flattens to an empty map.
///
/// # Example
/// ```
/// use serde_json::json;
/// use layerconf::config::flatten;
///
/// let flat = flatten(&json!({"db": {"host": "", "port": 5432}}));
/// assert_eq!(flat["db.host"], json!(""));
/// assert_eq!(flat["db.port"], json!(5432));
/// ```
pub fn flatten(tree: &Value) -> FlatConfig {
    let mut flat = FlatConfig::new();
    if let Value::Object(map) = tree {
        flatten_into(map, None, &mut flat);
    }
    flat
}

fn flatten_into(map: &Map<String, Value>, prefix: Option<&str>, out: &mut FlatConfig) {
    for (segment, value) in map {
        let key = match prefix {
            Some(prefix) => format!("{prefix}{KEY_SEPARATOR}{segment}"),
            None => segment.clone(),
        };
        match value {
            Value::Object(child) => flatten_into(child, Some(&key), out),
            leaf => {
                out.insert(key, leaf.clone());
            }
        }
    }
}

/// Rebuild a nested tree from dotted-path keys.
///
/// When one key is a prefix of another (`a` and `a.b`), the later entry
/// wins and replaces the earlier node.
pub fn unflatten(flat: &FlatConfig) -> Value {
    let mut root = Map::new();
    for (key, value) in flat {
        let segments: Vec<&str> = key.split(KEY_SEPARATOR).collect();
        insert_path(&mut root, &segments, value.clone());
    }
    Value::Object(root)
}

fn insert_path(node: &mut Map<String, Value>, segments: &[&str], value: Value) {
    match segments {
        [] => {}
        [leaf] => {
            node.insert(leaf.to_string(), value);
        }
        [head, rest @ ..] => {
            let child = node
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(map) = child {
                insert_path(map, rest, value);
            }
        }
    }
}
