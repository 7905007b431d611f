//! Completeness check over a flattened configuration.

use super::flatten::FlatConfig;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// True when `value` is the unset sentinel (an empty string).
pub fn is_unset(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.is_empty())
}

/// Outcome of a completeness check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Verification {
    unset: Vec<String>,
}

impl Verification {
    /// True when every key has a value.
    pub fn is_complete(&self) -> bool {
        self.unset.is_empty()
    }

    /// Keys still holding the sentinel, in schema order.
    pub fn unset_keys(&self) -> &[String] {
        &self.unset
    }

    pub fn into_unset_keys(self) -> Vec<String> {
        self.unset
    }
}

/// Report every key still holding the sentinel.
///
/// Emits one `warn!` per unset key rather than a single aggregated message.
pub fn verify(flat: &FlatConfig) -> Verification {
    let unset: Vec<String> = flat
        .iter()
        .filter(|(_, value)| is_unset(value))
        .map(|(key, _)| key.clone())
        .collect();

    for key in &unset {
        warn!(key = %key, "Configuration value is not set");
    }
    Verification { unset }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::flatten::flatten;
    use serde_json::json;

    #[test]
    fn test_is_unset() {
        assert!(is_unset(&json!("")));
        assert!(!is_unset(&json!(" ")));
        assert!(!is_unset(&json!(0)));
        assert!(!is_unset(&json!(false)));
        assert!(!is_unset(&Value::Null));
    }

    #[test]
    fn test_complete_config() {
        let result = verify(&flatten(&json!({"db": {"host": "h", "port": 1}})));
        assert!(result.is_complete());
        assert!(result.unset_keys().is_empty());
    }

    #[test]
    fn test_unset_keys_listed_in_order() {
        let result = verify(&flatten(&json!({
            "db": {"host": "", "port": 5432, "user": ""},
            "name": ""
        })));
        assert!(!result.is_complete());
        assert_eq!(result.unset_keys(), ["db.host", "db.user", "name"]);
    }

    #[test]
    fn test_one_warning_per_unset_key() {
        use std::io::Write;
        use std::sync::{Arc, Mutex};
        use tracing::Level;
        use tracing_subscriber::FmtSubscriber;
        use tracing_subscriber::fmt::MakeWriter;

        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl Write for Captured {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        impl<'a> MakeWriter<'a> for Captured {
            type Writer = Captured;

            fn make_writer(&'a self) -> Self::Writer {
                self.clone()
            }
        }

        let captured = Captured::default();
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::WARN)
            .with_writer(captured.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            verify(&flatten(&json!({"db": {"host": "", "port": 1, "user": ""}})));
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let warnings: Vec<&str> = output
            .lines()
            .filter(|line| line.contains("Configuration value is not set"))
            .collect();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("key=db.host"));
        assert!(warnings[1].contains("key=db.user"));
    }

    #[test]
    fn test_serializes_unset_list() {
        let result = verify(&flatten(&json!({"a": ""})));
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({"unset": ["a"]}));
    }
}
