//! String key-value persistence
//!
//! Features:
//! - Storage-agnostic [`KeyValueStore`] trait (LocalStorage on web, memory on native)
//! - Tolerant typed readers: missing or corrupt values read as "absent"
//! - Fire-and-forget writes (failures are logged, never surfaced)

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Storage keys for everything the game persists
pub mod keys {
    pub const AUTH: &str = "clickaway_is_authed";
    pub const COINS: &str = "clickaway_coins";
    pub const OWNED_ITEMS: &str = "clickaway_owned_items";
    pub const EQUIPPED_BUTTON_SKIN: &str = "clickaway_equipped_button_skin";
    pub const EQUIPPED_ARENA_THEME: &str = "clickaway_equipped_arena_theme";
    pub const SELECTED_DIFFICULTY: &str = "clickaway_selected_difficulty";
    pub const ROUND_HISTORY: &str = "clickaway_round_history";
}

/// Why a write did not land
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Backend unavailable (e.g. private browsing, no window)
    Unavailable,
    /// Backend refused the write (e.g. quota exceeded)
    WriteFailed(String),
    /// Value could not be encoded
    Encode(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "storage is unavailable"),
            Self::WriteFailed(msg) => write!(f, "storage write failed: {}", msg),
            Self::Encode(msg) => write!(f, "could not encode value: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

/// Minimal string key-value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str);
}

/// In-memory store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store
    pub fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// `true` only for the literal string "true"
pub fn read_bool(store: &dyn KeyValueStore, key: &str) -> bool {
    store.get(key).is_some_and(|v| v == "true")
}

/// Non-negative integer, or `fallback` when missing or malformed
pub fn read_u64(store: &dyn KeyValueStore, key: &str, fallback: u64) -> u64 {
    let Some(raw) = store.get(key) else {
        return fallback;
    };
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<u64>() {
        return value;
    }
    // Older writers may have stored a float like "12.0"
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value.floor() as u64,
        _ => {
            log::warn!("Ignoring malformed number in '{}'", key);
            fallback
        }
    }
}

/// Non-empty string, or `fallback`
pub fn read_string(store: &dyn KeyValueStore, key: &str, fallback: &str) -> String {
    store
        .get(key)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// JSON value, or `None` when missing or unparseable
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("Ignoring corrupt JSON in '{}': {}", key, err);
            None
        }
    }
}

/// JSON array, skipping elements that do not parse; empty when missing or not an array
pub fn read_json_array<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Vec<T> {
    let Some(values) = read_json::<Vec<serde_json::Value>>(store, key) else {
        return Vec::new();
    };
    let total = values.len();
    let parsed: Vec<T> = values
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();
    if parsed.len() != total {
        log::warn!("Dropped {} malformed entries from '{}'", total - parsed.len(), key);
    }
    parsed
}

/// Write a plain string, logging failures
pub fn write_string(store: &mut dyn KeyValueStore, key: &str, value: &str) {
    if let Err(err) = store.set(key, value) {
        log::warn!("Failed to save '{}': {}", key, err);
    }
}

/// Write a JSON-encoded value, logging failures
pub fn write_json<T: Serialize + ?Sized>(store: &mut dyn KeyValueStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => write_string(store, key, &json),
        Err(err) => log::warn!("{}", StorageError::Encode(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bool() {
        let store = MemoryStore::with_values([("a", "true"), ("b", "yes"), ("c", "TRUE")]);
        assert!(read_bool(&store, "a"));
        assert!(!read_bool(&store, "b"));
        assert!(!read_bool(&store, "c"));
        assert!(!read_bool(&store, "missing"));
    }

    #[test]
    fn test_read_u64_tolerates_garbage() {
        let store = MemoryStore::with_values([
            ("ok", "42"),
            ("float", "12.7"),
            ("neg", "-5"),
            ("text", "lots"),
            ("inf", "inf"),
        ]);
        assert_eq!(read_u64(&store, "ok", 0), 42);
        assert_eq!(read_u64(&store, "float", 0), 12);
        assert_eq!(read_u64(&store, "neg", 7), 7);
        assert_eq!(read_u64(&store, "text", 7), 7);
        assert_eq!(read_u64(&store, "inf", 7), 7);
        assert_eq!(read_u64(&store, "missing", 3), 3);
    }

    #[test]
    fn test_read_string_falls_back_on_empty() {
        let store = MemoryStore::with_values([("empty", ""), ("set", "skin_neon")]);
        assert_eq!(read_string(&store, "empty", "d"), "d");
        assert_eq!(read_string(&store, "set", "d"), "skin_neon");
        assert_eq!(read_string(&store, "missing", "d"), "d");
    }

    #[test]
    fn test_read_json_array() {
        let store = MemoryStore::with_values([
            ("ids", r#"["a","b"]"#),
            ("mixed", r#"["a",3,"c"]"#),
            ("object", r#"{"a":1}"#),
            ("broken", "[\"a\""),
        ]);
        assert_eq!(read_json_array::<String>(&store, "ids"), vec!["a", "b"]);
        assert_eq!(read_json_array::<String>(&store, "mixed"), vec!["a", "c"]);
        assert!(read_json_array::<String>(&store, "object").is_empty());
        assert!(read_json_array::<String>(&store, "broken").is_empty());
        assert!(read_json_array::<String>(&store, "missing").is_empty());
    }

    #[test]
    fn test_write_json() {
        let mut store = MemoryStore::new();
        write_json(&mut store, "ids", &["x", "y"]);
        assert_eq!(store.get("ids").as_deref(), Some(r#"["x","y"]"#));
    }
}
