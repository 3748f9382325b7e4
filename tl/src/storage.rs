//! Storage adapter: the persistence trust boundary
//!
//! Everything read back from the key-value slot is untrusted: it may come
//! from an older schema, an out-of-band edit, or plain corruption. `load`
//! validates each element independently and drops the bad ones; `save` is
//! best-effort. Neither ever surfaces an error to its caller: failures
//! degrade to diagnostics, and the in-memory state stays authoritative.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use chrono::DateTime;
use eyre::{Context, Result};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::TASKS_KEY;
use crate::now_ms;
use crate::task::Task;

/// A key-value persistence facility
pub trait KeyValue {
    /// Read the value stored at `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` at `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// File-backed store: one file per key under a base directory
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }
}

impl KeyValue for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content =
            fs::read_to_string(&path).context(format!("Failed to read {}", path.display()))?;
        Ok(Some(content))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.base_dir).context("Failed to create store directory")?;
        let path = self.key_path(key);
        fs::write(&path, value).context(format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

/// In-memory store for tests and hosts without a filesystem
#[derive(Default)]
pub struct MemoryStore {
    slots: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValue for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Why a persisted element was rejected
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeReject {
    #[error("element is not an object")]
    NotAnObject,

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{0}` has the wrong type")]
    WrongType(&'static str),
}

/// Validate one persisted element into a `Task`.
///
/// Required: string `id`, string `text`, boolean `completed`. Timestamps
/// accept epoch-millisecond numbers or RFC 3339 strings; a missing or
/// invalid `createdAt` falls back to the current time, a bad `updatedAt`
/// is dropped.
pub fn decode_task(value: &Value) -> Result<Task, DecodeReject> {
    let obj = value.as_object().ok_or(DecodeReject::NotAnObject)?;

    let id = obj
        .get("id")
        .ok_or(DecodeReject::MissingField("id"))?
        .as_str()
        .ok_or(DecodeReject::WrongType("id"))?
        .to_string();

    let text = obj
        .get("text")
        .ok_or(DecodeReject::MissingField("text"))?
        .as_str()
        .ok_or(DecodeReject::WrongType("text"))?
        .to_string();

    let completed = obj
        .get("completed")
        .ok_or(DecodeReject::MissingField("completed"))?
        .as_bool()
        .ok_or(DecodeReject::WrongType("completed"))?;

    let created_at = obj
        .get("createdAt")
        .and_then(parse_timestamp)
        .unwrap_or_else(now_ms);
    let updated_at = obj.get("updatedAt").and_then(parse_timestamp);

    Ok(Task {
        id,
        text,
        completed,
        created_at,
        updated_at,
    })
}

/// Accept epoch-millisecond numbers (integer or float) or RFC 3339 strings
fn parse_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.timestamp_millis()),
        _ => None,
    }
}

/// Reads and writes the persisted task list through a `KeyValue` facility
pub struct StorageAdapter {
    kv: Box<dyn KeyValue>,
    key: String,
}

impl StorageAdapter {
    /// Adapter over the default `tasks` slot
    pub fn new(kv: Box<dyn KeyValue>) -> Self {
        Self::with_key(kv, TASKS_KEY)
    }

    /// Adapter over a non-default slot key
    pub fn with_key(kv: Box<dyn KeyValue>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    /// Load the persisted task list.
    ///
    /// Degrades instead of failing: an absent slot, an unreadable store, or
    /// a malformed payload yields whatever valid subset remains (possibly
    /// nothing). Elements repeating an already-loaded id are dropped to keep
    /// the uniqueness invariant.
    pub fn load(&self) -> Vec<Task> {
        let raw = match self.kv.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "no persisted tasks");
                return Vec::new();
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read persisted tasks");
                return Vec::new();
            }
        };

        let parsed: Value = match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                warn!(key = %self.key, error = %e, "persisted tasks are not valid JSON");
                return Vec::new();
            }
        };

        let Some(elements) = parsed.as_array() else {
            warn!(key = %self.key, "persisted tasks are not an array");
            return Vec::new();
        };

        let mut tasks: Vec<Task> = Vec::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            match decode_task(element) {
                Ok(task) => {
                    if tasks.iter().any(|t| t.id == task.id) {
                        warn!(index, id = %task.id, "dropping element with duplicate id");
                    } else {
                        tasks.push(task);
                    }
                }
                Err(reject) => {
                    warn!(index, %reject, "dropping malformed element");
                }
            }
        }

        debug!(key = %self.key, count = tasks.len(), "loaded persisted tasks");
        tasks
    }

    /// Best-effort write of the full task list.
    ///
    /// Failures (quota, disabled storage, unwritable directory) are logged
    /// and swallowed; the caller's in-memory state stays authoritative.
    pub fn save(&self, tasks: &[Task]) {
        let encoded = match serde_json::to_string(tasks) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "failed to encode tasks");
                return;
            }
        };

        if let Err(e) = self.kv.set(&self.key, &encoded) {
            warn!(key = %self.key, error = %e, "failed to persist tasks");
        } else {
            debug!(key = %self.key, count = tasks.len(), "persisted tasks");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn memory_adapter() -> StorageAdapter {
        StorageAdapter::new(Box::new(MemoryStore::new()))
    }

    fn task(id: &str, text: &str, completed: bool) -> Task {
        Task {
            id: id.to_string(),
            text: text.to_string(),
            completed,
            created_at: 1_700_000_000_000,
            updated_at: completed.then_some(1_700_000_100_000),
        }
    }

    #[test]
    fn test_load_absent_slot_is_empty() {
        assert!(memory_adapter().load().is_empty());
    }

    #[test]
    fn test_round_trip() {
        let adapter = memory_adapter();
        let tasks = vec![task("task-1", "Buy milk", false), task("task-2", "Walk dog", true)];

        adapter.save(&tasks);
        assert_eq!(adapter.load(), tasks);
    }

    #[test]
    fn test_load_garbage_is_empty() {
        let kv = MemoryStore::new();
        kv.set(TASKS_KEY, "not json at all {{{").unwrap();
        let adapter = StorageAdapter::new(Box::new(kv));
        assert!(adapter.load().is_empty());
    }

    #[test]
    fn test_load_non_array_is_empty() {
        let kv = MemoryStore::new();
        kv.set(TASKS_KEY, r#"{"id":"task-1"}"#).unwrap();
        let adapter = StorageAdapter::new(Box::new(kv));
        assert!(adapter.load().is_empty());
    }

    #[test]
    fn test_load_skips_bad_elements_keeps_good() {
        let kv = MemoryStore::new();
        let blob = json!([
            { "id": "task-1", "text": "Valid", "completed": false, "createdAt": 1_700_000_000_000i64 },
            "not an object",
            { "id": 42, "text": "bad id", "completed": false },
            { "text": "missing id", "completed": true },
            { "id": "task-2", "text": "Also valid", "completed": true, "createdAt": 1_700_000_000_001i64 },
        ]);
        kv.set(TASKS_KEY, &blob.to_string()).unwrap();

        let adapter = StorageAdapter::new(Box::new(kv));
        let tasks = adapter.load();
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["task-1", "task-2"]);
    }

    #[test]
    fn test_load_drops_duplicate_ids() {
        let kv = MemoryStore::new();
        let blob = json!([
            { "id": "task-1", "text": "First", "completed": false },
            { "id": "task-1", "text": "Imposter", "completed": true },
        ]);
        kv.set(TASKS_KEY, &blob.to_string()).unwrap();

        let adapter = StorageAdapter::new(Box::new(kv));
        let tasks = adapter.load();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "First");
    }

    #[test]
    fn test_decode_accepts_rfc3339_created_at() {
        let value = json!({
            "id": "task-1", "text": "Old schema", "completed": false,
            "createdAt": "2024-01-15T10:30:00Z",
        });
        let task = decode_task(&value).unwrap();
        let expected = DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
            .unwrap()
            .timestamp_millis();
        assert_eq!(task.created_at, expected);
    }

    #[test]
    fn test_decode_accepts_float_epoch() {
        let value = json!({
            "id": "task-1", "text": "Float clock", "completed": false,
            "createdAt": 1_700_000_000_000.0,
        });
        assert_eq!(decode_task(&value).unwrap().created_at, 1_700_000_000_000);
    }

    #[test]
    fn test_decode_invalid_created_at_falls_back_to_now() {
        let before = now_ms();
        let value = json!({
            "id": "task-1", "text": "Bad clock", "completed": false,
            "createdAt": "yesterday-ish",
        });
        let task = decode_task(&value).unwrap();
        assert!(task.created_at >= before);
    }

    #[test]
    fn test_decode_missing_created_at_falls_back_to_now() {
        let before = now_ms();
        let value = json!({ "id": "task-1", "text": "No clock", "completed": false });
        let task = decode_task(&value).unwrap();
        assert!(task.created_at >= before);
    }

    #[test]
    fn test_decode_invalid_updated_at_dropped() {
        let value = json!({
            "id": "task-1", "text": "Task", "completed": true,
            "createdAt": 1_700_000_000_000i64, "updatedAt": ["wat"],
        });
        assert!(decode_task(&value).unwrap().updated_at.is_none());
    }

    #[test]
    fn test_decode_reject_reasons() {
        assert_eq!(decode_task(&json!("string")).unwrap_err(), DecodeReject::NotAnObject);
        assert_eq!(
            decode_task(&json!({ "text": "t", "completed": false })).unwrap_err(),
            DecodeReject::MissingField("id"),
        );
        assert_eq!(
            decode_task(&json!({ "id": "task-1", "text": "t", "completed": "yes" })).unwrap_err(),
            DecodeReject::WrongType("completed"),
        );
    }

    #[test]
    fn test_file_store_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().join("data"));

        assert!(store.get("tasks").unwrap().is_none());
        store.set("tasks", "[]").unwrap();
        assert_eq!(store.get("tasks").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_save_failure_is_swallowed() {
        let temp = TempDir::new().unwrap();
        // base dir path occupied by a regular file, so create_dir_all fails
        let blocker = temp.path().join("blocked");
        fs::write(&blocker, "in the way").unwrap();

        let adapter = StorageAdapter::new(Box::new(FileStore::new(&blocker)));
        adapter.save(&[task("task-1", "Doomed", false)]);
        assert!(adapter.load().is_empty());
    }

    proptest! {
        #[test]
        fn prop_round_trip_preserves_tasks(
            texts in proptest::collection::vec("\\S{1,20}", 0..8),
        ) {
            let tasks: Vec<Task> = texts
                .iter()
                .enumerate()
                .map(|(i, text)| Task {
                    id: format!("task-{i}"),
                    text: text.clone(),
                    completed: i % 2 == 0,
                    created_at: 1_700_000_000_000 + i as i64,
                    updated_at: (i % 3 == 0).then_some(1_700_000_000_500 + i as i64),
                })
                .collect();

            let adapter = memory_adapter();
            adapter.save(&tasks);
            prop_assert_eq!(adapter.load(), tasks);
        }
    }
}
