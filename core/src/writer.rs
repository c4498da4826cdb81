//! Durable writers, the only code that touches record files.
//!
//! RULE: every write goes through `atomic::atomic_replace`.
//! `JsonHistoryWriter` appends to a per-player history document;
//! `ValueWriter` overwrites a per-player file holding a single value.

use crate::{
    atomic::atomic_replace,
    error::{RecorderError, RecorderResult},
    record::{record_path, HISTORY_EXTENSION, VALUE_EXTENSION},
    snapshot::Snapshot,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone)]
pub struct JsonHistoryWriter {
    base_dir:    PathBuf,
    history_cap: Option<usize>,
}

impl JsonHistoryWriter {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into(), history_cap: None }
    }

    /// Keep at most `cap` newest entries. `None` keeps everything.
    pub fn with_history_cap(mut self, cap: Option<usize>) -> Self {
        self.history_cap = cap.filter(|c| *c > 0);
        self
    }

    pub fn path_for(&self, identity: &str) -> PathBuf {
        record_path(&self.base_dir, identity, HISTORY_EXTENSION)
    }

    /// Append `{timestamp, ...snapshot}` to the player's history and set
    /// `rsn` / `lastUpdated`. Returns the path written.
    pub fn write<S: Snapshot>(
        &self,
        identity: &str,
        snapshot: &S,
        timestamp: &str,
    ) -> RecorderResult<PathBuf> {
        let path = self.path_for(identity);
        let mut root = load_root(&path)?;

        root.insert("rsn".into(), Value::String(identity.to_string()));
        root.insert("lastUpdated".into(), Value::String(timestamp.to_string()));

        match root.get("entries") {
            Some(Value::Array(_)) => {}
            Some(other) => {
                log::warn!(
                    "writer: {} has non-array entries ({}); starting a new list",
                    path.display(),
                    json_kind(other)
                );
                root.insert("entries".into(), Value::Array(Vec::new()));
            }
            None => {
                root.insert("entries".into(), Value::Array(Vec::new()));
            }
        }

        let entry = build_entry(snapshot, timestamp)?;
        let mut count = 0;
        if let Some(Value::Array(entries)) = root.get_mut("entries") {
            entries.push(entry);
            if let Some(cap) = self.history_cap {
                if entries.len() > cap {
                    let excess = entries.len() - cap;
                    entries.drain(..excess);
                }
            }
            count = entries.len();
        }

        let bytes = serde_json::to_vec_pretty(&Value::Object(root))?;
        atomic_replace(&path, &bytes)?;
        log::debug!("writer: {} now holds {count} entries", path.display());
        Ok(path)
    }
}

/// Existing document, or a fresh one when missing or unparsable.
fn load_root(path: &Path) -> RecorderResult<Map<String, Value>> {
    if !path.exists() {
        return Ok(Map::new());
    }
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
        Err(e) => return Err(RecorderError::io(path, e)),
    };

    let reason = match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(map)) => return Ok(map),
        Ok(other) => format!("top level is {}", json_kind(&other)),
        Err(e) => e.to_string(),
    };
    let err = RecorderError::ExistingFileCorrupt { path: path.to_path_buf(), reason };
    log::warn!("writer: {err}; starting a fresh document");
    Ok(Map::new())
}

fn build_entry<S: Snapshot>(snapshot: &S, timestamp: &str) -> RecorderResult<Value> {
    let mut entry = Map::new();
    entry.insert("timestamp".into(), Value::String(timestamp.to_string()));
    match serde_json::to_value(snapshot)? {
        Value::Object(fields) => entry.extend(fields),
        other => {
            entry.insert("value".into(), other);
        }
    }
    Ok(Value::Object(entry))
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null      => "null",
        Value::Bool(_)   => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_)  => "an array",
        Value::Object(_) => "an object",
    }
}

/// Plain-text variant: the file holds nothing but the decimal value.
#[derive(Debug, Clone)]
pub struct ValueWriter {
    base_dir: PathBuf,
}

impl ValueWriter {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    pub fn path_for(&self, identity: &str) -> PathBuf {
        record_path(&self.base_dir, identity, VALUE_EXTENSION)
    }

    pub fn write(&self, identity: &str, value: i64) -> RecorderResult<PathBuf> {
        let path = self.path_for(identity);
        atomic_replace(&path, value.to_string().as_bytes())?;
        Ok(path)
    }

    /// Overwrite `<identity>.json` with one serialized object and a newline.
    pub fn write_sidecar<T: Serialize>(&self, identity: &str, doc: &T) -> RecorderResult<PathBuf> {
        let path = record_path(&self.base_dir, identity, HISTORY_EXTENSION);
        let mut bytes = serde_json::to_vec(doc)?;
        bytes.push(b'\n');
        atomic_replace(&path, &bytes)?;
        Ok(path)
    }
}
