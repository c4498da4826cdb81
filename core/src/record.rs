//! Record file shapes and read-side helpers.
//!
//! The history file looks like:
//!
//! ```json
//! { "rsn": "Zezima", "lastUpdated": "2024-05-01T13:45:10.250",
//!   "entries": [ { "timestamp": "...", "bank_ge_value": 1, "bank_coins": 2, "inventory_coins": 3 } ] }
//! ```

use crate::{
    error::{RecorderError, RecorderResult},
    identity::sanitize,
    snapshot::{BankSnapshot, Snapshot},
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

pub const HISTORY_EXTENSION: &str = "json";
pub const VALUE_EXTENSION: &str = "txt";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordEntry<S> {
    pub timestamp: String,
    #[serde(flatten)]
    pub snapshot:  S,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDocument<S> {
    pub rsn:          String,
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
    #[serde(default = "Vec::new")]
    pub entries:      Vec<RecordEntry<S>>,
}

/// `<base_dir>/<sanitized identity>.<ext>`
pub fn record_path(base_dir: &Path, identity: &str, ext: &str) -> PathBuf {
    base_dir.join(format!("{}.{ext}", sanitize(identity)))
}

/// Read a history file. `Ok(None)` when it does not exist yet.
pub fn read_document<S: Snapshot>(path: &Path) -> RecorderResult<Option<RecordDocument<S>>> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(RecorderError::io(path, e)),
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| RecorderError::ExistingFileCorrupt {
            path:   path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Read a plain-text value file.
pub fn read_value(path: &Path) -> RecorderResult<Option<i64>> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(RecorderError::io(path, e)),
    };
    text.trim()
        .parse::<i64>()
        .map(Some)
        .map_err(|e| RecorderError::ExistingFileCorrupt {
            path:   path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Latest bank figures for one player, with the derived totals the
/// dashboard shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WealthSummary {
    pub rsn:             String,
    /// Bank GE value plus coins carried in the inventory.
    pub bank_value:      i64,
    /// Bank coins plus inventory coins.
    pub coins:           i64,
    pub bank_coins:      i64,
    pub inventory_coins: i64,
    pub bank_ge_value:   i64,
    pub timestamp:       String,
    pub last_updated:    String,
}

impl WealthSummary {
    fn from_document(doc: &RecordDocument<BankSnapshot>) -> Option<Self> {
        let latest = doc.entries.last()?;
        let s = &latest.snapshot;
        Some(Self {
            rsn:             doc.rsn.clone(),
            bank_value:      s.bank_ge_value.saturating_add(s.inventory_coins),
            coins:           s.bank_coins.saturating_add(s.inventory_coins),
            bank_coins:      s.bank_coins,
            inventory_coins: s.inventory_coins,
            bank_ge_value:   s.bank_ge_value,
            timestamp:       latest.timestamp.clone(),
            last_updated:    doc.last_updated.clone(),
        })
    }
}

/// Summary of the newest entry for `identity`, or `None` if the player
/// has no file or no entries.
pub fn latest_wealth(base_dir: &Path, identity: &str) -> RecorderResult<Option<WealthSummary>> {
    let path = record_path(base_dir, identity, HISTORY_EXTENSION);
    let doc = read_document::<BankSnapshot>(&path)?;
    Ok(doc.as_ref().and_then(WealthSummary::from_document))
}

/// Summaries for every history file in `base_dir`. Unreadable files are
/// logged and skipped. Sorted by player name.
pub fn all_wealth(base_dir: &Path) -> Vec<WealthSummary> {
    let dir = match fs::read_dir(base_dir) {
        Ok(d) => d,
        Err(e) => {
            log::info!("reader: cannot list {}: {e}", base_dir.display());
            return Vec::new();
        }
    };

    let mut out: Vec<WealthSummary> = dir
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|e| e == HISTORY_EXTENSION))
        .filter_map(|p| match read_document::<BankSnapshot>(&p) {
            Ok(doc) => doc.as_ref().and_then(WealthSummary::from_document),
            Err(e) => {
                log::warn!("reader: skipping {}: {e}", p.display());
                None
            }
        })
        .collect();
    out.sort_by(|a, b| a.rsn.cmp(&b.rsn));
    out
}
