//! Recorder configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes. The camelCase key names (`minLogSeconds`, `onlyWhenBankOpen`, ...)
//! are accepted as aliases.

use crate::{gate::WritePolicy, types::Millis};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Lower bound applied to `scan_throttle_ms`.
pub const MIN_SCAN_THROTTLE_MS: Millis = 250;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankWealthConfig {
    /// Minimum seconds between history writes.
    #[serde(alias = "minLogSeconds")]
    pub min_log_seconds: i64,
    /// Write entries only while the bank interface is open.
    #[serde(alias = "onlyWhenBankOpen")]
    pub only_when_bank_open: bool,
    /// Skip writes when values have not changed.
    #[serde(alias = "dedupeEnabled")]
    pub dedupe: bool,
    #[serde(alias = "outputFolderName")]
    pub output_folder_name: String,
    /// Keep only the newest N history entries. Unbounded when absent.
    #[serde(alias = "historyCap")]
    pub history_cap: Option<usize>,
}

impl Default for BankWealthConfig {
    fn default() -> Self {
        Self {
            min_log_seconds:     10,
            only_when_bank_open: true,
            dedupe:              true,
            output_folder_name:  "bank-wealth".into(),
            history_cap:         None,
        }
    }
}

impl BankWealthConfig {
    pub fn policy(&self) -> WritePolicy {
        WritePolicy::new(self.min_log_seconds.max(0).saturating_mul(1000), self.dedupe)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MembershipDaysConfig {
    #[serde(alias = "outputFolderName")]
    pub output_folder_name: String,
    /// Also write a JSON sidecar next to the `.txt`.
    #[serde(alias = "writeJsonAlso", alias = "writeJson")]
    pub write_json: bool,
    /// Minimum ms between pulls of the host's visible text.
    #[serde(alias = "scanThrottleMs", alias = "throttleMs")]
    pub scan_throttle_ms: Millis,
}

impl Default for MembershipDaysConfig {
    fn default() -> Self {
        Self {
            output_folder_name: "membership-days".into(),
            write_json:         false,
            scan_throttle_ms:   1500,
        }
    }
}

impl MembershipDaysConfig {
    pub fn effective_scan_throttle_ms(&self) -> Millis {
        self.scan_throttle_ms.max(MIN_SCAN_THROTTLE_MS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Folder holding both output folders. Defaults to `~/.runelite`.
    pub base_dir:        PathBuf,
    pub bank_wealth:     BankWealthConfig,
    pub membership_days: MembershipDaysConfig,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            base_dir:        default_base_dir(),
            bank_wealth:     BankWealthConfig::default(),
            membership_days: MembershipDaysConfig::default(),
        }
    }
}

impl RecorderConfig {
    /// Load from a JSON file. Missing keys keep their defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        Ok(config)
    }

    /// Defaults rooted at `base_dir`, for tests and scratch runs.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into(), ..Self::default() }
    }

    pub fn bank_dir(&self) -> PathBuf {
        self.base_dir.join(&self.bank_wealth.output_folder_name)
    }

    pub fn membership_dir(&self) -> PathBuf {
        self.base_dir.join(&self.membership_days.output_folder_name)
    }
}

fn default_base_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join(".runelite")
}
