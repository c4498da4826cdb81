//! Wall clock used by the change gate and the record timestamps.
//!
//! Recorders never read the system time directly; they ask a `Clock`.
//! Tests and the runner's replay mode drive a `ManualClock` instead.

use crate::types::Millis;
use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Format used for `timestamp` and `lastUpdated` in record files.
pub const LOCAL_TS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> Millis;

    /// Local wall-clock time without offset.
    fn now_local(&self) -> NaiveDateTime;

    /// ISO-8601 local timestamp, e.g. `2024-05-01T13:45:10.250`.
    fn local_timestamp(&self) -> String {
        self.now_local().format(LOCAL_TS_FORMAT).to_string()
    }

    /// RFC 3339 UTC instant, e.g. `2024-05-01T12:45:10.250Z`.
    fn utc_instant(&self) -> String {
        DateTime::<Utc>::from_timestamp_millis(self.now_ms())
            .unwrap_or_default()
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        Utc::now().timestamp_millis()
    }

    fn now_local(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock that only moves when told to. Local time is the UTC rendering
/// of the current millis so output is reproducible across machines.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    pub fn new(start_ms: Millis) -> Self {
        Self { now_ms: AtomicI64::new(start_ms) }
    }

    pub fn set(&self, ms: Millis) {
        self.now_ms.store(ms, Ordering::SeqCst);
    }

    /// Advance by `delta_ms`. Returns the new time.
    pub fn advance(&self, delta_ms: Millis) -> Millis {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst) + delta_ms
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now_ms.load(Ordering::SeqCst)
    }

    fn now_local(&self) -> NaiveDateTime {
        DateTime::<Utc>::from_timestamp_millis(self.now_ms())
            .unwrap_or_default()
            .naive_utc()
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now_ms(&self) -> Millis {
        (**self).now_ms()
    }

    fn now_local(&self) -> NaiveDateTime {
        (**self).now_local()
    }
}
