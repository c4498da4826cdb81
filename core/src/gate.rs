//! Change gate. Decouples write frequency from notification frequency.
//!
//! A write happens only when the snapshot is meaningful, the throttle
//! window has elapsed, and (with dedupe on) the values changed.
//!
//! RULE: state is committed only after the durable write succeeded,
//! so a failed write is retried on the next trigger.

use crate::{snapshot::Snapshot, types::Millis};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WritePolicy {
    pub min_interval_ms: Millis,
    pub dedupe:          bool,
}

impl WritePolicy {
    pub fn new(min_interval_ms: Millis, dedupe: bool) -> Self {
        Self { min_interval_ms: min_interval_ms.max(0), dedupe }
    }
}

/// Why a snapshot was or was not written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Write,
    NotMeaningful,
    Throttled,
    Unchanged,
}

impl GateDecision {
    pub fn should_write(&self) -> bool {
        matches!(self, Self::Write)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecorderState<S> {
    last_snapshot: Option<S>,
    last_write_ms: Option<Millis>,
}

impl<S> Default for RecorderState<S> {
    fn default() -> Self {
        Self { last_snapshot: None, last_write_ms: None }
    }
}

impl<S: Snapshot> RecorderState<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_snapshot(&self) -> Option<&S> {
        self.last_snapshot.as_ref()
    }

    pub fn last_write_ms(&self) -> Option<Millis> {
        self.last_write_ms
    }

    pub fn evaluate(
        &self,
        snapshot: &S,
        now: Millis,
        policy: WritePolicy,
        is_meaningful: impl Fn(&S) -> bool,
    ) -> GateDecision {
        if !is_meaningful(snapshot) {
            return GateDecision::NotMeaningful;
        }

        // First observation is always due.
        let due = match self.last_write_ms {
            None => true,
            Some(last) => now.saturating_sub(last) >= policy.min_interval_ms,
        };
        if !due {
            return GateDecision::Throttled;
        }

        if policy.dedupe && self.last_snapshot.as_ref() == Some(snapshot) {
            return GateDecision::Unchanged;
        }

        GateDecision::Write
    }

    pub fn should_write(
        &self,
        snapshot: &S,
        now: Millis,
        policy: WritePolicy,
        is_meaningful: impl Fn(&S) -> bool,
    ) -> bool {
        self.evaluate(snapshot, now, policy, is_meaningful).should_write()
    }

    /// Record a successful write. The timestamp never moves backwards.
    pub fn commit(&mut self, snapshot: S, now: Millis) {
        let ts = self.last_write_ms.map_or(now, |last| last.max(now));
        self.last_write_ms = Some(ts);
        self.last_snapshot = Some(snapshot);
    }
}
