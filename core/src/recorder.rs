//! Recorder trait and the outcome every recorder reports.
//!
//! RULE: Every recorder implements `Recorder`.
//! The engine forwards each host event to every registered recorder
//! in registration order. Recorders share no mutable state.

use crate::{
    display::PanelView,
    error::RecorderResult,
    host::{HostEvent, HostState},
    types::Identity,
};
use std::{any::Any, path::PathBuf};

/// The contract every recorder must fulfill.
pub trait Recorder: Send {
    /// Unique stable name for this recorder.
    fn name(&self) -> &'static str;

    /// Called for every host notification, at whatever rate the host
    /// produces them. Throttling is the recorder's job.
    ///
    /// Returns `Err` only when a durable write failed; the recorder's
    /// throttle and dedupe state are then left untouched.
    fn on_host_event(
        &mut self,
        host: &dyn HostState,
        event: &HostEvent,
    ) -> RecorderResult<RecordOutcome>;

    /// For downcasting in tests and tooling only.
    fn as_any(&self) -> &dyn Any;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The event is not one this recorder reacts to.
    Ignored,
    BankClosed,
    /// Source not populated yet; nothing worth persisting.
    NotMeaningful,
    Throttled,
    Unchanged,
    IdentityUnresolved,
    /// Value captured before login; held until the session is logged in.
    PendingLogin,
    NoValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Written { identity: Identity, paths: Vec<PathBuf> },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    pub outcome: Outcome,
    /// Latest figures for the panel, when the recorder has one.
    pub view:    Option<PanelView>,
}

impl RecordOutcome {
    pub fn skipped(reason: SkipReason) -> Self {
        Self { outcome: Outcome::Skipped(reason), view: None }
    }

    pub fn written(identity: Identity, paths: Vec<PathBuf>) -> Self {
        Self { outcome: Outcome::Written { identity, paths }, view: None }
    }

    pub fn with_view(mut self, view: PanelView) -> Self {
        self.view = Some(view);
        self
    }

    pub fn is_written(&self) -> bool {
        matches!(self.outcome, Outcome::Written { .. })
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self.outcome {
            Outcome::Skipped(r) => Some(r),
            Outcome::Written { .. } => None,
        }
    }
}
