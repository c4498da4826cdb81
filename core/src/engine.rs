//! The recorder engine: the single entry point the embedding
//! application calls with host notifications.
//!
//! DISPATCH ORDER (fixed):
//!   1. Bank wealth recorder
//!   2. Membership days recorder
//!
//! RULES:
//!   - Every event goes to every recorder, in registration order.
//!   - A failed write in one recorder never stops the others.
//!   - The engine holds no recorder state of its own.

use crate::{
    bank_wealth::BankWealthRecorder,
    clock::Clock,
    config::RecorderConfig,
    error::RecorderResult,
    host::{HostEvent, HostState},
    membership_days::MembershipDaysRecorder,
    recorder::{RecordOutcome, Recorder},
};
use std::sync::Arc;

/// One recorder's answer to one event.
#[derive(Debug)]
pub struct Dispatched {
    pub recorder: &'static str,
    pub result:   RecorderResult<RecordOutcome>,
}

#[derive(Default)]
pub struct RecorderEngine {
    recorders: Vec<Box<dyn Recorder>>,
}

impl RecorderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine with both recorders registered.
    pub fn build(config: &RecorderConfig, clock: Arc<dyn Clock>) -> Self {
        let mut engine = Self::new();
        engine.register(Box::new(BankWealthRecorder::new(
            config.bank_wealth.clone(),
            config.bank_dir(),
            Arc::clone(&clock),
        )));
        engine.register(Box::new(MembershipDaysRecorder::new(
            config.membership_days.clone(),
            config.membership_dir(),
            clock,
        )));
        engine
    }

    /// Register a recorder. Call in the documented dispatch order.
    pub fn register(&mut self, recorder: Box<dyn Recorder>) {
        self.recorders.push(recorder);
    }

    pub fn recorder_names(&self) -> Vec<&'static str> {
        self.recorders.iter().map(|r| r.name()).collect()
    }

    /// Forward one host event to every recorder.
    pub fn dispatch(&mut self, host: &dyn HostState, event: &HostEvent) -> Vec<Dispatched> {
        self.recorders
            .iter_mut()
            .map(|recorder| {
                let result = recorder.on_host_event(host, event);
                if let Err(e) = &result {
                    log::warn!("engine: {} failed on {event:?}: {e}", recorder.name());
                }
                Dispatched { recorder: recorder.name(), result }
            })
            .collect()
    }

    pub fn bank_wealth(&self) -> Option<&BankWealthRecorder> {
        self.find::<BankWealthRecorder>()
    }

    pub fn membership_days(&self) -> Option<&MembershipDaysRecorder> {
        self.find::<MembershipDaysRecorder>()
    }

    fn find<T: 'static>(&self) -> Option<&T> {
        self.recorders.iter().find_map(|r| r.as_any().downcast_ref::<T>())
    }
}
