//! Bank wealth recorder. Tracks bank GE value and coins and keeps a
//! per-player JSON history.
//!
//! Recalculates on startup, when the bank widget loads, and when the
//! bank or inventory container changes. The panel view is refreshed on
//! every recalculation; history writes go through the change gate.

use crate::{
    clock::Clock,
    config::BankWealthConfig,
    display::PanelView,
    error::{RecorderError, RecorderResult},
    gate::{GateDecision, RecorderState},
    host::{Container, HostEvent, HostState},
    identity::sanitize,
    producer::produce_bank_snapshot,
    recorder::{RecordOutcome, Recorder, SkipReason},
    snapshot::{BankSnapshot, Snapshot},
    types::{Identity, BANK_GROUP_ID},
    writer::JsonHistoryWriter,
};
use crossbeam_channel::{Receiver, Sender};
use std::{collections::HashMap, path::PathBuf, sync::Arc};

pub struct BankWealthRecorder {
    config:      BankWealthConfig,
    writer:      JsonHistoryWriter,
    clock:       Arc<dyn Clock>,
    states:      HashMap<Identity, RecorderState<BankSnapshot>>,
    /// Values shown on the panel, kept while the bank is closed.
    last_known:  BankSnapshot,
    subscribers: Vec<Sender<PanelView>>,
}

impl BankWealthRecorder {
    /// `output_dir` is the folder holding `<rsn>.json` files.
    pub fn new(config: BankWealthConfig, output_dir: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        let writer = JsonHistoryWriter::new(output_dir).with_history_cap(config.history_cap);
        Self {
            config,
            writer,
            clock,
            states: HashMap::new(),
            last_known: BankSnapshot::default(),
            subscribers: Vec::new(),
        }
    }

    /// Receive every panel view this recorder produces from now on.
    pub fn subscribe(&mut self) -> Receiver<PanelView> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn state_for(&self, identity: &str) -> Option<&RecorderState<BankSnapshot>> {
        self.states.get(&sanitize(identity))
    }

    pub fn last_known(&self) -> BankSnapshot {
        self.last_known
    }

    fn triggers(event: &HostEvent) -> bool {
        match event {
            HostEvent::Startup => true,
            HostEvent::WidgetLoaded { group_id } => *group_id == BANK_GROUP_ID,
            HostEvent::ItemContainerChanged { container_id } => {
                Container::from_id(*container_id).is_some()
            }
            _ => false,
        }
    }

    /// Recompute the snapshot and persist it if the gate allows.
    pub fn recalc(&mut self, host: &dyn HostState) -> RecorderResult<RecordOutcome> {
        if self.config.only_when_bank_open && !host.is_bank_open() {
            let view = self.publish(self.last_known);
            return Ok(RecordOutcome::skipped(SkipReason::BankClosed).with_view(view));
        }

        let obs = produce_bank_snapshot(host);
        let snapshot = obs.snapshot;
        self.last_known = snapshot;
        let view = self.publish(snapshot);

        if !obs.bank_loaded {
            log::debug!("bank: container not loaded yet; skipping write");
            return Ok(RecordOutcome::skipped(SkipReason::NotMeaningful).with_view(view));
        }

        let Some(rsn) = host.local_player_name() else {
            log::debug!("bank: {}; skipping write", RecorderError::IdentityUnresolved);
            return Ok(RecordOutcome::skipped(SkipReason::IdentityUnresolved).with_view(view));
        };
        let key = sanitize(&rsn);
        let now = self.clock.now_ms();
        let policy = self.config.policy();

        let state = self.states.entry(key.clone()).or_default();
        // All-zero values before the first real write are never persisted.
        let had_data = state.last_snapshot().is_some();
        let decision = state.evaluate(&snapshot, now, policy, |s| had_data || !s.is_zero());

        let reason = match decision {
            GateDecision::Write         => None,
            GateDecision::NotMeaningful => Some(SkipReason::NotMeaningful),
            GateDecision::Throttled     => Some(SkipReason::Throttled),
            GateDecision::Unchanged     => Some(SkipReason::Unchanged),
        };
        if let Some(reason) = reason {
            log::debug!("bank: rsn={key} skip {reason:?}");
            return Ok(RecordOutcome::skipped(reason).with_view(view));
        }

        let timestamp = self.clock.local_timestamp();
        let path = match self.writer.write(&rsn, &snapshot, &timestamp) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("bank: rsn={key} write failed: {e}");
                return Err(e);
            }
        };
        state.commit(snapshot, now);
        log::info!(
            "bank: rsn={key} value={} bank_coins={} inv_coins={}",
            snapshot.bank_ge_value,
            snapshot.bank_coins,
            snapshot.inventory_coins
        );

        Ok(RecordOutcome::written(key, vec![path]).with_view(view))
    }

    fn publish(&mut self, snapshot: BankSnapshot) -> PanelView {
        let view = PanelView::from_snapshot(&snapshot);
        self.subscribers.retain(|tx| tx.send(view.clone()).is_ok());
        view
    }
}

impl Recorder for BankWealthRecorder {
    fn name(&self) -> &'static str { "bank_wealth" }

    fn on_host_event(
        &mut self,
        host: &dyn HostState,
        event: &HostEvent,
    ) -> RecorderResult<RecordOutcome> {
        if !Self::triggers(event) {
            return Ok(RecordOutcome::skipped(SkipReason::Ignored));
        }
        self.recalc(host)
    }

    fn as_any(&self) -> &dyn std::any::Any { self }
}
