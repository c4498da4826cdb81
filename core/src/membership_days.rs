//! Membership days recorder. Picks the days-remaining countdown out of
//! UI text and keeps `<rsn>.txt` holding the latest value.
//!
//! Values seen on the title screen arrive before anyone is logged in;
//! they are held and flushed to the player's file once the session
//! reaches `LoggedIn`.

use crate::{
    clock::Clock,
    config::MembershipDaysConfig,
    days::parse_days,
    error::RecorderResult,
    gate::{GateDecision, RecorderState, WritePolicy},
    host::{HostEvent, HostState, SessionPhase},
    identity::sanitize_strict,
    recorder::{RecordOutcome, Recorder, SkipReason},
    snapshot::{MembershipSnapshot, Snapshot},
    types::{Identity, Millis},
    writer::ValueWriter,
};
use serde::Serialize;
use std::{
    collections::HashMap,
    fs::OpenOptions,
    io::Write,
    path::PathBuf,
    sync::Arc,
};

pub const LOADED_MARKER_FILE: &str = "_loaded.txt";

/// Where a days value was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DaysSource {
    Ui,
    Title,
}

/// Optional JSON written next to the `.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MembershipRecord {
    pub rsn:         String,
    pub days:        i64,
    pub captured_at: String,
    pub source:      DaysSource,
}

pub struct MembershipDaysRecorder {
    config:             MembershipDaysConfig,
    output_dir:         PathBuf,
    writer:             ValueWriter,
    clock:              Arc<dyn Clock>,
    pending_from_title: Option<i64>,
    states:             HashMap<Identity, RecorderState<MembershipSnapshot>>,
    last_scan_ms:       Option<Millis>,
}

impl MembershipDaysRecorder {
    pub fn new(config: MembershipDaysConfig, output_dir: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        let output_dir = output_dir.into();
        Self {
            config,
            writer: ValueWriter::new(output_dir.clone()),
            output_dir,
            clock,
            pending_from_title: None,
            states: HashMap::new(),
            last_scan_ms: None,
        }
    }

    pub fn pending_from_title(&self) -> Option<i64> {
        self.pending_from_title
    }

    /// Append a `<instant> loaded` line to the marker file.
    pub fn write_loaded_marker(&self) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(LOADED_MARKER_FILE);
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(file, "{} loaded", self.clock.utc_instant())?;
        Ok(path)
    }

    /// Feed one piece of UI text. Returns what happened to the value in it.
    pub fn observe_text(&mut self, host: &dyn HostState, text: &str) -> RecorderResult<RecordOutcome> {
        match parse_days(text) {
            Some(days) => self.handle_days(host, days),
            None => Ok(RecordOutcome::skipped(SkipReason::NoValue)),
        }
    }

    fn handle_days(&mut self, host: &dyn HostState, days: i64) -> RecorderResult<RecordOutcome> {
        match host.session_phase() {
            phase if phase.is_pre_login() => {
                log::debug!("membership: holding days={days} seen during {phase:?}");
                self.pending_from_title = Some(days);
                Ok(RecordOutcome::skipped(SkipReason::PendingLogin))
            }
            _ => {
                let Some(rsn) = resolve_rsn(host) else {
                    return Ok(RecordOutcome::skipped(SkipReason::IdentityUnresolved));
                };
                self.write_days(&rsn, days, DaysSource::Ui)
            }
        }
    }

    /// Write a value captured on the title screen once logged in.
    pub fn flush_pending(&mut self, host: &dyn HostState) -> RecorderResult<RecordOutcome> {
        let Some(days) = self.pending_from_title else {
            return Ok(RecordOutcome::skipped(SkipReason::NoValue));
        };
        if host.session_phase() != SessionPhase::LoggedIn {
            return Ok(RecordOutcome::skipped(SkipReason::PendingLogin));
        }
        let Some(rsn) = resolve_rsn(host) else {
            return Ok(RecordOutcome::skipped(SkipReason::IdentityUnresolved));
        };

        self.pending_from_title = None;
        let result = self.write_days(&rsn, days, DaysSource::Title);
        if result.is_err() {
            // Keep it for the next trigger.
            self.pending_from_title = Some(days);
        }
        result
    }

    /// Login-time pull of the host's visible text, at most once per scan
    /// throttle.
    pub fn scan_visible_text(&mut self, host: &dyn HostState) -> RecorderResult<RecordOutcome> {
        let now = self.clock.now_ms();
        let throttle = self.config.effective_scan_throttle_ms();
        if let Some(last) = self.last_scan_ms {
            if now.saturating_sub(last) < throttle {
                return Ok(RecordOutcome::skipped(SkipReason::Throttled));
            }
        }
        self.last_scan_ms = Some(now);
        self.read_visible_text(host)
    }

    /// Read the host's visible text now. A freshly loaded widget is always
    /// read; the scan throttle does not apply.
    pub fn read_visible_text(&mut self, host: &dyn HostState) -> RecorderResult<RecordOutcome> {
        for text in host.visible_text() {
            if let Some(days) = parse_days(&text) {
                return self.handle_days(host, days);
            }
        }
        Ok(RecordOutcome::skipped(SkipReason::NoValue))
    }

    fn write_days(&mut self, rsn: &str, days: i64, source: DaysSource) -> RecorderResult<RecordOutcome> {
        let snapshot = MembershipSnapshot { days };
        let now = self.clock.now_ms();
        let state = self.states.entry(rsn.to_string()).or_default();

        match state.evaluate(&snapshot, now, WritePolicy::new(0, true), |_| true) {
            GateDecision::Write => {}
            GateDecision::Unchanged => return Ok(RecordOutcome::skipped(SkipReason::Unchanged)),
            GateDecision::Throttled => return Ok(RecordOutcome::skipped(SkipReason::Throttled)),
            GateDecision::NotMeaningful => {
                return Ok(RecordOutcome::skipped(SkipReason::NotMeaningful))
            }
        }

        let mut paths = vec![self.writer.write(rsn, snapshot.primary_value()).inspect_err(|e| {
            log::warn!("membership: rsn={rsn} write failed: {e}");
        })?];

        if self.config.write_json {
            let record = MembershipRecord {
                rsn:         rsn.to_string(),
                days,
                captured_at: self.clock.utc_instant(),
                source,
            };
            let sidecar = self.writer.write_sidecar(rsn, &record).inspect_err(|e| {
                log::warn!("membership: rsn={rsn} json write failed: {e}");
            })?;
            paths.push(sidecar);
        }

        state.commit(snapshot, now);
        log::info!("membership: rsn={rsn} days={days} source={source:?}");
        Ok(RecordOutcome::written(rsn.to_string(), paths))
    }
}

fn resolve_rsn(host: &dyn HostState) -> Option<Identity> {
    host.local_player_name().map(|n| sanitize_strict(&n))
}

/// Combine the outcomes of two steps run for one event. A write wins,
/// and a step that found nothing never hides the other step's reason.
fn merge(first: RecordOutcome, second: RecordOutcome) -> RecordOutcome {
    match (first.is_written(), second.is_written()) {
        (_, true) => second,
        (true, false) => first,
        _ if second.skip_reason() == Some(SkipReason::NoValue) => first,
        _ => second,
    }
}

impl Recorder for MembershipDaysRecorder {
    fn name(&self) -> &'static str { "membership_days" }

    fn on_host_event(
        &mut self,
        host: &dyn HostState,
        event: &HostEvent,
    ) -> RecorderResult<RecordOutcome> {
        match event {
            HostEvent::Startup => {
                if let Err(e) = self.write_loaded_marker() {
                    log::warn!("membership: init marker failed: {e}");
                }
                Ok(RecordOutcome::skipped(SkipReason::Ignored))
            }
            HostEvent::TextChanged { text } => {
                let seen = self.observe_text(host, text)?;
                let flushed = self.flush_pending(host)?;
                Ok(merge(seen, flushed))
            }
            HostEvent::WidgetLoaded { .. } => {
                let scanned = self.read_visible_text(host)?;
                let flushed = self.flush_pending(host)?;
                Ok(merge(scanned, flushed))
            }
            HostEvent::SessionPhaseChanged { phase: SessionPhase::LoggedIn } => {
                let flushed = self.flush_pending(host)?;
                let scanned = self.scan_visible_text(host)?;
                Ok(merge(flushed, scanned))
            }
            _ => Ok(RecordOutcome::skipped(SkipReason::Ignored)),
        }
    }

    fn as_any(&self) -> &dyn std::any::Any { self }
}
