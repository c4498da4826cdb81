//! Engine and config tests: dispatch order, isolation between
//! recorders, config loading, and the history reader.

use pretty_assertions::assert_eq;
use std::{fs, path::Path, sync::Arc};
use tempfile::TempDir;
use wealthlog_core::{
    clock::{Clock, ManualClock},
    config::RecorderConfig,
    engine::RecorderEngine,
    host::{HostEvent, Item, SessionPhase},
    record::{all_wealth, latest_wealth},
    recorder::SkipReason,
    scripted::ScriptedHost,
    snapshot::BankSnapshot,
    types::{BANK_CONTAINER_ID, COINS_ITEM_ID},
    writer::JsonHistoryWriter,
};

fn engine_in(dir: &Path, clock: &Arc<ManualClock>) -> (RecorderEngine, RecorderConfig) {
    let config = RecorderConfig::with_base_dir(dir);
    let engine = RecorderEngine::build(&config, Arc::clone(clock) as Arc<dyn Clock>);
    (engine, config)
}

fn bank_host() -> ScriptedHost {
    ScriptedHost::logged_in("Zezima")
        .with_bank(vec![Item::new(COINS_ITEM_ID, 2_000)])
        .with_price(COINS_ITEM_ID, 1)
}

#[test]
fn recorders_run_in_registration_order() {
    let dir = TempDir::new().unwrap();
    let clock = Arc::new(ManualClock::new(0));
    let (engine, _) = engine_in(dir.path(), &clock);
    assert_eq!(engine.recorder_names(), vec!["bank_wealth", "membership_days"]);
    assert!(engine.bank_wealth().is_some());
    assert!(engine.membership_days().is_some());
}

#[test]
fn every_recorder_sees_every_event() {
    let dir = TempDir::new().unwrap();
    let clock = Arc::new(ManualClock::new(0));
    let (mut engine, config) = engine_in(dir.path(), &clock);

    let results = engine.dispatch(&bank_host(), &HostEvent::Startup);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].recorder, "bank_wealth");
    assert!(results[0].result.as_ref().unwrap().is_written());
    assert_eq!(results[1].recorder, "membership_days");
    assert_eq!(
        results[1].result.as_ref().unwrap().skip_reason(),
        Some(SkipReason::Ignored)
    );

    assert!(config.bank_dir().join("Zezima.json").exists());
    assert!(config.membership_dir().join("_loaded.txt").exists());
}

#[test]
fn failure_in_one_recorder_does_not_stop_the_other() {
    let dir = TempDir::new().unwrap();
    let clock = Arc::new(ManualClock::new(0));
    let (mut engine, config) = engine_in(dir.path(), &clock);
    fs::write(config.bank_dir(), "blocking file").unwrap();

    let mut host = bank_host();
    host.visible_text = vec!["12 days of membership left".into()];
    let event = HostEvent::WidgetLoaded { group_id: 12 };
    let results = engine.dispatch(&host, &event);

    assert!(results[0].result.is_err());
    assert!(results[1].result.as_ref().unwrap().is_written());
    assert_eq!(
        fs::read_to_string(config.membership_dir().join("Zezima.txt")).unwrap(),
        "12"
    );
}

#[test]
fn engine_scenario_through_bank_events() {
    let dir = TempDir::new().unwrap();
    let clock = Arc::new(ManualClock::new(0));
    let (mut engine, config) = engine_in(dir.path(), &clock);
    let event = HostEvent::ItemContainerChanged { container_id: BANK_CONTAINER_ID };

    engine.dispatch(&bank_host(), &event);
    clock.advance(3_000);
    engine.dispatch(&bank_host(), &event);
    clock.advance(8_000);
    engine.dispatch(&bank_host().with_price(COINS_ITEM_ID, 2), &event);

    let summary = latest_wealth(&config.bank_dir(), "Zezima").unwrap().unwrap();
    assert_eq!(summary.bank_ge_value, 4_000);
    assert_eq!(summary.timestamp, "1970-01-01T00:00:11.000");

    let state = engine.bank_wealth().and_then(|b| b.state_for("Zezima")).unwrap();
    assert_eq!(state.last_write_ms(), Some(11_000));
}

#[test]
fn pending_title_value_survives_across_events() {
    let dir = TempDir::new().unwrap();
    let clock = Arc::new(ManualClock::new(0));
    let (mut engine, config) = engine_in(dir.path(), &clock);

    let title = ScriptedHost { phase: SessionPhase::LoginScreen, ..ScriptedHost::default() };
    engine.dispatch(&title, &HostEvent::TextChanged { text: "5 days of membership left".into() });
    assert_eq!(engine.membership_days().and_then(|m| m.pending_from_title()), Some(5));

    let host = ScriptedHost::logged_in("Zezima");
    engine.dispatch(&host, &HostEvent::SessionPhaseChanged { phase: SessionPhase::LoggedIn });
    assert_eq!(
        fs::read_to_string(config.membership_dir().join("Zezima.txt")).unwrap(),
        "5"
    );
}

#[test]
fn config_defaults() {
    let config = RecorderConfig::with_base_dir("/tmp/wl");
    assert_eq!(config.bank_wealth.min_log_seconds, 10);
    assert!(config.bank_wealth.only_when_bank_open);
    assert!(config.bank_wealth.dedupe);
    assert_eq!(config.bank_wealth.history_cap, None);
    assert!(!config.membership_days.write_json);
    assert_eq!(config.membership_days.scan_throttle_ms, 1_500);
    assert_eq!(config.bank_dir(), Path::new("/tmp/wl/bank-wealth"));
    assert_eq!(config.membership_dir(), Path::new("/tmp/wl/membership-days"));
    assert_eq!(config.bank_wealth.policy().min_interval_ms, 10_000);
}

#[test]
fn config_load_accepts_camel_case_aliases() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("recorder.json");
    fs::write(
        &path,
        r#"{
            "base_dir": "/data/rl",
            "bank_wealth": { "minLogSeconds": 30, "onlyWhenBankOpen": false, "dedupeEnabled": false },
            "membership_days": { "writeJsonAlso": true, "outputFolderName": "days" }
        }"#,
    )
    .unwrap();

    let config = RecorderConfig::load(path.to_str().unwrap()).unwrap();
    assert_eq!(config.base_dir, Path::new("/data/rl"));
    assert_eq!(config.bank_wealth.min_log_seconds, 30);
    assert!(!config.bank_wealth.only_when_bank_open);
    assert!(!config.bank_wealth.dedupe);
    assert_eq!(config.bank_wealth.output_folder_name, "bank-wealth");
    assert!(config.membership_days.write_json);
    assert_eq!(config.membership_dir(), Path::new("/data/rl/days"));
}

#[test]
fn config_load_reports_bad_files() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.json");
    let err = RecorderConfig::load(missing.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().starts_with("Cannot read"));

    let bad = dir.path().join("bad.json");
    fs::write(&bad, "not json").unwrap();
    let err = RecorderConfig::load(bad.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().starts_with("Cannot parse"));
}

#[test]
fn reader_summarizes_every_player() {
    let dir = TempDir::new().unwrap();
    let writer = JsonHistoryWriter::new(dir.path());
    writer.write("Bob", &BankSnapshot::new(1_000, 300, 50), "t0").unwrap();
    writer.write("Bob", &BankSnapshot::new(2_000, 400, 60), "t1").unwrap();
    writer.write("Alice", &BankSnapshot::new(500, 100, 0), "t2").unwrap();
    fs::write(dir.path().join("broken.json"), "{").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let all = all_wealth(dir.path());
    let names: Vec<&str> = all.iter().map(|s| s.rsn.as_str()).collect();
    assert_eq!(names, vec!["Alice", "Bob"]);

    let bob = &all[1];
    assert_eq!(bob.bank_value, 2_060);
    assert_eq!(bob.coins, 460);
    assert_eq!(bob.timestamp, "t1");
    assert_eq!(bob.last_updated, "t1");
}

#[test]
fn reader_handles_missing_players_and_folders() {
    let dir = TempDir::new().unwrap();
    assert!(latest_wealth(dir.path(), "Nobody").unwrap().is_none());
    assert!(all_wealth(&dir.path().join("absent")).is_empty());
}
