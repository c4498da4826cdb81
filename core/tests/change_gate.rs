//! Change gate tests: throttle, dedupe, and zero suppression.

use wealthlog_core::{
    gate::{GateDecision, RecorderState, WritePolicy},
    snapshot::{BankSnapshot, Snapshot},
};

fn meaningful(s: &BankSnapshot) -> bool {
    !s.is_zero()
}

/// Drive the gate the way a recorder does: evaluate, then commit on write.
fn run(policy: WritePolicy, triggers: &[(i64, BankSnapshot)]) -> Vec<i64> {
    let mut state = RecorderState::new();
    let mut writes = Vec::new();
    for (t, snap) in triggers {
        if state.should_write(snap, *t, policy, meaningful) {
            state.commit(*snap, *t);
            writes.push(*t);
        }
    }
    writes
}

#[test]
fn example_scenario_writes_twice() {
    let policy = WritePolicy::new(10_000, true);
    let writes = run(
        policy,
        &[
            (0, BankSnapshot::new(100, 5, 2)),
            (3_000, BankSnapshot::new(100, 5, 2)),
            (11_000, BankSnapshot::new(150, 5, 2)),
        ],
    );
    assert_eq!(writes, vec![0, 11_000]);
}

#[test]
fn first_observation_is_always_due() {
    let state: RecorderState<BankSnapshot> = RecorderState::new();
    let policy = WritePolicy::new(i64::MAX, true);
    assert_eq!(
        state.evaluate(&BankSnapshot::new(1, 0, 0), 0, policy, meaningful),
        GateDecision::Write
    );
}

#[test]
fn identical_snapshots_write_once_with_dedupe() {
    let policy = WritePolicy::new(1_000, true);
    let snap = BankSnapshot::new(42, 1, 0);
    let triggers: Vec<(i64, BankSnapshot)> = (0..50).map(|i| (i * 700, snap)).collect();
    assert_eq!(run(policy, &triggers), vec![0]);
}

#[test]
fn rapid_changes_inside_window_write_at_most_once_per_window() {
    let policy = WritePolicy::new(10_000, false);
    // A new value every 500ms for 30s.
    let triggers: Vec<(i64, BankSnapshot)> = (0..60)
        .map(|i| (i * 500, BankSnapshot::new(1_000 + i, 0, 0)))
        .collect();
    let writes = run(policy, &triggers);
    assert_eq!(writes, vec![0, 10_000, 20_000]);
    for pair in writes.windows(2) {
        assert!(pair[1] - pair[0] >= 10_000);
    }
}

#[test]
fn dedupe_disabled_rewrites_same_value_once_due() {
    let policy = WritePolicy::new(1_000, false);
    let snap = BankSnapshot::new(7, 7, 7);
    let writes = run(policy, &[(0, snap), (500, snap), (1_000, snap), (1_500, snap)]);
    assert_eq!(writes, vec![0, 1_000]);
}

#[test]
fn distinct_snapshots_both_write_after_interval() {
    let policy = WritePolicy::new(10_000, true);
    let writes = run(
        policy,
        &[(0, BankSnapshot::new(1, 0, 0)), (10_000, BankSnapshot::new(2, 0, 0))],
    );
    assert_eq!(writes, vec![0, 10_000]);
}

#[test]
fn zero_snapshot_is_never_written() {
    let policy = WritePolicy::new(0, true);
    let state: RecorderState<BankSnapshot> = RecorderState::new();
    assert_eq!(
        state.evaluate(&BankSnapshot::default(), 1_000_000, policy, meaningful),
        GateDecision::NotMeaningful
    );
    assert!(run(policy, &[(0, BankSnapshot::default()), (60_000, BankSnapshot::default())]).is_empty());
}

#[test]
fn uncommitted_write_is_retried_on_next_trigger() {
    let policy = WritePolicy::new(10_000, true);
    let mut state = RecorderState::new();
    let snap = BankSnapshot::new(500, 0, 0);

    // The write "failed": caller does not commit.
    assert!(state.should_write(&snap, 0, policy, meaningful));

    // Next trigger, same value, inside what would have been the window.
    assert!(state.should_write(&snap, 1_000, policy, meaningful));
    state.commit(snap, 1_000);

    assert_eq!(state.evaluate(&snap, 2_000, policy, meaningful), GateDecision::Throttled);
    assert_eq!(state.evaluate(&snap, 20_000, policy, meaningful), GateDecision::Unchanged);
}

#[test]
fn last_write_timestamp_never_moves_backwards() {
    let mut state = RecorderState::new();
    state.commit(BankSnapshot::new(1, 0, 0), 5_000);
    state.commit(BankSnapshot::new(2, 0, 0), 4_000);
    assert_eq!(state.last_write_ms(), Some(5_000));
    assert_eq!(state.last_snapshot(), Some(&BankSnapshot::new(2, 0, 0)));
}

#[test]
fn negative_interval_is_clamped() {
    let policy = WritePolicy::new(-5, true);
    assert_eq!(policy.min_interval_ms, 0);
}
