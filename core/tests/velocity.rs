//! Rapid successive transactions per card.

mod common;

use chrono::Duration;
use fraudscope_core::{
    config::AnalysisConfig, detector::Detector, velocity_detector::VelocityDetector,
};

fn config_with_window(minutes: f64) -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.velocity.window_minutes = minutes;
    config
}

/// Fixture gaps on card 1234 are 15/60/15/15 minutes; nothing is within 5.
#[test]
fn fixture_has_no_rapid_transactions_at_default_window() {
    let report = VelocityDetector.run(&common::snapshot(), &AnalysisConfig::default()).unwrap();
    assert!(report.rapid.is_empty());
    assert_eq!(report.window_minutes, 5.0);
}

#[test]
fn fifteen_minute_window_flags_the_coffee_run() {
    let report = VelocityDetector.run(&common::snapshot(), &config_with_window(15.0)).unwrap();

    let ids: Vec<u64> = report.rapid.iter().map(|r| r.transaction.id).collect();
    // Ordered by card then time: 07:15, 07:30, 08:30, 08:45, 09:00.
    assert_eq!(ids, vec![3, 9, 1, 5, 7]);
    assert_eq!(report.cards_flagged().into_iter().collect::<Vec<_>>(), vec!["1234"]);

    let first = &report.rapid[0];
    assert_eq!(first.minutes_since_prev, None);
    assert_eq!(first.minutes_to_next, Some(15.0));
    let last = &report.rapid[4];
    assert_eq!(last.minutes_since_prev, Some(15.0));
    assert_eq!(last.minutes_to_next, None);
}

#[test]
fn pairs_are_flagged_from_both_ends() {
    let snap = common::snapshot_of(vec![
        common::txn(1, "2018-05-01 10:00:00", 5.0, "A", 1),
        common::txn(2, "2018-05-01 10:03:00", 5.0, "A", 1),
        common::txn(3, "2018-05-01 11:00:00", 5.0, "A", 1),
        common::txn(4, "2018-05-01 10:01:00", 5.0, "B", 1),
    ]);
    let report = VelocityDetector.run(&snap, &AnalysisConfig::default()).unwrap();

    let ids: Vec<u64> = report.rapid.iter().map(|r| r.transaction.id).collect();
    assert_eq!(ids, vec![1, 2], "card B has a single transaction; 11:00 is isolated");
    assert_eq!(report.rapid[0].minutes_to_next, Some(3.0));
    assert_eq!(report.rapid[1].minutes_since_prev, Some(3.0));
}

#[test]
fn gap_equal_to_window_is_rapid() {
    let snap = common::snapshot_of(vec![
        common::txn(1, "2018-05-01 10:00:00", 5.0, "A", 1),
        common::txn(2, "2018-05-01 10:05:00", 5.0, "A", 1),
        common::txn(3, "2018-05-01 10:10:01", 5.0, "A", 1),
    ]);
    let report = VelocityDetector.run(&snap, &AnalysisConfig::default()).unwrap();
    let ids: Vec<u64> = report.rapid.iter().map(|r| r.transaction.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

/// Sub-millisecond excess over the window still counts as outside it.
#[test]
fn gap_just_over_window_is_not_rapid() {
    let mut late = common::txn(2, "2018-05-01 08:05:00", 5.0, "A", 1);
    late.timestamp += Duration::microseconds(900);
    let snap = common::snapshot_of(vec![common::txn(1, "2018-05-01 08:00:00", 5.0, "A", 1), late]);

    let report = VelocityDetector.run(&snap, &AnalysisConfig::default()).unwrap();
    assert!(report.rapid.is_empty(), "flagged {:?}", report.rapid);
}

/// Same-instant transactions order by id and have a zero gap.
#[test]
fn simultaneous_transactions_order_by_id() {
    let snap = common::snapshot_of(vec![
        common::txn(9, "2018-05-01 10:00:00", 5.0, "A", 1),
        common::txn(4, "2018-05-01 10:00:00", 5.0, "A", 1),
    ]);
    let report = VelocityDetector.run(&snap, &AnalysisConfig::default()).unwrap();
    let ids: Vec<u64> = report.rapid.iter().map(|r| r.transaction.id).collect();
    assert_eq!(ids, vec![4, 9]);
    assert_eq!(report.rapid[1].minutes_since_prev, Some(0.0));
}

/// min_transaction_count is carried but does not filter.
#[test]
fn min_transaction_count_is_inert() {
    let snap = common::snapshot_of(vec![
        common::txn(1, "2018-05-01 10:00:00", 5.0, "A", 1),
        common::txn(2, "2018-05-01 10:02:00", 5.0, "A", 1),
    ]);
    let mut config = AnalysisConfig::default();
    config.velocity.min_transaction_count = 50;
    let report = VelocityDetector.run(&snap, &config).unwrap();

    assert_eq!(report.rapid.len(), 2);
    assert_eq!(report.min_transaction_count, 50);
}

#[test]
fn negative_window_is_rejected() {
    let err = VelocityDetector.run(&common::snapshot(), &config_with_window(-1.0));
    assert!(err.is_err());
}
