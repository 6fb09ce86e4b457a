//! Velocity detector: rapid successive transactions on one card.
//!
//! Per card: sort by (timestamp, id), then one linear scan computing
//! the gap to the previous and next transaction. A transaction is
//! rapid when either gap is within the window. Because the same gap
//! is seen from both ends, flags always come in pairs.

use crate::{
    config::AnalysisConfig,
    detector::Detector,
    error::AnalysisResult,
    ledger::Transaction,
    snapshot::Snapshot,
    types::CardNumber,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RapidTransaction {
    #[serde(flatten)]
    pub transaction:        Transaction,
    pub minutes_since_prev: Option<f64>,
    pub minutes_to_next:    Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VelocityReport {
    pub window_minutes: f64,
    /// Carried through from config; it does not restrict `rapid`.
    pub min_transaction_count: usize,
    /// Flagged transactions ordered by card, timestamp, id.
    pub rapid: Vec<RapidTransaction>,
}

impl VelocityReport {
    pub fn cards_flagged(&self) -> BTreeSet<&str> {
        self.rapid.iter().map(|r| r.transaction.card_id.as_str()).collect()
    }
}

pub struct VelocityDetector;

impl Detector for VelocityDetector {
    type Output = VelocityReport;

    fn name(&self) -> &'static str {
        "velocity_detector"
    }

    fn run(&self, snapshot: &Snapshot, config: &AnalysisConfig) -> AnalysisResult<VelocityReport> {
        config.velocity.validate()?;
        let window = config.velocity.window_minutes;

        // BTreeMap keeps partitions in card order for the output.
        let mut partitions: BTreeMap<&CardNumber, Vec<&Transaction>> = BTreeMap::new();
        for txn in snapshot.transactions() {
            partitions.entry(&txn.card_id).or_default().push(txn);
        }

        let mut rapid = Vec::new();
        for (_, mut txns) in partitions {
            txns.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));

            for (i, txn) in txns.iter().enumerate() {
                let since_prev = i
                    .checked_sub(1)
                    .map(|p| minutes_between(txns[p].timestamp, txn.timestamp));
                let to_next = txns
                    .get(i + 1)
                    .map(|n| minutes_between(txn.timestamp, n.timestamp));

                let within = |gap: Option<f64>| gap.is_some_and(|g| g <= window);
                if within(since_prev) || within(to_next) {
                    rapid.push(RapidTransaction {
                        transaction:        (*txn).clone(),
                        minutes_since_prev: since_prev,
                        minutes_to_next:    to_next,
                    });
                }
            }
        }

        log::debug!(
            "velocity: {} rapid transactions within {window} min",
            rapid.len()
        );

        Ok(VelocityReport {
            window_minutes: window,
            min_transaction_count: config.velocity.min_transaction_count,
            rapid,
        })
    }
}

fn minutes_between(earlier: NaiveDateTime, later: NaiveDateTime) -> f64 {
    let delta = later - earlier;
    match delta.num_nanoseconds() {
        Some(ns) => ns as f64 / 60_000_000_000.0,
        None => delta.num_milliseconds() as f64 / 60_000.0,
    }
}
