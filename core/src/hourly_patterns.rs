//! Transaction volume and amount spread by hour of day.

use crate::{
    config::AnalysisConfig,
    detector::Detector,
    error::AnalysisResult,
    snapshot::Snapshot,
    stats,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPattern {
    pub hour_of_day:       u32,
    pub transaction_count: usize,
    pub avg_amount:        f64,
    pub total_amount:      f64,
    pub min_amount:        f64,
    pub max_amount:        f64,
    /// `None` for an hour with a single transaction.
    pub amount_stddev:     Option<f64>,
}

pub struct HourlyPatternAnalyzer;

impl Detector for HourlyPatternAnalyzer {
    /// Ascending by hour; hours without transactions are absent.
    type Output = Vec<HourlyPattern>;

    fn name(&self) -> &'static str {
        "hourly_patterns"
    }

    fn run(&self, snapshot: &Snapshot, _config: &AnalysisConfig) -> AnalysisResult<Vec<HourlyPattern>> {
        let mut by_hour: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
        for txn in snapshot.transactions() {
            by_hour.entry(txn.hour()).or_default().push(txn.amount);
        }

        Ok(by_hour
            .into_iter()
            .map(|(hour_of_day, amounts)| {
                let (min_amount, max_amount) = stats::min_max(&amounts).unwrap_or((0.0, 0.0));
                HourlyPattern {
                    hour_of_day,
                    transaction_count: amounts.len(),
                    avg_amount: stats::mean(&amounts),
                    total_amount: amounts.iter().sum(),
                    min_amount,
                    max_amount,
                    amount_stddev: stats::sample_stddev_opt(&amounts),
                }
            })
            .collect())
    }
}
