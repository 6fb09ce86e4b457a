//! Early-morning window: the highest-value transactions made between
//! `start_hour` and `end_hour` (inclusive, local time).

use crate::{
    config::AnalysisConfig,
    detector::Detector,
    error::AnalysisResult,
    ledger::Transaction,
    snapshot::Snapshot,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarlyMorningTransaction {
    #[serde(flatten)]
    pub transaction:         Transaction,
    pub hour_of_transaction: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EarlyMorningReport {
    /// Top N by descending amount, ties by earlier timestamp.
    pub transactions: Vec<EarlyMorningTransaction>,
    /// Ids of the rows in `transactions` above the high-value threshold.
    pub high_value_ids: Vec<u64>,
}

impl EarlyMorningReport {
    pub fn high_value_count(&self) -> usize {
        self.high_value_ids.len()
    }
}

pub struct TemporalWindowFilter;

impl Detector for TemporalWindowFilter {
    type Output = EarlyMorningReport;

    fn name(&self) -> &'static str {
        "temporal_window"
    }

    fn run(&self, snapshot: &Snapshot, config: &AnalysisConfig) -> AnalysisResult<EarlyMorningReport> {
        let cfg = &config.early_morning;
        cfg.validate()?;

        let mut in_window: Vec<&Transaction> = snapshot
            .transactions()
            .iter()
            .filter(|t| (cfg.start_hour..=cfg.end_hour).contains(&t.hour()))
            .collect();

        in_window.sort_by(|a, b| {
            b.amount
                .total_cmp(&a.amount)
                .then_with(|| a.timestamp.cmp(&b.timestamp))
        });
        in_window.truncate(config.top_n.early_morning);

        let high_value_ids = in_window
            .iter()
            .filter(|t| t.amount > cfg.high_value_threshold)
            .map(|t| t.id)
            .collect();

        let transactions = in_window
            .into_iter()
            .map(|t| EarlyMorningTransaction {
                transaction:         t.clone(),
                hour_of_transaction: t.hour(),
            })
            .collect();

        Ok(EarlyMorningReport {
            transactions,
            high_value_ids,
        })
    }
}
