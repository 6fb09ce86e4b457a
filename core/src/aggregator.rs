//! Corpus-level statistics: counts, amount range, volume, date range.

use crate::{
    config::AnalysisConfig,
    detector::Detector,
    error::AnalysisResult,
    snapshot::Snapshot,
    stats,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end:   NaiveDateTime,
}

/// Empty input yields all zeros and no date range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicStatistics {
    pub total_transactions: usize,
    pub unique_cards:       usize,
    pub unique_merchants:   usize,
    pub avg_amount:         f64,
    pub min_amount:         f64,
    pub max_amount:         f64,
    pub total_volume:       f64,
    pub date_range:         Option<DateRange>,
}

pub struct Aggregator;

impl Detector for Aggregator {
    type Output = BasicStatistics;

    fn name(&self) -> &'static str {
        "aggregator"
    }

    fn run(&self, snapshot: &Snapshot, _config: &AnalysisConfig) -> AnalysisResult<BasicStatistics> {
        let txns = snapshot.transactions();
        if txns.is_empty() {
            return Ok(BasicStatistics::default());
        }

        let amounts: Vec<f64> = txns.iter().map(|t| t.amount).collect();
        let (min_amount, max_amount) = stats::min_max(&amounts).unwrap_or((0.0, 0.0));

        let unique_cards = txns.iter().map(|t| t.card_id.as_str()).collect::<HashSet<_>>().len();
        let unique_merchants = txns.iter().map(|t| t.merchant_id).collect::<HashSet<_>>().len();

        let date_range = txns
            .iter()
            .map(|t| t.timestamp)
            .fold(None, |acc: Option<DateRange>, ts| match acc {
                None => Some(DateRange { start: ts, end: ts }),
                Some(r) => Some(DateRange {
                    start: r.start.min(ts),
                    end:   r.end.max(ts),
                }),
            });

        Ok(BasicStatistics {
            total_transactions: txns.len(),
            unique_cards,
            unique_merchants,
            avg_amount: stats::mean(&amounts),
            min_amount,
            max_amount,
            total_volume: amounts.iter().sum(),
            date_range,
        })
    }
}
