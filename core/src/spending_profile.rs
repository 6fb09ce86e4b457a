//! Per-cardholder spending profiles across all of a holder's cards.

use crate::{
    config::AnalysisConfig,
    detector::Detector,
    error::AnalysisResult,
    ledger::Transaction,
    snapshot::Snapshot,
    stats,
    types::CardholderId,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingProfile {
    pub cardholder_id:          CardholderId,
    pub cardholder_name:        String,
    pub total_transactions:     usize,
    pub avg_transaction_amount: f64,
    pub total_spent:            f64,
    pub min_transaction:        f64,
    pub max_transaction:        f64,
    pub amount_stddev:          Option<f64>,
    pub unique_merchants_used:  usize,
    pub unique_categories_used: usize,
    pub first_transaction:      NaiveDateTime,
    pub last_transaction:       NaiveDateTime,
}

impl SpendingProfile {
    fn from_transactions(txns: &[&Transaction]) -> Option<Self> {
        let first = txns.first()?;
        let amounts: Vec<f64> = txns.iter().map(|t| t.amount).collect();
        let (min_transaction, max_transaction) = stats::min_max(&amounts)?;
        let first_transaction = txns.iter().map(|t| t.timestamp).min()?;
        let last_transaction = txns.iter().map(|t| t.timestamp).max()?;

        Some(Self {
            cardholder_id: first.cardholder_id,
            cardholder_name: first.cardholder_name.clone(),
            total_transactions: txns.len(),
            avg_transaction_amount: stats::mean(&amounts),
            total_spent: amounts.iter().sum(),
            min_transaction,
            max_transaction,
            amount_stddev: stats::sample_stddev_opt(&amounts),
            unique_merchants_used: txns.iter().map(|t| t.merchant_id).collect::<HashSet<_>>().len(),
            unique_categories_used: txns
                .iter()
                .map(|t| t.merchant_category.as_str())
                .collect::<HashSet<_>>()
                .len(),
            first_transaction,
            last_transaction,
        })
    }
}

pub struct SpendingProfiler;

impl Detector for SpendingProfiler {
    /// By descending total spent, ties by cardholder id.
    type Output = Vec<SpendingProfile>;

    fn name(&self) -> &'static str {
        "spending_profiler"
    }

    fn run(&self, snapshot: &Snapshot, _config: &AnalysisConfig) -> AnalysisResult<Vec<SpendingProfile>> {
        let mut by_holder: HashMap<CardholderId, Vec<&Transaction>> = HashMap::new();
        for txn in snapshot.transactions() {
            by_holder.entry(txn.cardholder_id).or_default().push(txn);
        }

        let mut profiles: Vec<SpendingProfile> = by_holder
            .values()
            .filter_map(|txns| SpendingProfile::from_transactions(txns))
            .collect();
        profiles.sort_by(|a, b| {
            b.total_spent
                .total_cmp(&a.total_spent)
                .then_with(|| a.cardholder_id.cmp(&b.cardholder_id))
        });
        Ok(profiles)
    }
}
