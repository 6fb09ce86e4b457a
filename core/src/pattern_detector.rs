//! Card-testing detector.
//!
//! Stolen cards are often probed with a run of tiny purchases before a
//! large one. This groups every sub-threshold transaction by card.

use crate::{
    config::{AnalysisConfig, SmallTransactionConfig},
    detector::Detector,
    error::AnalysisResult,
    ledger::Transaction,
    snapshot::Snapshot,
    stats,
    types::CardNumber,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardTestingProfile {
    pub card_id:                 CardNumber,
    pub cardholder_name:         String,
    pub small_transaction_count: usize,
    pub avg_small_amount:        f64,
    pub min_amount:              f64,
    pub max_amount:              f64,
    /// Distinct category names, sorted.
    pub merchant_categories_used: BTreeSet<String>,
    pub high_risk:               bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardTestingReport {
    pub amount_threshold: f64,
    /// By descending count, then card id.
    pub profiles: Vec<CardTestingProfile>,
}

impl CardTestingReport {
    pub fn total_small_transactions(&self) -> usize {
        self.profiles.iter().map(|p| p.small_transaction_count).sum()
    }

    pub fn high_risk_cards(&self) -> usize {
        self.profiles.iter().filter(|p| p.high_risk).count()
    }
}

/// Transactions strictly below the small-amount threshold, in snapshot order.
/// Shared with the merchant ranker.
pub fn small_transactions<'a>(
    snapshot: &'a Snapshot,
    config: &SmallTransactionConfig,
) -> Vec<&'a Transaction> {
    snapshot
        .transactions()
        .iter()
        .filter(|t| t.amount < config.amount_threshold)
        .collect()
}

pub struct PatternDetector;

impl Detector for PatternDetector {
    type Output = CardTestingReport;

    fn name(&self) -> &'static str {
        "pattern_detector"
    }

    fn run(&self, snapshot: &Snapshot, config: &AnalysisConfig) -> AnalysisResult<CardTestingReport> {
        let cfg = &config.small_transactions;
        cfg.validate()?;

        let mut by_card: HashMap<&str, Vec<&Transaction>> = HashMap::new();
        for txn in small_transactions(snapshot, cfg) {
            by_card.entry(txn.card_id.as_str()).or_default().push(txn);
        }

        let mut profiles: Vec<CardTestingProfile> = by_card
            .into_iter()
            .map(|(card_id, txns)| {
                let amounts: Vec<f64> = txns.iter().map(|t| t.amount).collect();
                let (min_amount, max_amount) = stats::min_max(&amounts).unwrap_or((0.0, 0.0));
                let count = txns.len();
                CardTestingProfile {
                    card_id: card_id.to_string(),
                    cardholder_name: txns[0].cardholder_name.clone(),
                    small_transaction_count: count,
                    avg_small_amount: stats::mean(&amounts),
                    min_amount,
                    max_amount,
                    merchant_categories_used: txns
                        .iter()
                        .map(|t| t.merchant_category.clone())
                        .collect(),
                    high_risk: count >= cfg.high_risk_count,
                }
            })
            .collect();

        profiles.sort_by(|a, b| {
            b.small_transaction_count
                .cmp(&a.small_transaction_count)
                .then_with(|| a.card_id.cmp(&b.card_id))
        });

        log::debug!(
            "card testing: {} cards with transactions under {:.2}",
            profiles.len(),
            cfg.amount_threshold
        );

        Ok(CardTestingReport {
            amount_threshold: cfg.amount_threshold,
            profiles,
        })
    }
}
