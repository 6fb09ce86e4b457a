//! Merchant vulnerability ranking.
//!
//! Ranks merchants by how many card-testing (sub-threshold)
//! transactions pass through them. Input is the small-transaction
//! subset, never the full snapshot.

use crate::{
    config::AnalysisConfig,
    error::AnalysisResult,
    ledger::Transaction,
    snapshot::Snapshot,
    stats,
    types::MerchantId,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub const RANKER_NAME: &str = "merchant_ranker";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantVulnerability {
    pub merchant_id:                 MerchantId,
    pub merchant_name:               String,
    pub merchant_category:           String,
    pub small_transaction_count:     usize,
    pub avg_small_amount:            f64,
    pub unique_cards_affected:       usize,
    pub unique_cardholders_affected: usize,
    pub min_transaction:             f64,
    pub max_transaction:             f64,
}

/// Top K merchants by descending small-transaction count, ties by
/// merchant id. Cardholders are resolved through the card lookup; a
/// card missing from it fails the ranking as a whole.
pub fn rank_merchants(
    snapshot: &Snapshot,
    small: &[&Transaction],
    config: &AnalysisConfig,
) -> AnalysisResult<Vec<MerchantVulnerability>> {
    config.small_transactions.validate()?;

    let mut by_merchant: BTreeMap<MerchantId, Vec<&Transaction>> = BTreeMap::new();
    for &txn in small {
        by_merchant.entry(txn.merchant_id).or_default().push(txn);
    }

    let mut ranked = Vec::with_capacity(by_merchant.len());
    for (merchant_id, txns) in by_merchant {
        let amounts: Vec<f64> = txns.iter().map(|t| t.amount).collect();
        let (min_transaction, max_transaction) = stats::min_max(&amounts).unwrap_or((0.0, 0.0));

        let cards: HashSet<&str> = txns.iter().map(|t| t.card_id.as_str()).collect();
        let mut holders = HashSet::with_capacity(cards.len());
        for card in &cards {
            holders.insert(snapshot.cardholder_of(card)?);
        }

        ranked.push(MerchantVulnerability {
            merchant_id,
            merchant_name: txns[0].merchant_name.clone(),
            merchant_category: txns[0].merchant_category.clone(),
            small_transaction_count: txns.len(),
            avg_small_amount: stats::mean(&amounts),
            unique_cards_affected: cards.len(),
            unique_cardholders_affected: holders.len(),
            min_transaction,
            max_transaction,
        });
    }

    // by_merchant iterates in id order, so a stable sort on count
    // leaves ties in ascending merchant id.
    ranked.sort_by(|a, b| b.small_transaction_count.cmp(&a.small_transaction_count));
    ranked.truncate(config.top_n.vulnerable_merchants);
    Ok(ranked)
}
