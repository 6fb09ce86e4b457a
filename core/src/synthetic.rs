//! Synthetic ledger generation.
//!
//! Produces dimension tables plus raw transaction rows with known
//! fraud shapes planted in ordinary spending:
//!   - card-testing bursts: runs of sub-$2 purchases on one card,
//!     minutes apart
//!   - high-value outliers, placed in the early-morning window
//!   - optionally, corrupted rows (bad timestamp or amount)
//!
//! Same seed and params ⇒ identical ledger, row for row.

use crate::{
    error::AnalysisResult,
    ledger::{Card, CardHolder, Dimensions, Merchant, MerchantCategory, RawTransaction},
    name_generator::{NameGenerator, MERCHANT_CATEGORIES},
    rng::{LedgerRng, LedgerStream},
    snapshot::Snapshot,
    types::TransactionId,
};
use chrono::{Duration, NaiveDate, NaiveDateTime};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct SyntheticParams {
    pub cardholders:         usize,
    pub merchants:           usize,
    pub transactions:        usize,
    pub start_date:          NaiveDate,
    pub days:                u32,
    pub card_testing_bursts: usize,
    pub outliers:            usize,
    pub corrupted_rows:      usize,
}

impl Default for SyntheticParams {
    fn default() -> Self {
        Self {
            cardholders:         25,
            merchants:           50,
            transactions:        2_000,
            start_date:          NaiveDate::from_ymd_opt(2018, 1, 1).unwrap_or_default(),
            days:                365,
            card_testing_bursts: 12,
            outliers:            6,
            corrupted_rows:      0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyntheticLedger {
    pub cardholders: Vec<CardHolder>,
    pub cards:       Vec<Card>,
    pub merchants:   Vec<Merchant>,
    pub categories:  Vec<MerchantCategory>,
    pub rows:        Vec<RawTransaction>,
}

impl SyntheticLedger {
    pub fn generate(seed: u64, params: &SyntheticParams) -> Self {
        let categories: Vec<MerchantCategory> = MERCHANT_CATEGORIES
            .iter()
            .enumerate()
            .map(|(i, name)| MerchantCategory {
                id:   i as u64 + 1,
                name: name.to_string(),
            })
            .collect();

        let mut holder_rng = LedgerRng::new(seed, LedgerStream::Cardholders);
        let cardholders: Vec<CardHolder> = (1..=params.cardholders.max(1) as u64)
            .map(|id| CardHolder {
                id,
                name: NameGenerator::cardholder_name(&mut holder_rng),
            })
            .collect();

        // One or two cards per holder; the leading index keeps numbers unique.
        let mut card_rng = LedgerRng::new(seed, LedgerStream::Cards);
        let mut cards = Vec::new();
        for holder in &cardholders {
            let count = card_rng.between(1, 2);
            for _ in 0..count {
                let serial = card_rng.below(1_000_000_000_000);
                cards.push(Card {
                    card_id:       format!("4{:03}{serial:012}", cards.len()),
                    cardholder_id: holder.id,
                });
            }
        }

        let mut merchant_rng = LedgerRng::new(seed, LedgerStream::Merchants);
        let merchants: Vec<Merchant> = (1..=params.merchants.max(1) as u64)
            .map(|id| {
                let category = merchant_rng.pick(&categories);
                Merchant {
                    id,
                    name: NameGenerator::merchant_name(&mut merchant_rng, &category.name),
                    category_id: category.id,
                }
            })
            .collect();

        let start = params.start_date.and_hms_opt(0, 0, 0).unwrap_or_default();
        let span_secs = u64::from(params.days.max(1)) * 86_400;
        let mut rows = Vec::with_capacity(
            params.transactions + params.card_testing_bursts * 12 + params.outliers,
        );
        let mut next_id: TransactionId = 1;

        let mut txn_rng = LedgerRng::new(seed, LedgerStream::Transactions);
        for _ in 0..params.transactions {
            let at = start + Duration::seconds(txn_rng.below(span_secs) as i64);
            let amount = txn_rng.pareto(4.0, 1.4).min(1_800.0);
            let card = txn_rng.pick(&cards);
            let merchant = txn_rng.pick(&merchants);
            rows.push(row(&mut next_id, at, amount, card, merchant));
        }

        let mut burst_rng = LedgerRng::new(seed, LedgerStream::CardTesting);
        for _ in 0..params.card_testing_bursts {
            let card = burst_rng.pick(&cards);
            let mut at = start + Duration::seconds(burst_rng.below(span_secs) as i64);
            for _ in 0..burst_rng.between(3, 12) {
                let merchant = burst_rng.pick(&merchants);
                let amount = burst_rng.uniform(0.50, 1.99);
                rows.push(row(&mut next_id, at, amount, card, merchant));
                at += Duration::seconds(burst_rng.between(30, 240) as i64);
            }
        }

        let mut outlier_rng = LedgerRng::new(seed, LedgerStream::Outliers);
        for _ in 0..params.outliers {
            let day = outlier_rng.below(u64::from(params.days.max(1))) as i64;
            let secs = outlier_rng.between(7 * 3_600, 9 * 3_600 + 3_599) as i64;
            let at = start + Duration::days(day) + Duration::seconds(secs);
            let amount = outlier_rng.uniform(1_000.0, 2_500.0);
            let card = outlier_rng.pick(&cards);
            let merchant = outlier_rng.pick(&merchants);
            rows.push(row(&mut next_id, at, amount, card, merchant));
        }

        let mut corrupt_rng = LedgerRng::new(seed, LedgerStream::Corruption);
        for _ in 0..params.corrupted_rows.min(rows.len()) {
            let idx = corrupt_rng.below(rows.len() as u64) as usize;
            if corrupt_rng.chance(0.5) {
                rows[idx].date = "not-a-date".into();
            } else {
                rows[idx].amount = "n/a".into();
            }
        }

        log::debug!(
            "synthetic ledger seed={seed}: {} cardholders, {} cards, {} merchants, {} rows",
            cardholders.len(),
            cards.len(),
            merchants.len(),
            rows.len()
        );

        Self {
            cardholders,
            cards,
            merchants,
            categories,
            rows,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(
            self.cardholders.clone(),
            self.cards.clone(),
            self.merchants.clone(),
            self.categories.clone(),
        )
    }

    pub fn snapshot(&self) -> AnalysisResult<Snapshot> {
        Snapshot::from_raw(&self.rows, &self.dimensions())
    }
}

fn row(
    next_id: &mut TransactionId,
    at: NaiveDateTime,
    amount: f64,
    card: &Card,
    merchant: &Merchant,
) -> RawTransaction {
    let id = *next_id;
    *next_id += 1;
    RawTransaction {
        id,
        date: at.format(TIMESTAMP_FORMAT).to_string(),
        amount: format!("{amount:.2}"),
        card: card.card_id.clone(),
        merchant_id: merchant.id,
    }
}
