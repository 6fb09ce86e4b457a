//! The immutable input of one analysis run.
//!
//! A snapshot is built once, shared read-only by every detector,
//! and discarded when the run completes. Nothing derived from it
//! (bounds, tables, report) outlives the run.

use crate::{
    error::{AnalysisError, AnalysisResult},
    ledger::{Dimensions, MalformedRecord, RawTransaction, Transaction},
    types::{CardNumber, CardholderId},
};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    transactions: Vec<Transaction>,
    card_holders: HashMap<CardNumber, CardholderId>,
    malformed:    Vec<MalformedRecord>,
}

impl Snapshot {
    /// Build from already-joined transactions.
    ///
    /// Fails only when the set as a whole is unusable: duplicate
    /// transaction ids, or a card that belongs to two cardholders.
    pub fn new(transactions: Vec<Transaction>) -> AnalysisResult<Self> {
        let mut seen = HashSet::with_capacity(transactions.len());
        let mut card_holders: HashMap<CardNumber, CardholderId> = HashMap::new();

        for txn in &transactions {
            if !seen.insert(txn.id) {
                return Err(AnalysisError::InvalidSnapshot(format!(
                    "duplicate transaction id {}",
                    txn.id
                )));
            }
            match card_holders.get(&txn.card_id) {
                Some(&holder) if holder != txn.cardholder_id => {
                    return Err(AnalysisError::InvalidSnapshot(format!(
                        "card {} belongs to cardholders {} and {}",
                        txn.card_id, holder, txn.cardholder_id
                    )));
                }
                Some(_) => {}
                None => {
                    card_holders.insert(txn.card_id.clone(), txn.cardholder_id);
                }
            }
        }

        Ok(Self {
            transactions,
            card_holders,
            malformed: Vec::new(),
        })
    }

    /// Join raw rows against the dimension tables. Rows that fail to
    /// parse or resolve are excluded and kept in `malformed()`.
    pub fn from_raw(rows: &[RawTransaction], dims: &Dimensions) -> AnalysisResult<Self> {
        let (transactions, malformed) = dims.join(rows);
        let mut snapshot = Self::new(transactions)?;
        if !malformed.is_empty() {
            log::warn!(
                "{} of {} ledger rows excluded as malformed",
                malformed.len(),
                rows.len()
            );
        }
        snapshot.malformed = malformed;
        Ok(snapshot)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn malformed(&self) -> &[MalformedRecord] {
        &self.malformed
    }

    /// Card → cardholder lookup.
    pub fn cardholder_of(&self, card_id: &str) -> AnalysisResult<CardholderId> {
        self.card_holders
            .get(card_id)
            .copied()
            .ok_or_else(|| AnalysisError::DimensionLookup {
                table: "card",
                key:   card_id.to_string(),
            })
    }
}
