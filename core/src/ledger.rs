//! Ledger records: dimension tables, raw transaction rows, and the
//! denormalized `Transaction` every detector reads.
//!
//! RULE: The core never mutates ledger data. Dimension tables are
//! read-only lookups; joined transactions are immutable once built.

use crate::{
    error::{AnalysisError, AnalysisResult},
    types::{Amount, CardNumber, CardholderId, CategoryId, MerchantId, TransactionId},
};
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

// ── Dimension tables ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardHolder {
    pub id:   CardholderId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub card_id:       CardNumber,
    pub cardholder_id: CardholderId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantCategory {
    pub id:   CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merchant {
    pub id:          MerchantId,
    pub name:        String,
    pub category_id: CategoryId,
}

/// All dimension tables for one ledger, indexed by key.
#[derive(Debug, Clone, Default)]
pub struct Dimensions {
    pub cardholders: HashMap<CardholderId, CardHolder>,
    pub cards:       HashMap<CardNumber, Card>,
    pub merchants:   HashMap<MerchantId, Merchant>,
    pub categories:  HashMap<CategoryId, MerchantCategory>,
}

impl Dimensions {
    pub fn new(
        cardholders: Vec<CardHolder>,
        cards: Vec<Card>,
        merchants: Vec<Merchant>,
        categories: Vec<MerchantCategory>,
    ) -> Self {
        Self {
            cardholders: cardholders.into_iter().map(|c| (c.id, c)).collect(),
            cards:       cards.into_iter().map(|c| (c.card_id.clone(), c)).collect(),
            merchants:   merchants.into_iter().map(|m| (m.id, m)).collect(),
            categories:  categories.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    /// Resolve and parse every raw row. Rows that fail to parse or join are
    /// returned separately; they never abort the join.
    pub fn join(&self, rows: &[RawTransaction]) -> (Vec<Transaction>, Vec<MalformedRecord>) {
        let mut joined = Vec::with_capacity(rows.len());
        let mut malformed = Vec::new();

        for row in rows {
            match self.join_one(row) {
                Ok(txn) => joined.push(txn),
                Err(AnalysisError::MalformedRecord { transaction_id, field, reason }) => {
                    log::warn!("excluding transaction {transaction_id}: {field} {reason}");
                    malformed.push(MalformedRecord { transaction_id, field, reason });
                }
                Err(AnalysisError::DimensionLookup { table, key }) => {
                    log::warn!("excluding transaction {}: no {table} '{key}'", row.id);
                    malformed.push(MalformedRecord {
                        transaction_id: row.id,
                        field:          table,
                        reason:         format!("references unknown key '{key}'"),
                    });
                }
                Err(other) => {
                    malformed.push(MalformedRecord {
                        transaction_id: row.id,
                        field:          "record",
                        reason:         other.to_string(),
                    });
                }
            }
        }

        (joined, malformed)
    }

    fn join_one(&self, row: &RawTransaction) -> AnalysisResult<Transaction> {
        let timestamp = parse_timestamp(row.id, &row.date)?;
        let amount = parse_amount(row.id, &row.amount)?;

        let card = self.cards.get(&row.card).ok_or_else(|| AnalysisError::DimensionLookup {
            table: "card",
            key:   row.card.clone(),
        })?;
        let holder = self
            .cardholders
            .get(&card.cardholder_id)
            .ok_or_else(|| AnalysisError::DimensionLookup {
                table: "cardholder",
                key:   card.cardholder_id.to_string(),
            })?;
        let merchant = self
            .merchants
            .get(&row.merchant_id)
            .ok_or_else(|| AnalysisError::DimensionLookup {
                table: "merchant",
                key:   row.merchant_id.to_string(),
            })?;
        let category = self
            .categories
            .get(&merchant.category_id)
            .ok_or_else(|| AnalysisError::DimensionLookup {
                table: "merchant_category",
                key:   merchant.category_id.to_string(),
            })?;

        Ok(Transaction {
            id: row.id,
            timestamp,
            amount,
            card_id: card.card_id.clone(),
            cardholder_id: holder.id,
            cardholder_name: holder.name.clone(),
            merchant_id: merchant.id,
            merchant_name: merchant.name.clone(),
            merchant_category: category.name.clone(),
        })
    }
}

// ── Transactions ─────────────────────────────────────────────────────────────

/// A transaction row exactly as the loader delivers it.
/// Timestamp and amount are still text at this point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub id:          TransactionId,
    pub date:        String,
    pub amount:      String,
    pub card:        CardNumber,
    #[serde(rename = "id_merchant")]
    pub merchant_id: MerchantId,
}

/// A transaction joined with its card, cardholder, merchant and category labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id:                TransactionId,
    pub timestamp:         NaiveDateTime,
    pub amount:            Amount,
    pub card_id:           CardNumber,
    pub cardholder_id:     CardholderId,
    pub cardholder_name:   String,
    pub merchant_id:       MerchantId,
    pub merchant_name:     String,
    pub merchant_category: String,
}

impl Transaction {
    /// Local wall-clock hour, 0..=23.
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    /// 0 = Sunday … 6 = Saturday.
    pub fn day_of_week(&self) -> u32 {
        self.timestamp.weekday().num_days_from_sunday()
    }
}

/// A row excluded from analysis, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedRecord {
    pub transaction_id: TransactionId,
    pub field:          &'static str,
    pub reason:         String,
}

pub fn parse_timestamp(id: TransactionId, text: &str) -> AnalysisResult<NaiveDateTime> {
    let trimmed = text.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| AnalysisError::MalformedRecord {
            transaction_id: id,
            field:          "date",
            reason:         format!("is not a timestamp: '{trimmed}'"),
        })
}

pub fn parse_amount(id: TransactionId, text: &str) -> AnalysisResult<Amount> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err(AnalysisError::MalformedRecord {
            transaction_id: id,
            field:          "amount",
            reason:         format!("is not finite: '{trimmed}'"),
        }),
        Err(e) => Err(AnalysisError::MalformedRecord {
            transaction_id: id,
            field:          "amount",
            reason:         format!("is not a number: '{trimmed}' ({e})"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims() -> Dimensions {
        Dimensions::new(
            vec![CardHolder { id: 1, name: "Robert Johnson".into() }],
            vec![Card { card_id: "4761049645711555811".into(), cardholder_id: 1 }],
            vec![Merchant { id: 7, name: "Corner Coffee".into(), category_id: 2 }],
            vec![MerchantCategory { id: 2, name: "coffee shop".into() }],
        )
    }

    fn raw(id: TransactionId, date: &str, amount: &str, card: &str, merchant: MerchantId) -> RawTransaction {
        RawTransaction {
            id,
            date: date.into(),
            amount: amount.into(),
            card: card.into(),
            merchant_id: merchant,
        }
    }

    #[test]
    fn accepts_space_and_iso_separators() {
        assert!(parse_timestamp(1, "2018-01-01 08:30:00").is_ok());
        assert!(parse_timestamp(1, "2018-01-01T08:30:00").is_ok());
        assert!(parse_timestamp(1, "2018-01-01 08:30:00.250").is_ok());
        assert!(parse_timestamp(1, "01/01/2018").is_err());
    }

    #[test]
    fn rejects_non_finite_amounts() {
        assert!(parse_amount(1, "NaN").is_err());
        assert!(parse_amount(1, "inf").is_err());
        assert!(parse_amount(1, "abc").is_err());
        assert_eq!(parse_amount(1, " 1.75 ").unwrap(), 1.75);
    }

    #[test]
    fn join_labels_rows_and_isolates_bad_ones() {
        let rows = vec![
            raw(1, "2018-01-01 08:30:00", "1.50", "4761049645711555811", 7),
            raw(2, "not a date", "1.50", "4761049645711555811", 7),
            raw(3, "2018-01-01 08:30:00", "x", "4761049645711555811", 7),
            raw(4, "2018-01-01 08:30:00", "3.00", "0000", 7),
            raw(5, "2018-01-01 08:30:00", "3.00", "4761049645711555811", 99),
        ];
        let (joined, malformed) = dims().join(&rows);

        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].cardholder_name, "Robert Johnson");
        assert_eq!(joined[0].merchant_category, "coffee shop");
        assert_eq!(joined[0].hour(), 8);
        assert_eq!(joined[0].day_of_week(), 1, "2018-01-01 was a Monday");

        let ids: Vec<_> = malformed.iter().map(|m| m.transaction_id).collect();
        assert_eq!(ids, vec![2, 3, 4, 5]);
        assert_eq!(malformed[0].field, "date");
        assert_eq!(malformed[1].field, "amount");
        assert_eq!(malformed[2].field, "card");
        assert_eq!(malformed[3].field, "merchant");
    }
}
