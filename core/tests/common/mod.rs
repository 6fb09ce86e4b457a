//! Shared ledger fixtures for integration tests.
#![allow(dead_code)]

use chrono::NaiveDateTime;
use fraudscope_core::{
    ledger::{Card, CardHolder, Dimensions, Merchant, MerchantCategory, RawTransaction, Transaction},
    snapshot::Snapshot,
};

pub fn ts(text: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").expect("fixture timestamp")
}

pub fn dimensions() -> Dimensions {
    Dimensions::new(
        vec![
            CardHolder { id: 1, name: "John".into() },
            CardHolder { id: 2, name: "Jane".into() },
            CardHolder { id: 3, name: "Bob".into() },
            CardHolder { id: 4, name: "Alice".into() },
        ],
        vec![
            Card { card_id: "1234".into(), cardholder_id: 1 },
            Card { card_id: "5678".into(), cardholder_id: 2 },
            Card { card_id: "9012".into(), cardholder_id: 3 },
            Card { card_id: "3456".into(), cardholder_id: 4 },
        ],
        vec![
            Merchant { id: 1, name: "Coffee Shop".into(), category_id: 1 },
            Merchant { id: 2, name: "Restaurant".into(), category_id: 2 },
            Merchant { id: 3, name: "Gas Station".into(), category_id: 3 },
            Merchant { id: 4, name: "Jewelry Store".into(), category_id: 4 },
        ],
        vec![
            MerchantCategory { id: 1, name: "coffee shop".into() },
            MerchantCategory { id: 2, name: "restaurant".into() },
            MerchantCategory { id: 3, name: "gas station".into() },
            MerchantCategory { id: 4, name: "jewelry".into() },
        ],
    )
}

/// The ten-record day: five sub-$2 coffee purchases on card 1234 between
/// 07:00 and 09:59, ordinary spending on three other cards, and one
/// $2,500 jewelry purchase late in the evening.
pub fn rows() -> Vec<RawTransaction> {
    let data: [(u64, &str, &str, &str, u64); 10] = [
        (1, "2018-01-01 08:30:00", "1.50", "1234", 1),
        (2, "2018-01-01 14:30:00", "25.00", "5678", 2),
        (3, "2018-01-01 07:15:00", "1.75", "1234", 1),
        (4, "2018-01-01 20:30:00", "45.00", "9012", 3),
        (5, "2018-01-01 08:45:00", "1.25", "1234", 1),
        (6, "2018-01-01 12:30:00", "35.00", "5678", 2),
        (7, "2018-01-01 09:00:00", "1.80", "1234", 1),
        (8, "2018-01-01 16:30:00", "55.00", "9012", 3),
        (9, "2018-01-01 07:30:00", "1.95", "1234", 1),
        (10, "2018-01-01 22:30:00", "2500.00", "3456", 4),
    ];
    data.iter()
        .map(|&(id, date, amount, card, merchant_id)| RawTransaction {
            id,
            date: date.into(),
            amount: amount.into(),
            card: card.into(),
            merchant_id,
        })
        .collect()
}

pub fn snapshot() -> Snapshot {
    Snapshot::from_raw(&rows(), &dimensions()).expect("fixture snapshot")
}

/// A bare transaction with placeholder labels.
pub fn txn(id: u64, at: &str, amount: f64, card: &str, merchant_id: u64) -> Transaction {
    Transaction {
        id,
        timestamp: ts(at),
        amount,
        card_id: card.into(),
        cardholder_id: card.bytes().map(u64::from).sum(),
        cardholder_name: format!("holder of {card}"),
        merchant_id,
        merchant_name: format!("merchant {merchant_id}"),
        merchant_category: format!("category {}", merchant_id % 3),
    }
}

pub fn snapshot_of(transactions: Vec<Transaction>) -> Snapshot {
    Snapshot::new(transactions).expect("valid snapshot")
}
