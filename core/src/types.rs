//! Shared primitive types used across the entire analysis core.

/// Unique identifier of a single ledger transaction.
pub type TransactionId = u64;

/// Card number as printed on the statement. Kept as text: leading zeros matter.
pub type CardNumber = String;

pub type CardholderId = u64;

pub type MerchantId = u64;

pub type CategoryId = u64;

/// Amounts are carried as `f64` in the ledger currency.
pub type Amount = f64;
