use crate::types::TransactionId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Malformed record {transaction_id}: field '{field}' {reason}")]
    MalformedRecord {
        transaction_id: TransactionId,
        field:          &'static str,
        reason:         String,
    },

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No {table} entry for key '{key}'")]
    DimensionLookup { table: &'static str, key: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
