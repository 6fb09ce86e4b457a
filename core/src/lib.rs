//! fraudscope-core: statistical fraud-signal analysis over a card
//! transaction ledger.
//!
//! The core is pure: it takes an in-memory `Snapshot` and returns
//! in-memory tables. Loading, persistence and rendering belong to the
//! caller (see the `fraud-runner` tool).

pub mod aggregator;
pub mod config;
pub mod detector;
pub mod engine;
pub mod error;
pub mod hourly_patterns;
pub mod ledger;
pub mod merchant_ranker;
pub mod name_generator;
pub mod outlier_detector;
pub mod pattern_detector;
pub mod rng;
pub mod snapshot;
pub mod spending_profile;
pub mod stats;
pub mod summary;
pub mod synthetic;
pub mod temporal_window;
pub mod types;
pub mod velocity_detector;

pub use config::AnalysisConfig;
pub use engine::{AnalysisEngine, AnalysisOutcome, DetectorFailure};
pub use error::{AnalysisError, AnalysisResult};
pub use ledger::{Card, CardHolder, Dimensions, Merchant, MerchantCategory, RawTransaction, Transaction};
pub use snapshot::Snapshot;
pub use summary::FraudSummaryReport;
