//! The analysis engine: fans detectors out over one snapshot and
//! merges their tables into a single outcome.
//!
//! EXECUTION ORDER:
//!   1. Leaves, concurrently (rayon::join):
//!        aggregator, outlier detector, velocity detector,
//!        card-testing detector, early-morning window,
//!        hourly patterns, spending profiles
//!   2. Merchant ranker   (needs the small-transaction subset)
//!   3. Summary builder   (needs everything above)
//!
//! RULES:
//!   - Detectors share the snapshot read-only; nothing is mutated.
//!   - A failing detector is logged, listed in `degraded`, and its
//!     table replaced by the empty default. The run continues.
//!   - Only an unusable snapshot is fatal, and that is rejected
//!     before any detector starts.
//!   - Output order is defined by each table's sort keys, never by
//!     which thread finished first.

use crate::{
    aggregator::{Aggregator, BasicStatistics},
    config::AnalysisConfig,
    detector::Detector,
    error::AnalysisResult,
    hourly_patterns::{HourlyPattern, HourlyPatternAnalyzer},
    ledger::{Dimensions, RawTransaction},
    merchant_ranker::{self, MerchantVulnerability},
    outlier_detector::{OutlierDetector, OutlierReport},
    pattern_detector::{self, CardTestingReport, PatternDetector},
    snapshot::Snapshot,
    spending_profile::{SpendingProfile, SpendingProfiler},
    summary::{self, FraudSummaryReport, SummaryInputs},
    temporal_window::{EarlyMorningReport, TemporalWindowFilter},
    velocity_detector::{VelocityDetector, VelocityReport},
};
use serde::Serialize;
use std::time::Instant;

/// A detector that failed during a run and was replaced by an empty table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectorFailure {
    pub detector: &'static str,
    pub reason:   String,
}

/// Everything one run produces. Every table is always present.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisOutcome {
    pub summary:              FraudSummaryReport,
    pub outliers:             OutlierReport,
    pub rapid_transactions:   VelocityReport,
    pub small_transactions:   CardTestingReport,
    pub early_morning:        EarlyMorningReport,
    pub vulnerable_merchants: Vec<MerchantVulnerability>,
    pub hourly_patterns:      Vec<HourlyPattern>,
    pub spending_patterns:    Vec<SpendingProfile>,
    /// Rows excluded before analysis.
    pub malformed_records:    usize,
    pub degraded:             Vec<DetectorFailure>,
}

pub struct AnalysisEngine {
    config: AnalysisConfig,
}

impl AnalysisEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Build the snapshot from raw rows, then run. Fails only when the
    /// snapshot itself is invalid.
    pub fn run_raw(
        &self,
        rows: &[RawTransaction],
        dims: &Dimensions,
    ) -> AnalysisResult<AnalysisOutcome> {
        let snapshot = Snapshot::from_raw(rows, dims)?;
        Ok(self.run(&snapshot))
    }

    pub fn run(&self, snapshot: &Snapshot) -> AnalysisOutcome {
        let started = Instant::now();
        let config = &self.config;

        let (
            ((basic, outliers), (velocity, card_testing)),
            ((early_morning, hourly), spending),
        ) = rayon::join(
            || {
                rayon::join(
                    || {
                        rayon::join(
                            || run_isolated(&Aggregator, snapshot, config),
                            || run_isolated(&OutlierDetector, snapshot, config),
                        )
                    },
                    || {
                        rayon::join(
                            || run_isolated(&VelocityDetector, snapshot, config),
                            || run_isolated(&PatternDetector, snapshot, config),
                        )
                    },
                )
            },
            || {
                rayon::join(
                    || {
                        rayon::join(
                            || run_isolated(&TemporalWindowFilter, snapshot, config),
                            || run_isolated(&HourlyPatternAnalyzer, snapshot, config),
                        )
                    },
                    || run_isolated(&SpendingProfiler, snapshot, config),
                )
            },
        );

        let mut degraded: Vec<DetectorFailure> = [
            basic.1,
            outliers.1,
            velocity.1,
            card_testing.1,
            early_morning.1,
            hourly.1,
            spending.1,
        ]
        .into_iter()
        .flatten()
        .collect();

        let small = pattern_detector::small_transactions(snapshot, &config.small_transactions);
        let vulnerable_merchants =
            match merchant_ranker::rank_merchants(snapshot, &small, config) {
                Ok(ranked) => ranked,
                Err(e) => {
                    log::warn!("{} degraded: {e}", merchant_ranker::RANKER_NAME);
                    degraded.push(DetectorFailure {
                        detector: merchant_ranker::RANKER_NAME,
                        reason:   e.to_string(),
                    });
                    Vec::new()
                }
            };

        let basic_statistics: BasicStatistics = basic.0;
        let summary = summary::build_summary(
            &SummaryInputs {
                basic_statistics:     &basic_statistics,
                outliers:             &outliers.0,
                card_testing:         &card_testing.0,
                early_morning:        &early_morning.0,
                vulnerable_merchants: &vulnerable_merchants,
            },
            config,
        );

        log::info!(
            "analysed {} transactions in {:?}: {} outliers, {} rapid, {} cards with small transactions, {} degraded",
            snapshot.len(),
            started.elapsed(),
            summary.fraud_indicators.outlier_transactions,
            velocity.0.rapid.len(),
            summary.fraud_indicators.cards_with_small_transactions,
            degraded.len()
        );

        AnalysisOutcome {
            summary,
            outliers: outliers.0,
            rapid_transactions: velocity.0,
            small_transactions: card_testing.0,
            early_morning: early_morning.0,
            vulnerable_merchants,
            hourly_patterns: hourly.0,
            spending_patterns: spending.0,
            malformed_records: snapshot.malformed().len(),
            degraded,
        }
    }
}

/// Run one detector, turning a failure into its empty table.
fn run_isolated<D: Detector>(
    detector: &D,
    snapshot: &Snapshot,
    config: &AnalysisConfig,
) -> (D::Output, Option<DetectorFailure>) {
    let started = Instant::now();
    match detector.run(snapshot, config) {
        Ok(output) => {
            log::debug!("{} finished in {:?}", detector.name(), started.elapsed());
            (output, None)
        }
        Err(e) => {
            log::warn!("{} degraded: {e}", detector.name());
            (
                D::Output::default(),
                Some(DetectorFailure {
                    detector: detector.name(),
                    reason:   e.to_string(),
                }),
            )
        }
    }
}
