//! Summary report: folds every detector table into one risk record.
//!
//! Pure merge: no detector is re-run here, and the shape is fixed.
//! An empty or degraded input shows up as zeros, never as a missing key.

use crate::{
    aggregator::BasicStatistics,
    config::AnalysisConfig,
    merchant_ranker::MerchantVulnerability,
    outlier_detector::OutlierReport,
    pattern_detector::CardTestingReport,
    temporal_window::EarlyMorningReport,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FraudIndicators {
    pub cards_with_small_transactions:         usize,
    pub total_small_transactions:              usize,
    pub outlier_transactions:                  usize,
    pub suspicious_early_morning_transactions: usize,
    pub vulnerable_merchants:                  usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub high_risk_cards:          usize,
    pub extreme_outliers:         usize,
    pub early_morning_high_value: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FraudSummaryReport {
    pub basic_statistics: BasicStatistics,
    pub fraud_indicators: FraudIndicators,
    pub risk_assessment:  RiskAssessment,
}

/// Borrowed view of every input the summary needs.
pub struct SummaryInputs<'a> {
    pub basic_statistics:     &'a BasicStatistics,
    pub outliers:             &'a OutlierReport,
    pub card_testing:         &'a CardTestingReport,
    pub early_morning:        &'a EarlyMorningReport,
    pub vulnerable_merchants: &'a [MerchantVulnerability],
}

pub fn build_summary(inputs: &SummaryInputs<'_>, config: &AnalysisConfig) -> FraudSummaryReport {
    let fraud_indicators = FraudIndicators {
        cards_with_small_transactions:         inputs.card_testing.profiles.len(),
        total_small_transactions:              inputs.card_testing.total_small_transactions(),
        outlier_transactions:                  inputs.outliers.outliers().count(),
        suspicious_early_morning_transactions: inputs.early_morning.transactions.len(),
        vulnerable_merchants:                  inputs.vulnerable_merchants.len(),
    };

    let risk_assessment = RiskAssessment {
        high_risk_cards: inputs
            .card_testing
            .profiles
            .iter()
            .filter(|p| p.small_transaction_count >= config.small_transactions.high_risk_count)
            .count(),
        extreme_outliers:         inputs.outliers.extreme_count(config.outlier.extreme_zscore),
        early_morning_high_value: inputs.early_morning.high_value_count(),
    };

    FraudSummaryReport {
        basic_statistics: inputs.basic_statistics.clone(),
        fraud_indicators,
        risk_assessment,
    }
}
