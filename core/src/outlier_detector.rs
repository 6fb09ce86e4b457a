//! Outlier detector: IQR fences first, Z-score fences second.
//!
//! Bounds are recomputed from the snapshot on every run:
//!   1. mean and sample standard deviation of all amounts
//!   2. q1 / q3 by linear-interpolation quantiles
//!   3. IQR fences  q1 - k*IQR, q3 + k*IQR       (k = iqr_multiplier)
//!   4. Z fences    mean - m*sd, mean + m*sd      (m = zscore_multiplier)
//!
//! Every transaction lands in exactly one category. IQR wins when
//! both fences are crossed. With sd == 0 the z-score is undefined
//! and nothing can be a Z-score outlier.

use crate::{
    config::AnalysisConfig,
    detector::Detector,
    error::AnalysisResult,
    ledger::Transaction,
    snapshot::Snapshot,
    stats,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutlierCategory {
    Normal,
    #[serde(rename = "IQR_Outlier")]
    IqrOutlier,
    #[serde(rename = "ZScore_Outlier")]
    ZScoreOutlier,
}

impl OutlierCategory {
    pub fn is_outlier(&self) -> bool {
        !matches!(self, OutlierCategory::Normal)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlierBounds {
    pub mean:         f64,
    pub stddev:       f64,
    pub q1:           f64,
    pub q3:           f64,
    pub iqr_lower:    f64,
    pub iqr_upper:    f64,
    pub zscore_lower: f64,
    pub zscore_upper: f64,
}

impl OutlierBounds {
    pub fn compute(amounts: &[f64], iqr_multiplier: f64, zscore_multiplier: f64) -> Self {
        let mean = stats::mean(amounts);
        let stddev = stats::sample_stddev(amounts);

        let mut sorted = amounts.to_vec();
        sorted.sort_by(f64::total_cmp);
        let q1 = stats::quantile_sorted(&sorted, 0.25);
        let q3 = stats::quantile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;

        Self {
            mean,
            stddev,
            q1,
            q3,
            iqr_lower:    q1 - iqr_multiplier * iqr,
            iqr_upper:    q3 + iqr_multiplier * iqr,
            zscore_lower: mean - zscore_multiplier * stddev,
            zscore_upper: mean + zscore_multiplier * stddev,
        }
    }

    /// |amount - mean| / sd, undefined when sd is zero.
    pub fn z_score(&self, amount: f64) -> Option<f64> {
        (self.stddev > 0.0).then(|| (amount - self.mean).abs() / self.stddev)
    }

    pub fn classify(&self, amount: f64) -> OutlierCategory {
        if amount < self.iqr_lower || amount > self.iqr_upper {
            OutlierCategory::IqrOutlier
        } else if self.stddev > 0.0 && (amount < self.zscore_lower || amount > self.zscore_upper) {
            OutlierCategory::ZScoreOutlier
        } else {
            OutlierCategory::Normal
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub outlier_type: OutlierCategory,
    pub z_score:      Option<f64>,
    pub hour_of_transaction: u32,
    pub day_of_week:  u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlierReport {
    /// `None` for an empty snapshot.
    pub bounds: Option<OutlierBounds>,
    /// Every transaction, by descending z-score. Undefined z sorts
    /// last; ties keep snapshot order.
    pub classified: Vec<ClassifiedTransaction>,
}

impl OutlierReport {
    /// Non-Normal rows, in table order.
    pub fn outliers(&self) -> impl Iterator<Item = &ClassifiedTransaction> {
        self.classified.iter().filter(|c| c.outlier_type.is_outlier())
    }

    pub fn count(&self, category: OutlierCategory) -> usize {
        self.classified.iter().filter(|c| c.outlier_type == category).count()
    }

    /// Outliers whose z-score is strictly above `threshold`.
    pub fn extreme_count(&self, threshold: f64) -> usize {
        self.outliers()
            .filter(|c| c.z_score.is_some_and(|z| z > threshold))
            .count()
    }
}

pub struct OutlierDetector;

impl Detector for OutlierDetector {
    type Output = OutlierReport;

    fn name(&self) -> &'static str {
        "outlier_detector"
    }

    fn run(&self, snapshot: &Snapshot, config: &AnalysisConfig) -> AnalysisResult<OutlierReport> {
        config.outlier.validate()?;

        let txns = snapshot.transactions();
        if txns.is_empty() {
            return Ok(OutlierReport::default());
        }

        let amounts: Vec<f64> = txns.iter().map(|t| t.amount).collect();
        let bounds = OutlierBounds::compute(
            &amounts,
            config.outlier.iqr_multiplier,
            config.outlier.zscore_multiplier,
        );
        log::debug!(
            "outlier bounds: mean={:.2} sd={:.2} iqr=[{:.2}, {:.2}] z=[{:.2}, {:.2}]",
            bounds.mean,
            bounds.stddev,
            bounds.iqr_lower,
            bounds.iqr_upper,
            bounds.zscore_lower,
            bounds.zscore_upper
        );

        let mut classified: Vec<ClassifiedTransaction> = txns
            .iter()
            .map(|t| ClassifiedTransaction {
                transaction:         t.clone(),
                outlier_type:        bounds.classify(t.amount),
                z_score:             bounds.z_score(t.amount),
                hour_of_transaction: t.hour(),
                day_of_week:         t.day_of_week(),
            })
            .collect();

        // Stable: equal z keeps snapshot order.
        classified.sort_by(|a, b| by_z_descending(a.z_score, b.z_score));

        Ok(OutlierReport {
            bounds: Some(bounds),
            classified,
        })
    }
}

fn by_z_descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
