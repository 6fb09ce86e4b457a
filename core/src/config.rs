use crate::error::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EarlyMorningConfig {
    /// First hour of the window, inclusive.
    pub start_hour: u32,
    /// Last hour of the window, inclusive.
    pub end_hour: u32,
    /// Amount above which an early-morning transaction counts as high value.
    pub high_value_threshold: f64,
}

impl Default for EarlyMorningConfig {
    fn default() -> Self {
        Self {
            start_hour:           7,
            end_hour:             9,
            high_value_threshold: 100.0,
        }
    }
}

impl EarlyMorningConfig {
    pub fn validate(&self) -> AnalysisResult<()> {
        if self.start_hour > 23 || self.end_hour > 23 {
            return Err(invalid(format!(
                "early_morning hours must be 0..=23, got {}..={}",
                self.start_hour, self.end_hour
            )));
        }
        if self.start_hour > self.end_hour {
            return Err(invalid(format!(
                "early_morning.start_hour {} is after end_hour {}",
                self.start_hour, self.end_hour
            )));
        }
        positive("early_morning.high_value_threshold", self.high_value_threshold)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmallTransactionConfig {
    /// Strict upper bound for a "small" (card-testing) amount.
    pub amount_threshold: f64,
    /// Small-transaction count at which a card is high risk.
    pub high_risk_count: usize,
}

impl Default for SmallTransactionConfig {
    fn default() -> Self {
        Self {
            amount_threshold: 2.00,
            high_risk_count:  10,
        }
    }
}

impl SmallTransactionConfig {
    pub fn validate(&self) -> AnalysisResult<()> {
        positive("small_transactions.amount_threshold", self.amount_threshold)?;
        if self.high_risk_count == 0 {
            return Err(invalid("small_transactions.high_risk_count must be >= 1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VelocityConfig {
    /// Gap in minutes at or below which two same-card transactions are rapid.
    pub window_minutes: f64,
    /// Accepted and reported, but not applied to filtering.
    pub min_transaction_count: usize,
}

impl Default for VelocityConfig {
    fn default() -> Self {
        Self {
            window_minutes:        5.0,
            min_transaction_count: 3,
        }
    }
}

impl VelocityConfig {
    pub fn validate(&self) -> AnalysisResult<()> {
        if !self.window_minutes.is_finite() || self.window_minutes < 0.0 {
            return Err(invalid(format!(
                "velocity.window_minutes must be a non-negative number, got {}",
                self.window_minutes
            )));
        }
        if self.min_transaction_count == 0 {
            return Err(invalid("velocity.min_transaction_count must be >= 1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlierConfig {
    pub iqr_multiplier:    f64,
    pub zscore_multiplier: f64,
    /// Z-score above which an outlier is "extreme".
    pub extreme_zscore:    f64,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            iqr_multiplier:    1.5,
            zscore_multiplier: 3.0,
            extreme_zscore:    5.0,
        }
    }
}

impl OutlierConfig {
    pub fn validate(&self) -> AnalysisResult<()> {
        positive("outlier.iqr_multiplier", self.iqr_multiplier)?;
        positive("outlier.zscore_multiplier", self.zscore_multiplier)?;
        positive("outlier.extreme_zscore", self.extreme_zscore)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopNConfig {
    pub early_morning:        usize,
    pub vulnerable_merchants: usize,
}

impl Default for TopNConfig {
    fn default() -> Self {
        Self {
            early_morning:        100,
            vulnerable_merchants: 5,
        }
    }
}

/// Every tunable threshold of the analysis, in one place.
/// Each section can be overridden independently; unnamed fields keep
/// their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub early_morning:      EarlyMorningConfig,
    pub small_transactions: SmallTransactionConfig,
    pub velocity:           VelocityConfig,
    pub outlier:            OutlierConfig,
    pub top_n:              TopNConfig,
}

impl AnalysisConfig {
    /// Load overrides from a JSON file.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config = Self::from_json_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> AnalysisResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check every section. Detectors re-check only their own section.
    pub fn validate(&self) -> AnalysisResult<()> {
        self.early_morning.validate()?;
        self.small_transactions.validate()?;
        self.velocity.validate()?;
        self.outlier.validate()?;
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> AnalysisResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be a positive number, got {value}")))
    }
}

fn invalid(message: String) -> AnalysisError {
    AnalysisError::InvalidConfig(message)
}
