//! Detector trait.
//!
//! RULE: Every analysis step implements Detector.
//! A detector reads the snapshot and the config, never another
//! detector's output, and never mutates anything it is given.
//! Dependent steps (merchant ranking, summary) are plain functions
//! called by the engine once their inputs exist.

use crate::{config::AnalysisConfig, error::AnalysisResult, snapshot::Snapshot};

/// The contract every leaf analysis must fulfill.
pub trait Detector: Sync {
    /// The full table this detector produces.
    /// `Default` is the empty table used when the detector fails.
    type Output: Default + Send;

    /// Unique stable name, used in logs and in the degraded list.
    fn name(&self) -> &'static str;

    /// One pass over the snapshot.
    fn run(&self, snapshot: &Snapshot, config: &AnalysisConfig) -> AnalysisResult<Self::Output>;
}
