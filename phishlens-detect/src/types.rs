//! Shared output type for the scoring engines.

use phishlens_core::types::RiskLevel;
use phishlens_core::VERDICT_THRESHOLD;

/// Outcome of one heuristic evaluation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ScanAssessment {
    /// True when the accumulated score crossed the verdict threshold.
    pub verdict: bool,
    /// Summed rule contributions, clamped to 100.
    pub score: u8,
    /// One human-readable string per fired rule match.
    pub alerts: Vec<String>,
    pub risk_level: RiskLevel,
}

impl ScanAssessment {
    /// Build from raw summed contributions, clamping and discretizing.
    pub fn from_raw(raw_score: u32, alerts: Vec<String>) -> Self {
        let score = raw_score.min(100) as u8;
        Self {
            verdict: score >= VERDICT_THRESHOLD,
            score,
            alerts,
            risk_level: RiskLevel::from_score(score),
        }
    }
}
