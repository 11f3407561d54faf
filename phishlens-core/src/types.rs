//! Shared record types for the PhishLens stores and scanners.

use serde::{Deserialize, Serialize};

/// Severity assigned to indicators and threat records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Severity derived for automatic detections: High at confidence 70+,
    /// Medium below.
    pub fn from_confidence(confidence: u8) -> Self {
        if confidence >= crate::HIGH_SEVERITY_CONFIDENCE {
            Severity::High
        } else {
            Severity::Medium
        }
    }
}

/// Three-tier discretization of a scan score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        if score >= crate::HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else if score >= crate::VERDICT_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Kind of value a threat-intel indicator describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndicatorType {
    Url,
    Ip,
    Domain,
    Hash,
}

/// A known-bad value with its lifecycle flags. `(indicator_type, value)`
/// is unique per store; entries are deactivated, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Indicator {
    pub id: u64,
    pub indicator_type: IndicatorType,
    pub value: String,
    pub threat_type: String,
    pub severity: Severity,
    pub description: String,
    pub source: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Fields the caller supplies when blacklisting a value.
#[derive(Debug, Clone)]
pub struct NewIndicator {
    pub indicator_type: IndicatorType,
    pub value: String,
    pub threat_type: String,
    pub severity: Severity,
    pub description: String,
    pub source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScanType {
    File,
    Url,
    Email,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScanOutcome {
    Clean,
    Threat,
}

/// One scan attempt, written regardless of verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRecord {
    pub id: u64,
    pub scan_type: ScanType,
    pub target: String,
    pub outcome: ScanOutcome,
    pub timestamp: i64,
    pub duration_ms: Option<u64>,
    pub actor: Option<String>,
}

/// Operator-driven lifecycle of a confirmed detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatStatus {
    Detected,
    Analyzing,
    Contained,
    Resolved,
}

/// A confirmed detection. Created with `status = Detected`; transitions
/// come from an operator, never from the scanners.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatRecord {
    pub id: u64,
    pub threat_type: String,
    pub severity: Severity,
    pub status: ThreatStatus,
    pub source_ip: Option<String>,
    pub target_ip: Option<String>,
    pub url: Option<String>,
    pub file_hash: Option<String>,
    pub description: String,
    pub detection_method: String,
    pub confidence_score: u8,
    pub timestamp: i64,
    pub reported_by: Option<String>,
}

/// Fields the caller supplies when recording a detection.
#[derive(Debug, Clone, Default)]
pub struct NewThreat {
    pub threat_type: String,
    pub severity: Severity,
    pub source_ip: Option<String>,
    pub target_ip: Option<String>,
    pub url: Option<String>,
    pub file_hash: Option<String>,
    pub description: String,
    pub detection_method: String,
    pub confidence_score: u8,
    pub reported_by: Option<String>,
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_thresholds() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(29), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(30), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(49), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(50), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::High);
    }

    #[test]
    fn severity_from_confidence() {
        assert_eq!(Severity::from_confidence(69), Severity::Medium);
        assert_eq!(Severity::from_confidence(70), Severity::High);
        assert_eq!(Severity::from_confidence(100), Severity::High);
    }
}
