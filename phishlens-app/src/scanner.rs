//! Scan orchestration — blacklist policy around the scoring engines
//!
//! The engines are pure; this service owns the side effects:
//! - exact blacklist short-circuit before the URL engine runs
//! - a scan-log entry for every attempt, verdict or not
//! - on a positive URL verdict, auto-blacklisting plus a threat record
//! - on a positive email verdict, a threat record only

use phishlens_core::types::{
    IndicatorType, NewIndicator, NewThreat, RiskLevel, ScanOutcome, ScanType, Severity,
};
use phishlens_detect::{EmailScanner, ScanAssessment, UrlScanner};
use phishlens_intel::{IndicatorStore, ScanLog, ThreatLog};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

const URL_SCANNER_METHOD: &str = "URL Scanner";
const EMAIL_SCANNER_METHOD: &str = "Email Scanner";

/// Result of one orchestrated scan, as returned to the caller/API.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ScanReport {
    /// True when the exact blacklist check blocked the URL outright.
    pub blocked: bool,
    pub verdict: bool,
    pub score: u8,
    pub alerts: Vec<String>,
    pub risk_level: RiskLevel,
}

impl ScanReport {
    fn blocked() -> Self {
        Self {
            blocked: true,
            verdict: true,
            score: 100,
            alerts: vec!["URL is blacklisted and blocked".into()],
            risk_level: RiskLevel::High,
        }
    }

    fn from_assessment(assessment: ScanAssessment) -> Self {
        Self {
            blocked: false,
            verdict: assessment.verdict,
            score: assessment.score,
            alerts: assessment.alerts,
            risk_level: assessment.risk_level,
        }
    }
}

/// Wires the engines to the stores. Shared behind an `Arc` by the CLI and
/// the API handlers.
pub struct ScanService {
    pub intel: Arc<IndicatorStore>,
    pub scans: Arc<ScanLog>,
    pub threats: Arc<ThreatLog>,
    url_scanner: UrlScanner,
    email_scanner: EmailScanner,
}

impl ScanService {
    pub fn new(intel: Arc<IndicatorStore>, scans: Arc<ScanLog>, threats: Arc<ThreatLog>) -> Self {
        Self {
            intel,
            scans,
            threats,
            url_scanner: UrlScanner::new(),
            email_scanner: EmailScanner::new(),
        }
    }

    /// Scan a URL: exact blacklist check, then the heuristic engine, then
    /// the scan/threat logs and auto-blacklisting.
    pub fn scan_url(&self, url: &str, actor: Option<&str>, source_ip: Option<&str>) -> ScanReport {
        let started = Instant::now();

        // Exact match is a distinct check from the engine's substring
        // intel rule: a URL we already blacklisted is blocked without
        // re-scoring it.
        if self.intel.find_active_exact(IndicatorType::Url, url).is_some() {
            warn!(url = %url, "URL is blacklisted and blocked");
            let report = ScanReport::blocked();
            self.log_scan(ScanType::Url, url, &report, started, actor);
            return report;
        }

        let report = ScanReport::from_assessment(self.url_scanner.evaluate(url, &self.intel));
        self.log_scan(ScanType::Url, url, &report, started, actor);

        if report.verdict {
            let severity = Severity::from_confidence(report.score);
            let description = format!("Phishing URL detected: {}", report.alerts.join(", "));

            match self.intel.insert(NewIndicator {
                indicator_type: IndicatorType::Url,
                value: url.to_string(),
                threat_type: "phishing".into(),
                severity,
                description: description.clone(),
                source: URL_SCANNER_METHOD.into(),
            }) {
                Ok(id) => info!(id, url = %url, "URL added to blacklist"),
                // A concurrent scan of the same URL got there first.
                Err(e) => debug!(url = %url, error = %e, "URL already blacklisted"),
            }

            self.threats.record_detection(NewThreat {
                threat_type: "phishing".into(),
                severity,
                source_ip: source_ip.map(str::to_string),
                url: Some(url.to_string()),
                description,
                detection_method: URL_SCANNER_METHOD.into(),
                confidence_score: report.score,
                reported_by: actor.map(str::to_string),
                ..Default::default()
            });
        }

        report
    }

    /// Scan an email: always evaluate and log; record a threat on a
    /// positive verdict. Spam never feeds the blacklist.
    pub fn scan_email(
        &self,
        subject: &str,
        body: &str,
        actor: Option<&str>,
        source_ip: Option<&str>,
    ) -> ScanReport {
        let started = Instant::now();
        let report = ScanReport::from_assessment(self.email_scanner.evaluate(subject, body));

        let target = format!("Subject: {}", subject);
        self.log_scan(ScanType::Email, &target, &report, started, actor);

        if report.verdict {
            let severity = Severity::from_confidence(report.score);
            self.threats.record_detection(NewThreat {
                threat_type: "spam".into(),
                severity,
                source_ip: source_ip.map(str::to_string),
                description: format!("Spam email detected: {}", report.alerts.join(", ")),
                detection_method: EMAIL_SCANNER_METHOD.into(),
                confidence_score: report.score,
                reported_by: actor.map(str::to_string),
                ..Default::default()
            });
        }

        report
    }

    fn log_scan(
        &self,
        scan_type: ScanType,
        target: &str,
        report: &ScanReport,
        started: Instant,
        actor: Option<&str>,
    ) {
        let outcome = if report.verdict {
            ScanOutcome::Threat
        } else {
            ScanOutcome::Clean
        };
        self.scans.record(
            scan_type,
            target,
            outcome,
            Some(started.elapsed().as_millis() as u64),
            actor.map(str::to_string),
        );
    }
}
