//! URL Scanner — heuristic phishing URL scoring
//!
//! Rules (independent, contributions summed):
//! - IP-address host (+30)
//! - long digit/hyphen runs in the host (+20)
//! - unusually long URL (+15)
//! - suspicious keywords in the path (+10 each)
//! - threat-intel substring match against the host (+50)
//!
//! A URL that fails to parse short-circuits to score 100. The verdict
//! threshold and risk tiers live in `phishlens-core`.

use crate::types::ScanAssessment;
use phishlens_core::types::IndicatorType;
use phishlens_intel::IndicatorStore;
use regex::Regex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;
use url::{Host, Url};

/// Keywords that are suspicious when they appear in a URL path.
const SUSPICIOUS_PATH_KEYWORDS: &[&str] = &[
    "login", "password", "bank", "paypal", "verify", "account", "security",
    "update", "urgent", "important", "immediate", "suspended", "locked",
];

/// URLs longer than this are flagged as unusually long.
const MAX_NORMAL_URL_LEN: usize = 75;

const IP_HOST_WEIGHT: u32 = 30;
const DIGIT_RUN_WEIGHT: u32 = 20;
const LONG_URL_WEIGHT: u32 = 15;
const PATH_KEYWORD_WEIGHT: u32 = 10;
const INTEL_MATCH_WEIGHT: u32 = 50;

pub struct UrlScanner {
    /// Runs of 5+ digits/hyphens in the host.
    digit_run_re: Regex,
    total_scanned: AtomicU64,
    threats_found: AtomicU64,
}

impl UrlScanner {
    pub fn new() -> Self {
        Self {
            digit_run_re: Regex::new(r"[-\d]{5,}").expect("static regex"),
            total_scanned: AtomicU64::new(0),
            threats_found: AtomicU64::new(0),
        }
    }

    /// Score a URL. Reads the indicator store, writes nothing; logging the
    /// scan and recording a detection are the caller's job.
    pub fn evaluate(&self, raw_url: &str, intel: &IndicatorStore) -> ScanAssessment {
        self.total_scanned.fetch_add(1, Ordering::Relaxed);

        let parsed = match Url::parse(raw_url) {
            Ok(parsed) => parsed,
            Err(e) => {
                // Unparseable input is treated as maximally suspicious
                // rather than surfaced as an error to the caller.
                let assessment =
                    ScanAssessment::from_raw(100, vec![format!("Error analyzing URL: {}", e)]);
                self.threats_found.fetch_add(1, Ordering::Relaxed);
                return assessment;
            }
        };

        let host = parsed.host_str().unwrap_or_default().to_lowercase();
        let mut score: u32 = 0;
        let mut alerts: Vec<String> = Vec::new();

        if matches!(parsed.host(), Some(Host::Ipv4(_))) {
            score += IP_HOST_WEIGHT;
            alerts.push("URL uses IP address instead of domain name".into());
        }

        if self.digit_run_re.is_match(&host) {
            score += DIGIT_RUN_WEIGHT;
            alerts.push("Domain contains suspicious character patterns".into());
        }

        if raw_url.len() > MAX_NORMAL_URL_LEN {
            score += LONG_URL_WEIGHT;
            alerts.push("URL is unusually long".into());
        }

        let path = parsed.path().to_lowercase();
        for keyword in SUSPICIOUS_PATH_KEYWORDS {
            if path.contains(keyword) {
                score += PATH_KEYWORD_WEIGHT;
                alerts.push(format!("URL contains suspicious keyword: {}", keyword));
            }
        }

        if intel.find_active_within(IndicatorType::Url, &host).is_some() {
            score += INTEL_MATCH_WEIGHT;
            alerts.push("URL matches known threat intelligence".into());
        }

        let assessment = ScanAssessment::from_raw(score, alerts);
        if assessment.verdict {
            self.threats_found.fetch_add(1, Ordering::Relaxed);
            debug!(url = %raw_url, score = assessment.score, "Phishing heuristics triggered");
        }
        assessment
    }

    pub fn total_scanned(&self) -> u64 {
        self.total_scanned.load(Ordering::Relaxed)
    }

    pub fn threats_found(&self) -> u64 {
        self.threats_found.load(Ordering::Relaxed)
    }
}

impl Default for UrlScanner {
    fn default() -> Self {
        Self::new()
    }
}
