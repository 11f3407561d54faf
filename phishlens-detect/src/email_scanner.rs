//! Email Scanner — heuristic spam scoring over subject + body
//!
//! Keyword matching runs over the lowercased text; the capitalization
//! ratio is taken over the raw text, since lowercasing first would make
//! the rule unfireable.

use crate::types::ScanAssessment;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Spam indicator phrases, matched as substrings of the lowercased text.
const SPAM_KEYWORDS: &[&str] = &[
    "free", "win", "prize", "lottery", "urgent", "important", "click here",
    "limited time", "offer", "guarantee", "money", "cash", "inheritance",
    "viagra", "casino", "debt", "loan", "credit", "bank account", "password",
];

/// Uppercase fraction above which text counts as shouting (strictly greater).
const CAPS_RATIO_LIMIT: f64 = 0.3;
/// Exclamation marks beyond this count are penalized.
const MAX_NORMAL_EXCLAMATIONS: usize = 3;
/// Subjects longer than this are flagged.
const MAX_NORMAL_SUBJECT_LEN: usize = 100;

const KEYWORD_WEIGHT: u32 = 10;
const CAPS_WEIGHT: u32 = 15;
const EXCLAMATION_WEIGHT: u32 = 10;
const LINK_WEIGHT: u32 = 5;
const LONG_SUBJECT_WEIGHT: u32 = 5;

pub struct EmailScanner {
    total_scanned: AtomicU64,
    spam_found: AtomicU64,
}

impl EmailScanner {
    pub fn new() -> Self {
        Self {
            total_scanned: AtomicU64::new(0),
            spam_found: AtomicU64::new(0),
        }
    }

    /// Score an email. No side effects; logging is the caller's job.
    pub fn evaluate(&self, subject: &str, body: &str) -> ScanAssessment {
        self.total_scanned.fetch_add(1, Ordering::Relaxed);

        let raw = format!("{} {}", subject, body);
        let text = raw.to_lowercase();

        let mut score: u32 = 0;
        let mut alerts: Vec<String> = Vec::new();

        for keyword in SPAM_KEYWORDS {
            if text.contains(keyword) {
                score += KEYWORD_WEIGHT;
                alerts.push(format!("Contains spam keyword: {}", keyword));
            }
        }

        if Self::caps_ratio(&raw) > CAPS_RATIO_LIMIT {
            score += CAPS_WEIGHT;
            alerts.push("Excessive capitalization detected".into());
        }

        if text.matches('!').count() > MAX_NORMAL_EXCLAMATIONS {
            score += EXCLAMATION_WEIGHT;
            alerts.push("Multiple exclamation marks".into());
        }

        if text.contains("http") || text.contains("www.") {
            score += LINK_WEIGHT;
            alerts.push("Contains links".into());
        }

        if subject.len() > MAX_NORMAL_SUBJECT_LEN {
            score += LONG_SUBJECT_WEIGHT;
            alerts.push("Unusually long subject".into());
        }

        let assessment = ScanAssessment::from_raw(score, alerts);
        if assessment.verdict {
            self.spam_found.fetch_add(1, Ordering::Relaxed);
            debug!(score = assessment.score, "Spam heuristics triggered");
        }
        assessment
    }

    /// Uppercase characters over total characters; 0 for empty text.
    fn caps_ratio(text: &str) -> f64 {
        let total = text.chars().count();
        if total == 0 {
            return 0.0;
        }
        let upper = text.chars().filter(|c| c.is_uppercase()).count();
        upper as f64 / total as f64
    }

    pub fn total_scanned(&self) -> u64 {
        self.total_scanned.load(Ordering::Relaxed)
    }

    pub fn spam_found(&self) -> u64 {
        self.spam_found.load(Ordering::Relaxed)
    }
}

impl Default for EmailScanner {
    fn default() -> Self {
        Self::new()
    }
}
