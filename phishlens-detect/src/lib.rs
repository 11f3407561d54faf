//! # PhishLens Detect — the heuristic scoring engines
//!
//! Two evaluators, each a sequence of independent weighted rules summed
//! into a 0–100 score:
//! - [`UrlScanner`] — URL structure heuristics plus a threat-intel
//!   substring lookup
//! - [`EmailScanner`] — spam heuristics over subject + body text
//!
//! The engines hold no per-call state beyond fixed keyword tables and hit
//! counters; the indicator store is passed in explicitly.

pub mod email_scanner;
pub mod types;
pub mod url_scanner;

pub use email_scanner::EmailScanner;
pub use types::ScanAssessment;
pub use url_scanner::UrlScanner;
