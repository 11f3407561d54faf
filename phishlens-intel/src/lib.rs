//! # PhishLens Intel — the persistent record stores
//!
//! Three stores back the scanners and the dashboard:
//! - [`IndicatorStore`] — known-bad indicators (the blacklist), unique per
//!   `(type, value)`, deactivated rather than deleted
//! - [`ScanLog`] — append-only history of every scan attempt
//! - [`ThreatLog`] — append-only confirmed detections with an
//!   operator-driven status lifecycle
//!
//! All three implement `Persistable` for snapshot persistence.

pub mod indicator_store;
pub mod scan_log;
pub mod threat_log;

pub use indicator_store::IndicatorStore;
pub use scan_log::{DailyActivity, ScanLog};
pub use threat_log::{ThreatLog, ThreatStats};
