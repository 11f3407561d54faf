//! Dashboard report — aggregate statistics over the three stores.

use chrono::Utc;
use phishlens_core::types::ThreatRecord;
use phishlens_intel::{DailyActivity, IndicatorStore, ScanLog, ThreatLog, ThreatStats};

/// Window for the activity chart.
const ACTIVITY_DAYS: u32 = 7;
/// How many recent threats the dashboard shows.
const RECENT_THREATS: usize = 5;

#[derive(Debug, Clone, serde::Serialize)]
pub struct DashboardReport {
    pub generated_at: i64,
    pub uptime_secs: i64,
    pub total_scans: usize,
    pub threats_detected: u64,
    pub active_indicators: usize,
    pub threat_stats: ThreatStats,
    pub recent_threats: Vec<ThreatRecord>,
    pub activity: Vec<DailyActivity>,
}

impl DashboardReport {
    pub fn build(
        intel: &IndicatorStore,
        scans: &ScanLog,
        threats: &ThreatLog,
        start_time: i64,
    ) -> Self {
        let stats = threats.stats();
        Self {
            generated_at: Utc::now().timestamp(),
            uptime_secs: Utc::now().timestamp() - start_time,
            total_scans: scans.len(),
            threats_detected: stats.total,
            active_indicators: intel.active_count(),
            recent_threats: threats.recent(RECENT_THREATS),
            activity: scans.daily_activity(ACTIVITY_DAYS),
            threat_stats: stats,
        }
    }
}
