//! Scan Log — append-only history of every scan attempt
//!
//! One record per scan regardless of verdict. Feeds the dashboard's totals
//! and the trailing-window activity chart.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use parking_lot::RwLock;
use phishlens_core::error::LensResult;
use phishlens_core::persistence::Persistable;
use phishlens_core::types::{ScanOutcome, ScanRecord, ScanType};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// One day's worth of scan activity, for the dashboard chart.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub scans: u64,
    pub threats: u64,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct LogState {
    next_id: u64,
    records: Vec<ScanRecord>,
}

pub struct ScanLog {
    records: RwLock<Vec<ScanRecord>>,
    next_id: AtomicU64,
}

impl ScanLog {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Append one scan record, timestamped now.
    pub fn record(
        &self,
        scan_type: ScanType,
        target: &str,
        outcome: ScanOutcome,
        duration_ms: Option<u64>,
        actor: Option<String>,
    ) -> ScanRecord {
        let record = ScanRecord {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            scan_type,
            target: target.to_string(),
            outcome,
            timestamp: Utc::now().timestamp(),
            duration_ms,
            actor,
        };
        debug!(id = record.id, scan_type = ?scan_type, outcome = ?outcome, "Scan logged");
        self.records.write().push(record.clone());
        record
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn threat_count(&self) -> usize {
        self.records
            .read()
            .iter()
            .filter(|r| r.outcome == ScanOutcome::Threat)
            .count()
    }

    /// Most recent scans first.
    pub fn recent(&self, limit: usize) -> Vec<ScanRecord> {
        let records = self.records.read();
        records.iter().rev().take(limit).cloned().collect()
    }

    /// Per-day scan/threat counts over the trailing `days`, oldest first.
    /// Days with no activity are present with zero counts.
    pub fn daily_activity(&self, days: u32) -> Vec<DailyActivity> {
        let today = Utc::now().date_naive();
        let start = today - Duration::days(days.saturating_sub(1) as i64);

        let mut buckets: Vec<DailyActivity> = (0..days)
            .map(|offset| DailyActivity {
                date: start + Duration::days(offset as i64),
                scans: 0,
                threats: 0,
            })
            .collect();

        for record in self.records.read().iter() {
            let date = match DateTime::from_timestamp(record.timestamp, 0) {
                Some(ts) => ts.date_naive(),
                None => continue,
            };
            if date < start || date > today {
                continue;
            }
            let idx = (date - start).num_days() as usize;
            if let Some(bucket) = buckets.get_mut(idx) {
                bucket.scans += 1;
                if record.outcome == ScanOutcome::Threat {
                    bucket.threats += 1;
                }
            }
        }
        buckets
    }
}

impl Default for ScanLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Persistable for ScanLog {
    fn persist_name(&self) -> &str {
        "scan_log"
    }

    fn snapshot(&self) -> LensResult<Vec<u8>> {
        let state = LogState {
            next_id: self.next_id.load(Ordering::Relaxed),
            records: self.records.read().clone(),
        };
        Ok(serde_json::to_vec(&state)?)
    }

    fn restore(&self, data: &[u8]) -> LensResult<()> {
        let state: LogState = serde_json::from_slice(data)?;
        self.next_id.store(state.next_id, Ordering::Relaxed);
        *self.records.write() = state.records;
        Ok(())
    }
}
