//! Threat Log — append-only record of confirmed detections
//!
//! A record is created only when a scan verdict is positive, always with
//! `status = Detected`. Status transitions (analyzing, contained, resolved)
//! come from an operator; the scanners never change them.

use chrono::Utc;
use parking_lot::RwLock;
use phishlens_core::error::{LensError, LensResult};
use phishlens_core::persistence::Persistable;
use phishlens_core::types::{NewThreat, Severity, ThreatRecord, ThreatStatus};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, warn};

/// Dashboard breakdown of the threat log.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ThreatStats {
    pub total: u64,
    pub critical: u64,
    pub high: u64,
    pub medium: u64,
    pub low: u64,
    pub detected: u64,
    pub analyzing: u64,
    pub contained: u64,
    pub resolved: u64,
    pub unresolved: u64,
    pub phishing: u64,
    pub malware: u64,
    pub spam: u64,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct LogState {
    next_id: u64,
    records: Vec<ThreatRecord>,
}

pub struct ThreatLog {
    records: RwLock<Vec<ThreatRecord>>,
    next_id: AtomicU64,
}

impl ThreatLog {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Record a confirmed detection. Status starts at `Detected` and the
    /// timestamp is now; everything else comes from the caller.
    pub fn record_detection(&self, new: NewThreat) -> ThreatRecord {
        let record = ThreatRecord {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            threat_type: new.threat_type,
            severity: new.severity,
            status: ThreatStatus::Detected,
            source_ip: new.source_ip,
            target_ip: new.target_ip,
            url: new.url,
            file_hash: new.file_hash,
            description: new.description,
            detection_method: new.detection_method,
            confidence_score: new.confidence_score,
            timestamp: Utc::now().timestamp(),
            reported_by: new.reported_by,
        };
        warn!(
            id = record.id,
            threat_type = %record.threat_type,
            severity = ?record.severity,
            confidence = record.confidence_score,
            "Threat recorded"
        );
        self.records.write().push(record.clone());
        record
    }

    /// Operator-driven status transition.
    pub fn set_status(&self, id: u64, status: ThreatStatus) -> LensResult<()> {
        let mut records = self.records.write();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(LensError::UnknownThreat(id))?;
        info!(id, from = ?record.status, to = ?status, "Threat status updated");
        record.status = status;
        Ok(())
    }

    pub fn get(&self, id: u64) -> Option<ThreatRecord> {
        self.records.read().iter().find(|r| r.id == id).cloned()
    }

    /// Most recent detections first.
    pub fn recent(&self, limit: usize) -> Vec<ThreatRecord> {
        let records = self.records.read();
        records.iter().rev().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn stats(&self) -> ThreatStats {
        let records = self.records.read();
        let mut stats = ThreatStats::default();
        for record in records.iter() {
            stats.total += 1;
            match record.severity {
                Severity::Critical => stats.critical += 1,
                Severity::High => stats.high += 1,
                Severity::Medium => stats.medium += 1,
                Severity::Low => stats.low += 1,
            }
            match record.status {
                ThreatStatus::Detected => stats.detected += 1,
                ThreatStatus::Analyzing => stats.analyzing += 1,
                ThreatStatus::Contained => stats.contained += 1,
                ThreatStatus::Resolved => stats.resolved += 1,
            }
            match record.threat_type.as_str() {
                "phishing" => stats.phishing += 1,
                "malware" => stats.malware += 1,
                "spam" => stats.spam += 1,
                _ => {}
            }
        }
        stats.unresolved = stats.total - stats.resolved;
        stats
    }
}

impl Default for ThreatLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Persistable for ThreatLog {
    fn persist_name(&self) -> &str {
        "threat_log"
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
