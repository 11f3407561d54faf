//! Indicator Store — known-bad URLs, IPs, domains and hashes
//!
//! Backs both blacklist checks the scan pipeline performs:
//! - exact match against a submitted value (orchestration short-circuit)
//! - substring match of an indicator value inside a URL host (engine rule)
//!
//! The `(indicator_type, value)` pair is unique, case-insensitive on the
//! value. A duplicate insert surfaces as `LensError::DuplicateIndicator`
//! so concurrent auto-blacklist races resolve to "already recorded".

use chrono::Utc;
use parking_lot::RwLock;
use phishlens_core::error::{LensError, LensResult};
use phishlens_core::persistence::Persistable;
use phishlens_core::types::{Indicator, IndicatorType, NewIndicator};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

#[derive(serde::Serialize, serde::Deserialize)]
struct StoreState {
    next_id: u64,
    indicators: Vec<Indicator>,
}

pub struct IndicatorStore {
    indicators: RwLock<Vec<Indicator>>,
    next_id: AtomicU64,
    total_lookups: AtomicU64,
    total_hits: AtomicU64,
}

impl IndicatorStore {
    pub fn new() -> Self {
        Self {
            indicators: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            total_lookups: AtomicU64::new(0),
            total_hits: AtomicU64::new(0),
        }
    }

    /// Insert a new indicator. Fails with `DuplicateIndicator` when the
    /// `(type, value)` pair already exists, active or not.
    pub fn insert(&self, new: NewIndicator) -> LensResult<u64> {
        let mut indicators = self.indicators.write();
        if indicators
            .iter()
            .any(|i| i.indicator_type == new.indicator_type && i.value.eq_ignore_ascii_case(&new.value))
        {
            return Err(LensError::DuplicateIndicator {
                indicator_type: new.indicator_type,
                value: new.value,
            });
        }

        let now = Utc::now().timestamp();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        info!(id, indicator_type = ?new.indicator_type, value = %new.value, "Indicator added");
        indicators.push(Indicator {
            id,
            indicator_type: new.indicator_type,
            value: new.value,
            threat_type: new.threat_type,
            severity: new.severity,
            description: new.description,
            source: new.source,
            is_active: true,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    /// Exact-match lookup over active indicators (case-insensitive).
    pub fn find_active_exact(&self, indicator_type: IndicatorType, value: &str) -> Option<Indicator> {
        self.total_lookups.fetch_add(1, Ordering::Relaxed);
        let found = self
            .indicators
            .read()
            .iter()
            .find(|i| {
                i.is_active
                    && i.indicator_type == indicator_type
                    && i.value.eq_ignore_ascii_case(value)
            })
            .cloned();
        if found.is_some() {
            self.total_hits.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    /// Substring lookup: first active indicator whose value is contained
    /// in `haystack` (both lowercased). Used against URL hosts.
    pub fn find_active_within(&self, indicator_type: IndicatorType, haystack: &str) -> Option<Indicator> {
        self.total_lookups.fetch_add(1, Ordering::Relaxed);
        let haystack = haystack.to_lowercase();
        let found = self
            .indicators
            .read()
            .iter()
            .find(|i| {
                i.is_active
                    && i.indicator_type == indicator_type
                    && !i.value.is_empty()
                    && haystack.contains(&i.value.to_lowercase())
            })
            .cloned();
        if let Some(ref hit) = found {
            self.total_hits.fetch_add(1, Ordering::Relaxed);
            debug!(value = %hit.value, "Threat intelligence substring hit");
        }
        found
    }

    /// Deactivate an indicator, keeping the record.
    pub fn deactivate(&self, id: u64) -> LensResult<()> {
        let mut indicators = self.indicators.write();
        let indicator = indicators
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(LensError::UnknownIndicator(id))?;
        indicator.is_active = false;
        indicator.updated_at = Utc::now().timestamp();
        info!(id, value = %indicator.value, "Indicator deactivated");
        Ok(())
    }

    pub fn by_type(&self, indicator_type: IndicatorType) -> Vec<Indicator> {
        self.indicators
            .read()
            .iter()
            .filter(|i| i.indicator_type == indicator_type)
            .cloned()
            .collect()
    }

    /// Most recent indicators first.
    pub fn recent(&self, limit: usize) -> Vec<Indicator> {
        let indicators = self.indicators.read();
        indicators.iter().rev().take(limit).cloned().collect()
    }

    pub fn active_count(&self) -> usize {
        self.indicators.read().iter().filter(|i| i.is_active).count()
    }

    pub fn len(&self) -> usize {
        self.indicators.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.read().is_empty()
    }

    pub fn total_lookups(&self) -> u64 {
        self.total_lookups.load(Ordering::Relaxed)
    }

    pub fn total_hits(&self) -> u64 {
        self.total_hits.load(Ordering::Relaxed)
    }
}

impl Default for IndicatorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Persistable for IndicatorStore {
    fn persist_name(&self) -> &str {
        "indicator_store"
    }

    fn snapshot(&self) -> LensResult<Vec<u8>> {
        let state = StoreState {
            next_id: self.next_id.load(Ordering::Relaxed),
            indicators: self.indicators.read().clone(),
        };
        Ok(serde_json::to_vec(&state)?)
    }

    fn restore(&self, data: &[u8]) -> LensResult<()> {
        let state: StoreState = serde_json::from_slice(data)?;
        self.next_id.store(state.next_id, Ordering::Relaxed);
        *self.indicators.write() = state.indicators;
        Ok(())
    }
}
