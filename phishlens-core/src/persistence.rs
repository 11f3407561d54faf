//! # Persistence Layer — snapshot/restore for the PhishLens stores
//!
//! The stores are in-memory structures; durability comes from JSON snapshots
//! written per component, lz4-compressed on disk. Components implement
//! [`Persistable`] to opt in, and the app snapshots after mutating operations
//! and restores at startup.

use crate::error::{LensError, LensResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Trait for components that can persist their state.
pub trait Persistable: Send + Sync {
    /// Unique identifier, used as the snapshot file stem.
    fn persist_name(&self) -> &str;
    /// Serialize current state to JSON bytes.
    fn snapshot(&self) -> LensResult<Vec<u8>>;
    /// Replace current state from JSON bytes.
    fn restore(&self, data: &[u8]) -> LensResult<()>;
}

/// What is known about one snapshot file on disk.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SnapshotInfo {
    pub component: String,
    pub size_bytes: u64,
    pub modified_at: Option<i64>,
}

/// Handles snapshotting and restoring all registered components.
pub struct PersistenceManager {
    base_dir: PathBuf,
    components: RwLock<HashMap<String, Arc<dyn Persistable>>>,
    total_snapshots: AtomicU64,
    total_restores: AtomicU64,
    compress: bool,
}

impl PersistenceManager {
    pub fn new(base_dir: impl Into<PathBuf>, compress: bool) -> Self {
        Self {
            base_dir: base_dir.into(),
            components: RwLock::new(HashMap::new()),
            total_snapshots: AtomicU64::new(0),
            total_restores: AtomicU64::new(0),
            compress,
        }
    }

    /// Register a component for persistence.
    pub fn register(&self, component: Arc<dyn Persistable>) {
        let name = component.persist_name().to_string();
        info!(component = %name, "Registered for persistence");
        self.components.write().insert(name, component);
    }

    /// Ensure the snapshot directory exists.
    pub fn init(&self) -> LensResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        Ok(())
    }

    /// Snapshot a single component to disk.
    pub fn snapshot_component(&self, name: &str) -> LensResult<()> {
        let component = self
            .components
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| LensError::Snapshot(format!("component '{}' not registered", name)))?;

        let data = component.snapshot()?;
        let payload = if self.compress {
            lz4_flex::compress_prepend_size(&data)
        } else {
            data
        };
        std::fs::write(self.snapshot_path(name), &payload)?;

        self.total_snapshots.fetch_add(1, Ordering::Relaxed);
        info!(component = %name, size = payload.len(), "Snapshot saved");
        Ok(())
    }

    /// Snapshot every registered component, reporting per-component results.
    pub fn snapshot_all(&self) -> Vec<(String, LensResult<()>)> {
        let names: Vec<String> = self.components.read().keys().cloned().collect();
        names
            .into_iter()
            .map(|name| {
                let result = self.snapshot_component(&name);
                if let Err(ref e) = result {
                    warn!(component = %name, error = %e, "Snapshot failed");
                }
                (name, result)
            })
            .collect()
    }

    /// Restore a single component from its snapshot file, if one exists.
    pub fn restore_component(&self, name: &str) -> LensResult<bool> {
        let component = self
            .components
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| LensError::Snapshot(format!("component '{}' not registered", name)))?;

        let path = self.snapshot_path(name);
        if !path.exists() {
            return Ok(false);
        }

        let raw = std::fs::read(&path)?;
        // Snapshots written with compress = false are plain JSON.
        let data = match lz4_flex::decompress_size_prepended(&raw) {
            Ok(decompressed) => decompressed,
            Err(_) => raw,
        };

        component.restore(&data)?;
        self.total_restores.fetch_add(1, Ordering::Relaxed);
        info!(component = %name, "Restored from snapshot");
        Ok(true)
    }

    /// Restore every registered component. Missing snapshots are skipped.
    pub fn restore_all(&self) -> Vec<(String, LensResult<bool>)> {
        let names: Vec<String> = self.components.read().keys().cloned().collect();
        names
            .into_iter()
            .map(|name| {
                let result = self.restore_component(&name);
                if let Err(ref e) = result {
                    warn!(component = %name, error = %e, "Restore failed");
                }
                (name, result)
            })
            .collect()
    }

    /// List snapshot files present in the base directory.
    pub fn list_snapshots(&self) -> Vec<SnapshotInfo> {
        let mut infos = Vec::new();
        if let Ok(entries) = std::fs::read_dir(&self.base_dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().map_or(false, |e| e == "snapshot") {
                    let component = path
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    let meta = entry.metadata().ok();
                    infos.push(SnapshotInfo {
                        component,
                        size_bytes: meta.as_ref().map(|m| m.len()).unwrap_or(0),
                        modified_at: meta
                            .and_then(|m| m.modified().ok())
                            .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                            .map(|d| d.as_secs() as i64),
                    });
                }
            }
        }
        infos.sort_by(|a, b| a.component.cmp(&b.component));
        infos
    }

    pub fn total_snapshots(&self) -> u64 {
        self.total_snapshots.load(Ordering::Relaxed)
    }

    pub fn total_restores(&self) -> u64 {
        self.total_restores.load(Ordering::Relaxed)
    }

    pub fn registered_count(&self) -> usize {
        self.components.read().len()
    }

    fn snapshot_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(format!("{}.snapshot", name))
    }
}

impl std::fmt::Debug for PersistenceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceManager")
            .field("base_dir", &self.base_dir)
            .field("registered", &self.registered_count())
            .field("compress", &self.compress)
            .finish()
    }
}

/// Create a manager rooted at `data_dir` honoring the config flags.
pub fn manager_from_config(config: &crate::config::PersistenceConfig) -> PersistenceManager {
    PersistenceManager::new(Path::new(&config.data_dir), config.compress)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        name: String,
        value: RwLock<u64>,
    }

    impl Persistable for Counter {
        fn persist_name(&self) -> &str {
            &self.name
        }
        fn snapshot(&self) -> LensResult<Vec<u8>> {
            Ok(serde_json::to_vec(&*self.value.read())?)
        }
        fn restore(&self, data: &[u8]) -> LensResult<()> {
            *self.value.write() = serde_json::from_slice(data)?;
            Ok(())
        }
    }

    #[test]
    fn snapshot_and_restore_roundtrip() {
        let dir = std::env::temp_dir().join("phishlens_persist_test");
        let _ = std::fs::remove_dir_all(&dir);

        let mgr = PersistenceManager::new(&dir, true);
        mgr.init().unwrap();

        let comp = Arc::new(Counter {
            name: "counter".into(),
            value: RwLock::new(42),
        });
        mgr.register(comp.clone());

        mgr.snapshot_component("counter").unwrap();
        *comp.value.write() = 0;

        assert!(mgr.restore_component("counter").unwrap());
        assert_eq!(*comp.value.read(), 42);
        assert_eq!(mgr.total_snapshots(), 1);
        assert_eq!(mgr.total_restores(), 1);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_snapshot_is_skipped() {
        let dir = std::env::temp_dir().join("phishlens_persist_missing");
        let _ = std::fs::remove_dir_all(&dir);

        let mgr = PersistenceManager::new(&dir, true);
        mgr.init().unwrap();
        mgr.register(Arc::new(Counter {
            name: "ghost".into(),
            value: RwLock::new(1),
        }));

        assert!(!mgr.restore_component("ghost").unwrap());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn uncompressed_snapshots_restore() {
        let dir = std::env::temp_dir().join("phishlens_persist_plain");
        let _ = std::fs::remove_dir_all(&dir);

        let mgr = PersistenceManager::new(&dir, false);
        mgr.init().unwrap();
        let comp = Arc::new(Counter {
            name: "plain".into(),
            value: RwLock::new(7),
        });
        mgr.register(comp.clone());

        mgr.snapshot_component("plain").unwrap();
        *comp.value.write() = 0;
        assert!(mgr.restore_component("plain").unwrap());
        assert_eq!(*comp.value.read(), 7);

        assert_eq!(mgr.list_snapshots().len(), 1);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
