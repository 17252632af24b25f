use std::sync::atomic::{AtomicU64, Ordering};

use blockscope::finding::Finding;
use blockscope::ScanResult;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;

/// A persisted scan: the result plus its identity
#[derive(Debug, Clone, Serialize)]
pub struct StoredScan {
    pub scan_id: u64,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: ScanResult,
}

/// A persisted finding, linked to its scan by id
#[derive(Debug, Clone, Serialize)]
pub struct StoredFinding {
    pub scan_id: u64,
    #[serde(flatten)]
    pub finding: Finding,
}

/// Scan persistence. Ids are assigned by the store and strictly increase.
pub trait ScanStore: Send + Sync {
    fn insert(&self, result: ScanResult) -> StoredScan;

    /// All scans, ascending by id
    fn list(&self) -> Vec<StoredScan>;

    fn get(&self, scan_id: u64) -> Option<StoredScan>;

    /// Findings of one scan, empty when the scan does not exist
    fn findings_for(&self, scan_id: u64) -> Vec<StoredFinding>;
}

/// Process-local store backed by a concurrent map
pub struct InMemoryScanStore {
    scans: DashMap<u64, StoredScan>,
    next_id: AtomicU64,
}

impl InMemoryScanStore {
    pub fn new() -> Self {
        Self {
            scans: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.scans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scans.is_empty()
    }
}

impl Default for InMemoryScanStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanStore for InMemoryScanStore {
    fn insert(&self, result: ScanResult) -> StoredScan {
        let scan_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let stored = StoredScan {
            scan_id,
            created_at: Utc::now(),
            result,
        };
        self.scans.insert(scan_id, stored.clone());
        stored
    }

    fn list(&self) -> Vec<StoredScan> {
        let mut scans: Vec<StoredScan> = self.scans.iter().map(|e| e.value().clone()).collect();
        scans.sort_by_key(|s| s.scan_id);
        scans
    }

    fn get(&self, scan_id: u64) -> Option<StoredScan> {
        self.scans.get(&scan_id).map(|e| e.value().clone())
    }

    fn findings_for(&self, scan_id: u64) -> Vec<StoredFinding> {
        self.scans
            .get(&scan_id)
            .map(|e| {
                e.value()
                    .result
                    .findings()
                    .iter()
                    .map(|f| StoredFinding {
                        scan_id,
                        finding: f.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
