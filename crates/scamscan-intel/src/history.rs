//! Scan history store, keyed by payload fingerprint.
//!
//! The Behavior layer reads frequency/recency signals from here. The
//! engine never writes; `record` exists for the caller to update after
//! persisting a scan.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::StoreError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanHistory {
    pub scan_count: u32,
    /// How many past scans of this fingerprint ended in DANGER
    pub danger_count: u32,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn lookup(&self, fingerprint: &str) -> Result<Option<ScanHistory>, StoreError>;

    /// Caller-side update after a completed scan.
    async fn record(&self, fingerprint: &str, dangerous: bool) -> Result<(), StoreError>;
}

#[derive(Default)]
pub struct MemoryHistoryStore {
    entries: RwLock<HashMap<String, ScanHistory>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn lookup(&self, fingerprint: &str) -> Result<Option<ScanHistory>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries.get(fingerprint).cloned())
    }

    async fn record(&self, fingerprint: &str, dangerous: bool) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        let now = Utc::now();
        let entry = entries.entry(fingerprint.to_string()).or_insert(ScanHistory {
            scan_count: 0,
            danger_count: 0,
            first_seen: now,
            last_seen: now,
        });
        entry.scan_count += 1;
        if dangerous {
            entry.danger_count += 1;
        }
        entry.last_seen = now;
        Ok(())
    }
}
