//! Domain reputation store.
//!
//! Keyed by lowercase domain. Scores run 0-100 where lower is worse;
//! the engine forces DANGER when the score drops below 30. A domain the
//! store has never seen returns `None` so the override can never fire
//! on an unknown domain.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::StoreError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainReputation {
    pub domain: String,
    /// 0-100, lower is worse
    pub score: u32,
    /// e.g. "SAFE", "WARN", "DANGER", "UNKNOWN"
    pub risk_category: String,
    pub scan_count: u32,
    pub scams_detected: u32,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl DomainReputation {
    pub fn new(domain: impl Into<String>, score: u32) -> Self {
        let now = Utc::now();
        let category = match score {
            0..=29 => "DANGER",
            30..=59 => "WARN",
            _ => "SAFE",
        };
        Self {
            domain: domain.into().to_lowercase(),
            score,
            risk_category: category.to_string(),
            scan_count: 1,
            scams_detected: 0,
            first_seen: now,
            last_seen: now,
        }
    }
}

#[async_trait]
pub trait ReputationStore: Send + Sync {
    async fn lookup(&self, domain: &str) -> Result<Option<DomainReputation>, StoreError>;
}

#[derive(Default)]
pub struct MemoryReputationStore {
    records: RwLock<HashMap<String, DomainReputation>>,
}

impl MemoryReputationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn upsert(&self, record: DomainReputation) {
        let mut records = self.records.write().await;
        records.insert(record.domain.clone(), record);
    }
}

#[async_trait]
impl ReputationStore for MemoryReputationStore {
    async fn lookup(&self, domain: &str) -> Result<Option<DomainReputation>, StoreError> {
        let records = self.records.read().await;
        Ok(records.get(&domain.to_lowercase()).cloned())
    }
}
