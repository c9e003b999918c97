//! Product and manufacturer registries for barcode verification.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrefixRisk {
    Safe,
    Moderate,
    High,
}

/// A registered manufacturer, keyed by 3-digit GS1 prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManufacturerRecord {
    pub prefix: String,
    pub country: String,
    pub risk: PrefixRisk,
}

/// A known product, keyed by exact barcode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    pub barcode: String,
    pub name: String,
    pub brand: String,
    pub verified: bool,
}

#[async_trait]
pub trait ManufacturerRegistry: Send + Sync {
    async fn lookup_prefix(&self, prefix: &str) -> Result<Option<ManufacturerRecord>, StoreError>;
}

#[async_trait]
pub trait ProductRegistry: Send + Sync {
    async fn lookup(&self, barcode: &str) -> Result<Option<ProductRecord>, StoreError>;
}

#[derive(Default)]
pub struct MemoryManufacturerRegistry {
    records: RwLock<HashMap<String, ManufacturerRecord>>,
}

impl MemoryManufacturerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn upsert(&self, record: ManufacturerRecord) {
        let mut records = self.records.write().await;
        records.insert(record.prefix.clone(), record);
    }
}

#[async_trait]
impl ManufacturerRegistry for MemoryManufacturerRegistry {
    async fn lookup_prefix(&self, prefix: &str) -> Result<Option<ManufacturerRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.get(prefix).cloned())
    }
}

#[derive(Default)]
pub struct MemoryProductRegistry {
    records: RwLock<HashMap<String, ProductRecord>>,
}

impl MemoryProductRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn upsert(&self, record: ProductRecord) {
        let mut records = self.records.write().await;
        records.insert(record.barcode.clone(), record);
    }
}

#[async_trait]
impl ProductRegistry for MemoryProductRegistry {
    async fn lookup(&self, barcode: &str) -> Result<Option<ProductRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.get(barcode).cloned())
    }
}
