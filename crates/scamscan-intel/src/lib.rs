//! Store contracts for the data sources the analyzer layers read.
//!
//! The engine treats all of these as read-mostly, externally-synchronized
//! resources: layers look data up, the caller writes (scan history,
//! reputation feedback) after an analysis completes. Each trait ships
//! with an in-memory reference implementation used by tests and the CLI;
//! production deployments swap in database-backed ones.

pub mod blacklist;
pub mod history;
pub mod registry;
pub mod reputation;

pub use blacklist::{BlacklistEntry, BlacklistSeverity, BlacklistStore, MemoryBlacklist, PatternType};
pub use history::{HistoryStore, MemoryHistoryStore, ScanHistory};
pub use registry::{
    ManufacturerRecord, ManufacturerRegistry, MemoryManufacturerRegistry, MemoryProductRegistry,
    PrefixRisk, ProductRecord, ProductRegistry,
};
pub use reputation::{DomainReputation, MemoryReputationStore, ReputationStore};

use scamscan_core::LayerError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("STORE/LOOKUP: {0}")]
    Lookup(String),

    #[error("STORE/PATTERN: {0}")]
    Pattern(String),

    #[error("STORE/UNAVAILABLE: {0}")]
    Unavailable(String),
}

impl From<StoreError> for LayerError {
    fn from(err: StoreError) -> Self {
        LayerError::Store(err.to_string())
    }
}
