//! Orchestration: sanitize, analyze, score, audit.
//!
//! The engine owns the phase ordering and the degradation policy;
//! everything it runs lives in `scamscan-layers`, and everything it
//! reads lives behind the store traits in `scamscan-intel`.

mod audit;
mod engine;
mod sanitize;

pub use audit::{audit_dangerous, AuditEvent, AuditSink, MemoryAuditLog};
pub use engine::{DeductionEngine, EngineStores, LayerBudgets, MAX_RISK};
pub use sanitize::{sanitize, MAX_PAYLOAD_BYTES};
