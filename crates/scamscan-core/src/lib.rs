//! scamscan core: data model, layer contract, and fingerprinting.
//!
//! Everything the analyzer layers and the deduction engine share lives
//! here: the verdict and layer enums, the uniform `LayerResult` record,
//! the `Layer` trait every analyzer implements, and the blake3 payload
//! fingerprint used as a join key for history and audit correlation.

pub mod context;
pub mod error;
pub mod fingerprint;
pub mod layer;
pub mod model;

pub use context::ClientContext;
pub use error::EngineError;
pub use fingerprint::fingerprint;
pub use layer::{Layer, LayerContext, LayerError};
pub use model::{AnalysisResult, DetectedType, LayerKind, LayerResult, ScanRecord, Verdict};

/// Deduction engine version, reported in scan records.
pub const ENGINE_VERSION: &str = "4.0.0";
