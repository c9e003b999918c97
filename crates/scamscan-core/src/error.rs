//! Engine-level error model.
//!
//! Layer-local failures never surface as errors: the engine recovers
//! them into zero-score results with a synthetic finding. `EngineError`
//! covers only faults in the orchestrator itself.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Payload is empty after sanitization.
    #[error("SANITIZE/EMPTY: payload is empty")]
    EmptyPayload,

    /// Payload exceeds the accepted size bound.
    #[error("SANITIZE/TOO_LARGE: {0} bytes (max {1})")]
    PayloadTooLarge(usize, usize),

    /// Unexpected fault spanning the orchestrator itself; the only
    /// other failure that propagates out of the scan path.
    #[error("ENGINE/{0}")]
    Internal(String),
}
