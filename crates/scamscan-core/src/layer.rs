//! Layer contract: the single interface every analyzer implements.
//!
//! Layers are independently testable with only their declared inputs:
//! the payload plus a per-invocation `LayerContext`. The context is
//! rebuilt by the engine between phases, which is how the Threat layer's
//! resolved `final_url` reaches Intelligence and Reputation without any
//! shared mutable state.

use async_trait::async_trait;

use crate::context::ClientContext;
use crate::model::{DetectedType, LayerKind, LayerResult};

/// Errors a layer may raise. All of them are recovered at the engine
/// boundary into a zero-score result with a `"<layer> unavailable"`
/// finding; they never abort an analysis.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LayerError {
    #[error("LAYER/STORE: {0}")]
    Store(String),

    #[error("LAYER/NETWORK: {0}")]
    Network(String),

    #[error("LAYER/EXEC: {0}")]
    Failed(String),
}

/// Per-invocation input for a layer, beyond the payload itself.
#[derive(Debug, Clone, Default)]
pub struct LayerContext {
    /// blake3 fingerprint of the payload (Behavior layer key)
    pub fingerprint: String,
    /// Engine-side shape classification
    pub detected_type: DetectedType,
    /// Final destination discovered by the Threat layer, if any
    pub final_url: Option<String>,
    pub client: ClientContext,
}

/// Uniform analyzer contract.
#[async_trait]
pub trait Layer: Send + Sync {
    fn kind(&self) -> LayerKind;

    /// Analyze the payload and return a bounded risk contribution.
    /// Implementations must be side-effect free with respect to the
    /// external stores they read (the engine never writes through them).
    async fn analyze(&self, payload: &str, ctx: &LayerContext) -> Result<LayerResult, LayerError>;
}
