//! The seven analyzer layers.
//!
//! Each layer implements `scamscan_core::Layer` and depends only on its
//! declared inputs: the payload, the per-invocation context, and (for
//! the store-backed layers) a store trait from `scamscan-intel`. No
//! layer reads another layer's output; the one data dependency in the
//! pipeline (Threat's resolved `final_url` feeding Intelligence and
//! Reputation) travels through `LayerContext`.
//!
//! ```text
//! payload → Forensics ─┐
//!           Consistency ├─ local, sub-millisecond
//!           Threat ─────┘→ final_url ─→ Intelligence / Reputation
//!           Behavior (fingerprint-keyed)
//!           Product (barcode-gated)
//! ```

mod behavior;
mod consistency;
mod forensics;
mod intelligence;
mod product;
mod reputation;
mod threat;

pub use behavior::BehaviorLayer;
pub use consistency::ConsistencyLayer;
pub use forensics::ForensicsLayer;
pub use intelligence::IntelligenceLayer;
pub use product::{check_digit_valid, ProductLayer};
pub use reputation::ReputationLayer;
pub use threat::{HttpRedirectResolver, RedirectChain, RedirectResolver, ThreatLayer};
