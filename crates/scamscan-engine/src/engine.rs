//! The deduction engine: runs the analyzer layers in phase order,
//! accumulates risk, and maps the total to a verdict.
//!
//! Degradation policy: a layer that errors or exceeds its budget is
//! recorded as unavailable with zero contribution. An analysis never
//! fails because one signal source was down.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use scamscan_core::{
    fingerprint, AnalysisResult, ClientContext, DetectedType, Layer, LayerContext, LayerKind,
    LayerResult, Verdict,
};
use scamscan_intel::{
    BlacklistStore, HistoryStore, ManufacturerRegistry, ProductRegistry, ReputationStore,
};
use scamscan_layers::{
    BehaviorLayer, ConsistencyLayer, ForensicsLayer, IntelligenceLayer, ProductLayer,
    RedirectResolver, ReputationLayer, ThreatLayer,
};
use tracing::{debug, warn};

/// Risk is reported on a 0-100 scale regardless of how many layers
/// contributed.
pub const MAX_RISK: u32 = 100;

/// Product-layer risk at or above this floors the verdict at DANGER.
const PRODUCT_DANGER_FLOOR: u32 = 60;
/// Product-layer risk at or above this floors the verdict at WARN.
const PRODUCT_WARN_FLOOR: u32 = 20;
/// Reputation scores below this floor the verdict at DANGER.
const REPUTATION_DANGER_SCORE: u64 = 30;

/// Per-phase timeouts. Local layers touch nothing but the payload;
/// store layers hit a backing store; the network phase follows
/// redirects across the open internet.
#[derive(Debug, Clone, Copy)]
pub struct LayerBudgets {
    pub local: Duration,
    pub store: Duration,
    pub network: Duration,
}

impl Default for LayerBudgets {
    fn default() -> Self {
        Self {
            local: Duration::from_millis(50),
            store: Duration::from_millis(500),
            network: Duration::from_secs(3),
        }
    }
}

impl LayerBudgets {
    fn budget_for(&self, kind: LayerKind) -> Duration {
        match kind {
            LayerKind::Forensics | LayerKind::Consistency => self.local,
            LayerKind::Threat => self.network,
            _ => self.store,
        }
    }
}

/// The backing stores the store-driven layers read from.
pub struct EngineStores {
    pub blacklist: Arc<dyn BlacklistStore>,
    pub reputation: Arc<dyn ReputationStore>,
    pub history: Arc<dyn HistoryStore>,
    pub manufacturers: Arc<dyn ManufacturerRegistry>,
    pub products: Arc<dyn ProductRegistry>,
}

pub struct DeductionEngine {
    forensics: ForensicsLayer,
    consistency: ConsistencyLayer,
    threat: ThreatLayer,
    intelligence: IntelligenceLayer,
    behavior: BehaviorLayer,
    product: ProductLayer,
    reputation: ReputationLayer,
    budgets: LayerBudgets,
}

impl DeductionEngine {
    pub fn new(stores: EngineStores, resolver: Arc<dyn RedirectResolver>) -> Self {
        Self {
            forensics: ForensicsLayer,
            consistency: ConsistencyLayer,
            threat: ThreatLayer::new(resolver),
            intelligence: IntelligenceLayer::new(stores.blacklist),
            behavior: BehaviorLayer::new(stores.history),
            product: ProductLayer::new(stores.manufacturers, stores.products),
            reputation: ReputationLayer::new(stores.reputation),
            budgets: LayerBudgets::default(),
        }
    }

    pub fn with_budgets(mut self, budgets: LayerBudgets) -> Self {
        self.budgets = budgets;
        self
    }

    /// Run the full pipeline over a sanitized payload.
    pub async fn analyze(&self, payload: &str, client: &ClientContext) -> AnalysisResult {
        let detected_type = DetectedType::classify(payload);
        let mut ctx = LayerContext {
            fingerprint: fingerprint(payload),
            detected_type,
            final_url: None,
            client: client.clone(),
        };
        debug!(%detected_type, fingerprint = %ctx.fingerprint, "starting analysis");

        let mut layers: BTreeMap<LayerKind, LayerResult> = BTreeMap::new();

        // Phase 1: local structural checks.
        let (forensics, consistency) = tokio::join!(
            self.run(&self.forensics, payload, &ctx),
            self.run(&self.consistency, payload, &ctx),
        );
        layers.insert(LayerKind::Forensics, forensics);
        layers.insert(LayerKind::Consistency, consistency);

        // Phase 2: redirect expansion. The resolved destination feeds
        // every later layer through a rebuilt context.
        let threat = self.run(&self.threat, payload, &ctx).await;
        ctx.final_url = threat
            .details
            .get("finalUrl")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        layers.insert(LayerKind::Threat, threat);

        // Phase 3: store-backed signals, independent of each other.
        let (intelligence, behavior) = tokio::join!(
            self.run(&self.intelligence, payload, &ctx),
            self.run(&self.behavior, payload, &ctx),
        );
        layers.insert(LayerKind::Intelligence, intelligence);
        layers.insert(LayerKind::Behavior, behavior);

        // Phase 4: type-gated layers.
        if LayerKind::Product.applies_to(detected_type) {
            let product = self.run(&self.product, payload, &ctx).await;
            layers.insert(LayerKind::Product, product);
        }
        if LayerKind::Reputation.applies_to(detected_type) {
            let reputation = self.run(&self.reputation, payload, &ctx).await;
            layers.insert(LayerKind::Reputation, reputation);
        }

        let total: u32 = layers.values().map(|r| r.risk_score).sum();
        let risk_score = total.min(MAX_RISK);
        let verdict = Verdict::from_score(risk_score).max(override_floor(&layers));
        let findings = layers
            .values()
            .flat_map(|r| r.findings.iter().cloned())
            .collect();

        AnalysisResult {
            fingerprint: ctx.fingerprint,
            detected_type,
            risk_score,
            verdict,
            findings,
            layers,
        }
    }

    async fn run<L: Layer>(&self, layer: &L, payload: &str, ctx: &LayerContext) -> LayerResult {
        let kind = layer.kind();
        let budget = self.budgets.budget_for(kind);
        match tokio::time::timeout(budget, layer.analyze(payload, ctx)).await {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => {
                warn!(%kind, error = %err, "layer failed");
                LayerResult::unavailable(kind)
            }
            Err(_) => {
                warn!(%kind, ?budget, "layer exceeded budget");
                LayerResult::unavailable(kind)
            }
        }
    }
}

/// Verdict floor from the override rules. The final verdict is the
/// maximum of the score-mapped verdict and this floor, so an override
/// can only raise severity, never lower it.
fn override_floor(layers: &BTreeMap<LayerKind, LayerResult>) -> Verdict {
    let mut floor = Verdict::Safe;

    if let Some(product) = layers.get(&LayerKind::Product) {
        if product.risk_score >= PRODUCT_DANGER_FLOOR {
            floor = floor.max(Verdict::Danger);
        } else if product.risk_score >= PRODUCT_WARN_FLOOR {
            floor = floor.max(Verdict::Warn);
        }
    }

    if let Some(reputation) = layers.get(&LayerKind::Reputation) {
        let known_bad = reputation
            .details
            .get("score")
            .and_then(|v| v.as_u64())
            .is_some_and(|s| s < REPUTATION_DANGER_SCORE);
        if known_bad {
            floor = floor.max(Verdict::Danger);
        }
    }

    floor
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn layer_map(entries: Vec<(LayerKind, LayerResult)>) -> BTreeMap<LayerKind, LayerResult> {
        entries.into_iter().collect()
    }

    #[test]
    fn test_no_overrides_for_clean_layers() {
        let layers = layer_map(vec![
            (LayerKind::Forensics, LayerResult::new()),
            (LayerKind::Product, LayerResult::new()),
        ]);
        assert_eq!(override_floor(&layers), Verdict::Safe);
    }

    #[test]
    fn test_product_warn_floor() {
        let mut product = LayerResult::new();
        product.add(20, "Unverified manufacturer prefix");
        let layers = layer_map(vec![(LayerKind::Product, product)]);
        assert_eq!(override_floor(&layers), Verdict::Warn);
    }

    #[test]
    fn test_product_danger_floor() {
        let mut product = LayerResult::new();
        product.add(60, "Invalid Barcode Checksum");
        let layers = layer_map(vec![(LayerKind::Product, product)]);
        assert_eq!(override_floor(&layers), Verdict::Danger);
    }

    #[test]
    fn test_reputation_danger_floor() {
        let mut reputation = LayerResult::new();
        reputation.add(28, "Domain reputation score: 15/100");
        reputation.detail("score", json!(15));
        let layers = layer_map(vec![(LayerKind::Reputation, reputation)]);
        assert_eq!(override_floor(&layers), Verdict::Danger);
    }

    #[test]
    fn test_floor_combines_with_score_via_max() {
        // A floor never lowers a verdict the score already earned.
        assert_eq!(Verdict::from_score(85).max(Verdict::Warn), Verdict::Danger);
        assert_eq!(Verdict::from_score(10).max(Verdict::Warn), Verdict::Warn);
    }

    #[test]
    fn test_budget_selection() {
        let budgets = LayerBudgets::default();
        assert_eq!(budgets.budget_for(LayerKind::Forensics), budgets.local);
        assert_eq!(budgets.budget_for(LayerKind::Threat), budgets.network);
        assert_eq!(budgets.budget_for(LayerKind::Behavior), budgets.store);
    }
}
