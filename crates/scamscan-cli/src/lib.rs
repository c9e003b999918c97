//! Scanner assembly: wires stores, resolver, engine, and explanation
//! into one scan entrypoint the binary (and tests) call.

use std::sync::Arc;

use scamscan_core::{ClientContext, EngineError, ScanRecord};
use scamscan_engine::{
    audit_dangerous, sanitize, AuditSink, DeductionEngine, EngineStores, MemoryAuditLog,
};
use scamscan_explain::{explain, Explanation};
use scamscan_intel::{
    DomainReputation, HistoryStore, ManufacturerRecord, MemoryBlacklist, MemoryHistoryStore,
    MemoryManufacturerRegistry, MemoryProductRegistry, MemoryReputationStore, PrefixRisk,
};
use scamscan_layers::{HttpRedirectResolver, RedirectResolver};
use serde::Serialize;

/// Everything one scan produces: the persistence-ready record plus the
/// human-facing explanation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub record: ScanRecord,
    pub explanation: Explanation,
}

pub struct Scanner {
    engine: DeductionEngine,
    history: Arc<dyn HistoryStore>,
    audit: Arc<dyn AuditSink>,
}

impl Scanner {
    pub fn new(
        stores: EngineStores,
        resolver: Arc<dyn RedirectResolver>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        let history = stores.history.clone();
        Self {
            engine: DeductionEngine::new(stores, resolver),
            history,
            audit,
        }
    }

    /// Scanner with seeded in-memory stores and a live redirect
    /// resolver.
    pub async fn online() -> Result<Self, EngineError> {
        let resolver =
            HttpRedirectResolver::new().map_err(|e| EngineError::Internal(e.to_string()))?;
        Ok(Self::new(
            seeded_stores().await,
            Arc::new(resolver),
            Arc::new(MemoryAuditLog::new()),
        ))
    }

    /// Sanitize, analyze, record, audit, explain.
    pub async fn scan(&self, raw: &str, client: &ClientContext) -> Result<ScanReport, EngineError> {
        let payload = sanitize(raw)?;
        let parsed = scamscan_parser::parse(&payload);
        let result = self.engine.analyze(&payload, client).await;

        if let Err(err) = self
            .history
            .record(&result.fingerprint, result.verdict.is_dangerous())
            .await
        {
            tracing::warn!(error = %err, "failed to record scan history");
        }
        audit_dangerous(self.audit.as_ref(), &result, client).await;

        let explanation = explain(result.verdict, result.risk_score, &result.findings, &parsed);
        let record = result.into_record(&payload, parsed.fields);
        Ok(ScanReport {
            record,
            explanation,
        })
    }
}

/// In-memory stores preloaded with the built-in pattern set, a handful
/// of well-known domains, and the common GS1 prefixes.
pub async fn seeded_stores() -> EngineStores {
    let reputation = MemoryReputationStore::new();
    for (domain, score) in [
        ("google.com", 98),
        ("github.com", 97),
        ("wikipedia.org", 96),
        ("amazon.in", 94),
    ] {
        reputation.upsert(DomainReputation::new(domain, score)).await;
    }

    let manufacturers = MemoryManufacturerRegistry::new();
    for (prefix, country, risk) in [
        ("036", "USA / Canada", PrefixRisk::Safe),
        ("400", "Germany", PrefixRisk::Safe),
        ("450", "Japan", PrefixRisk::Safe),
        ("500", "United Kingdom", PrefixRisk::Safe),
        ("690", "China", PrefixRisk::Moderate),
        ("890", "India", PrefixRisk::Safe),
    ] {
        manufacturers
            .upsert(ManufacturerRecord {
                prefix: prefix.to_string(),
                country: country.to_string(),
                risk,
            })
            .await;
    }

    EngineStores {
        blacklist: Arc::new(MemoryBlacklist::with_defaults()),
        reputation: Arc::new(reputation),
        history: Arc::new(MemoryHistoryStore::new()),
        manufacturers: Arc::new(manufacturers),
        products: Arc::new(MemoryProductRegistry::new()),
    }
}
