//! Audit trail for high-severity scan outcomes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scamscan_core::{AnalysisResult, ClientContext, Verdict};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Who triggered the scan (IP or "ANONYMOUS").
    pub actor: String,
    pub action: String,
    /// Payload fingerprint; the payload itself stays out of the trail.
    pub target_hash: String,
    pub verdict: Verdict,
    pub metadata: Map<String, Value>,
}

#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, event: AuditEvent);
}

/// In-process audit log. Production deployments put a durable sink
/// behind the same trait.
#[derive(Default)]
pub struct MemoryAuditLog {
    events: RwLock<Vec<AuditEvent>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<AuditEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditLog {
    async fn record(&self, event: AuditEvent) {
        self.events.write().await.push(event);
    }
}

/// Record an audit event for dangerous verdicts. Safe and merely
/// suspicious scans stay out of the audit trail.
pub async fn audit_dangerous(
    sink: &dyn AuditSink,
    result: &AnalysisResult,
    client: &ClientContext,
) {
    if !result.verdict.is_dangerous() {
        return;
    }
    let mut metadata = Map::new();
    metadata.insert("riskScore".into(), json!(result.risk_score));
    metadata.insert("detectedType".into(), json!(result.detected_type));
    metadata.insert("findings".into(), json!(result.findings));
    sink.record(AuditEvent {
        id: Uuid::new_v4(),
        timestamp: Utc::now(),
        actor: client.actor(),
        action: "SCAN".to_string(),
        target_hash: result.fingerprint.clone(),
        verdict: result.verdict,
        metadata,
    })
    .await;
}
