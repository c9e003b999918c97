//! Behavior layer: scan history for this exact payload fingerprint.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use scamscan_core::{Layer, LayerContext, LayerError, LayerKind, LayerResult};
use scamscan_intel::HistoryStore;
use serde_json::json;

pub struct BehaviorLayer {
    history: Arc<dyn HistoryStore>,
}

impl BehaviorLayer {
    pub fn new(history: Arc<dyn HistoryStore>) -> Self {
        Self { history }
    }
}

#[async_trait]
impl Layer for BehaviorLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::Behavior
    }

    async fn analyze(&self, _payload: &str, ctx: &LayerContext) -> Result<LayerResult, LayerError> {
        let mut result = LayerResult::new();

        let Some(history) = self.history.lookup(&ctx.fingerprint).await? else {
            return Ok(result);
        };

        if history.danger_count > 0 {
            result.add(
                40,
                format!(
                    "Previously flagged as dangerous ({} time(s))",
                    history.danger_count
                ),
            );
        }

        let recent_burst =
            history.scan_count >= 5 && history.last_seen > Utc::now() - Duration::hours(1);
        if recent_burst {
            result.add(15, "Unusual scan frequency in the last hour");
        }

        if history.scan_count >= 20 {
            result.add(10, "Widely circulated payload");
        }

        result.detail("scanCount", json!(history.scan_count));
        result.detail("dangerCount", json!(history.danger_count));
        Ok(result)
    }
}
