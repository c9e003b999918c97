//! Reputation layer: domain trust score for URL payloads.
//!
//! Known domains contribute risk inversely to their stored score.
//! Unknown domains fall back to structural heuristics that correlate
//! with throwaway phishing infrastructure: high-entropy names, cheap
//! abuse-heavy TLDs, very long hostnames.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use scamscan_core::{Layer, LayerContext, LayerError, LayerKind, LayerResult};
use scamscan_intel::ReputationStore;
use serde_json::json;
use url::Url;

const ENTROPY_THRESHOLD: f64 = 3.5;
const LONG_DOMAIN_LEN: usize = 40;

static RISKY_TLDS: &[&str] = &[
    "tk", "ml", "ga", "cf", "gq", "click", "download", "zip", "stream",
];

pub struct ReputationLayer {
    store: Arc<dyn ReputationStore>,
}

impl ReputationLayer {
    pub fn new(store: Arc<dyn ReputationStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Layer for ReputationLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::Reputation
    }

    async fn analyze(&self, payload: &str, ctx: &LayerContext) -> Result<LayerResult, LayerError> {
        let mut result = LayerResult::new();

        let target = ctx.final_url.as_deref().unwrap_or(payload);
        let Some(domain) = domain_of(target) else {
            return Ok(result);
        };
        result.detail("domain", json!(domain));

        match self.store.lookup(&domain).await? {
            Some(rep) => {
                // A score of 100 contributes nothing, a score of 0
                // contributes 40.
                let contribution = (100 - rep.score.min(100)) * 2 / 5;
                if contribution > 0 {
                    result.add(
                        contribution,
                        format!("Domain reputation score: {}/100", rep.score),
                    );
                }
                result.detail("score", json!(rep.score));
                if rep.score < 30 {
                    result.add(0, "Domain has a history of confirmed scams");
                }
            }
            None => {
                if shannon_entropy(&domain) > ENTROPY_THRESHOLD {
                    result.add(15, "High-entropy domain name");
                }
                if let Some(tld) = domain.rsplit('.').next() {
                    if RISKY_TLDS.contains(&tld) {
                        result.add(15, format!("High-abuse TLD: .{tld}"));
                    }
                }
                if domain.len() > LONG_DOMAIN_LEN {
                    result.add(10, "Unusually long domain name");
                }
            }
        }

        Ok(result)
    }
}

fn domain_of(target: &str) -> Option<String> {
    Url::parse(target)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
}

fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }
    let mut counts: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *counts.entry(c).or_insert(0) += 1;
    }
    let len = s.chars().count() as f64;
    counts
        .values()
        .map(|&count| {
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}
