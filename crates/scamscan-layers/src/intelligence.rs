//! Intelligence layer: blacklist and scam-keyword matching.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use scamscan_core::{Layer, LayerContext, LayerError, LayerKind, LayerResult};
use scamscan_intel::{BlacklistEntry, BlacklistSeverity, BlacklistStore};

const DANGER_MATCH: u32 = 60;
const WARN_MATCH: u32 = 25;
const KEYWORD_SCORE: u32 = 20;
const MAX_KEYWORD_HITS: usize = 5;

/// Phrases that show up across lottery, prize, and bank-phishing
/// scripts regardless of the delivery channel.
static SCAM_KEYWORDS: &[&str] = &[
    "congratulations",
    "winner",
    "lottery",
    "claim prize",
    "urgent",
    "verify account",
    "bank",
    "password",
    "pin",
    "cvv",
];

pub struct IntelligenceLayer {
    blacklist: Arc<dyn BlacklistStore>,
}

impl IntelligenceLayer {
    pub fn new(blacklist: Arc<dyn BlacklistStore>) -> Self {
        Self { blacklist }
    }
}

#[async_trait]
impl Layer for IntelligenceLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::Intelligence
    }

    async fn analyze(&self, payload: &str, ctx: &LayerContext) -> Result<LayerResult, LayerError> {
        let mut result = LayerResult::new();

        let mut matches = self.blacklist.find_matches(payload).await?;
        if let Some(final_url) = &ctx.final_url {
            if final_url != payload {
                matches.extend(self.blacklist.find_matches(final_url).await?);
            }
        }

        let mut seen = HashSet::new();
        for entry in matches {
            if !seen.insert(entry.pattern.clone()) {
                continue;
            }
            score_match(&entry, &mut result);
        }

        let lower = payload.to_lowercase();
        let mut keyword_hits = 0;
        for keyword in SCAM_KEYWORDS {
            if keyword_hits >= MAX_KEYWORD_HITS {
                break;
            }
            if lower.contains(keyword) {
                keyword_hits += 1;
                result.add(KEYWORD_SCORE, format!("Scam keyword detected: '{keyword}'"));
            }
        }

        Ok(result)
    }
}

fn score_match(entry: &BlacklistEntry, result: &mut LayerResult) {
    match entry.severity {
        BlacklistSeverity::Danger => result.add(
            DANGER_MATCH,
            format!("Matches blacklisted pattern ({})", entry.category),
        ),
        BlacklistSeverity::Warn => result.add(
            WARN_MATCH,
            format!("Matches watchlist pattern ({})", entry.category),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scamscan_intel::MemoryBlacklist;

    fn layer() -> IntelligenceLayer {
        IntelligenceLayer::new(Arc::new(MemoryBlacklist::with_defaults()))
    }

    #[tokio::test]
    async fn test_clean_payload() {
        let result = layer()
            .analyze("https://example.com/shop", &LayerContext::default())
            .await
            .unwrap();
        assert_eq!(result.risk_score, 0);
    }

    #[tokio::test]
    async fn test_danger_blacklist_match() {
        let result = layer()
            .analyze("https://free-gift.example/claim", &LayerContext::default())
            .await
            .unwrap();
        assert!(result.risk_score >= DANGER_MATCH);
        assert!(result
            .findings
            .iter()
            .any(|f| f.contains("blacklisted pattern")));
    }

    #[tokio::test]
    async fn test_shortener_is_warn() {
        let result = layer()
            .analyze("https://bit.ly/3abc", &LayerContext::default())
            .await
            .unwrap();
        assert_eq!(result.risk_score, WARN_MATCH);
    }

    #[tokio::test]
    async fn test_final_url_also_checked() {
        let ctx = LayerContext {
            final_url: Some("https://secure-login-update.example/".into()),
            ..LayerContext::default()
        };
        let result = layer()
            .analyze("https://bit.ly/3abc", &ctx)
            .await
            .unwrap();
        // Shortener on the payload plus a danger match on the landing page.
        assert_eq!(result.risk_score, WARN_MATCH + DANGER_MATCH);
    }

    #[tokio::test]
    async fn test_keywords_are_capped() {
        let text = "congratulations winner! lottery claim prize, urgent: verify account bank password pin cvv";
        let result = layer().analyze(text, &LayerContext::default()).await.unwrap();
        let keyword_findings = result
            .findings
            .iter()
            .filter(|f| f.starts_with("Scam keyword"))
            .count();
        assert_eq!(keyword_findings, MAX_KEYWORD_HITS);
    }

    #[tokio::test]
    async fn test_duplicate_matches_counted_once() {
        let ctx = LayerContext {
            final_url: Some("https://bit.ly/other".into()),
            ..LayerContext::default()
        };
        let result = layer().analyze("https://bit.ly/3abc", &ctx).await.unwrap();
        assert_eq!(result.risk_score, WARN_MATCH);
    }
}
