//! Threat layer: redirect chain expansion.
//!
//! Shorteners and multi-hop redirects hide the real landing page from
//! the person scanning a code. This layer follows the chain (bounded)
//! and scores by how far the final destination drifts from the
//! payload's visible URL. The resolved final URL is handed back to the
//! engine so downstream layers judge the landing page, not the bait.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scamscan_core::{Layer, LayerContext, LayerError, LayerKind, LayerResult};
use serde_json::json;
use url::Url;

/// Hard stop for redirect loops.
pub const MAX_HOPS: usize = 5;

static URL_IN_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s"'<>]+"#).expect("url regex"));

static SHORTENER_HOSTS: &[&str] = &[
    "bit.ly",
    "tinyurl.com",
    "goo.gl",
    "t.co",
    "is.gd",
    "ow.ly",
    "rb.gy",
    "cutt.ly",
];

/// One resolved redirect chain. `hops` excludes the starting URL.
#[derive(Debug, Clone)]
pub struct RedirectChain {
    pub hops: Vec<String>,
    pub final_url: String,
}

/// Seam for tests and offline operation.
#[async_trait]
pub trait RedirectResolver: Send + Sync {
    async fn resolve(&self, url: &str) -> Result<RedirectChain, LayerError>;
}

/// Follows `Location` headers manually with HEAD requests so each hop
/// is observed rather than swallowed by the client.
pub struct HttpRedirectResolver {
    client: reqwest::Client,
}

impl HttpRedirectResolver {
    pub fn new() -> Result<Self, LayerError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(3))
            .user_agent("scamscan/0.4")
            .build()
            .map_err(|e| LayerError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RedirectResolver for HttpRedirectResolver {
    async fn resolve(&self, url: &str) -> Result<RedirectChain, LayerError> {
        let mut current = url.to_string();
        let mut hops = Vec::new();

        for _ in 0..MAX_HOPS {
            let response = self
                .client
                .head(&current)
                .send()
                .await
                .map_err(|e| LayerError::Network(e.to_string()))?;

            if !response.status().is_redirection() {
                break;
            }
            let Some(location) = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
            else {
                break;
            };
            let base = Url::parse(&current).map_err(|e| LayerError::Network(e.to_string()))?;
            let next = base
                .join(location)
                .map_err(|e| LayerError::Network(e.to_string()))?;
            current = next.to_string();
            hops.push(current.clone());
        }

        Ok(RedirectChain {
            hops,
            final_url: current,
        })
    }
}

pub struct ThreatLayer {
    resolver: Arc<dyn RedirectResolver>,
}

impl ThreatLayer {
    pub fn new(resolver: Arc<dyn RedirectResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl Layer for ThreatLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::Threat
    }

    async fn analyze(&self, payload: &str, _ctx: &LayerContext) -> Result<LayerResult, LayerError> {
        let mut result = LayerResult::new();

        // Any payload kind can smuggle a URL (a UPI note, plain text).
        let Some(start) = URL_IN_TEXT.find(payload).map(|m| m.as_str()) else {
            return Ok(result);
        };

        let chain = self.resolver.resolve(start).await?;

        if !chain.hops.is_empty() {
            let hop_score = (chain.hops.len() as u32 * 10).min(30);
            result.add(
                hop_score,
                format!("Redirect chain of {} hop(s)", chain.hops.len()),
            );
        }

        let start_host = host_of(start);
        let final_host = host_of(&chain.final_url);
        if let (Some(a), Some(b)) = (&start_host, &final_host) {
            if a != b {
                result.add(15, format!("Redirects to different domain: {b}"));
            }
        }

        if chain.final_url.starts_with("http://") {
            result.add(15, "Final destination uses insecure HTTP");
        }

        if start_host
            .as_deref()
            .is_some_and(|h| SHORTENER_HOSTS.contains(&h))
        {
            result.add(20, "URL shortener detected");
        }

        result.detail("finalUrl", json!(chain.final_url));
        result.detail("chainLength", json!(chain.hops.len()));
        Ok(result)
    }
}

fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_lowercase()))
}
