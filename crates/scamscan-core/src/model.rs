//! Data model for one analysis call.
//!
//! All types here are created fresh per `analyze` call and never mutated
//! after the engine hands them back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Final verdict for a scanned payload.
///
/// Ordered by severity: an override can only ever raise the verdict,
/// so combining two verdicts takes the maximum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default, Hash,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// No risk contribution from any layer
    #[default]
    Safe,
    /// 1-39: minor irregularities
    Suspicious,
    /// 40-79: significant irregularities
    Warn,
    /// 80-100, or a forced override
    Danger,
}

impl Verdict {
    /// Map an aggregate risk score (already clamped to 0-100) to a verdict.
    pub fn from_score(score: u32) -> Self {
        match score {
            0 => Verdict::Safe,
            1..=39 => Verdict::Suspicious,
            40..=79 => Verdict::Warn,
            _ => Verdict::Danger,
        }
    }

    /// Whether this verdict should trigger audit emission.
    pub fn is_dangerous(&self) -> bool {
        matches!(self, Verdict::Danger)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Safe => "SAFE",
            Verdict::Suspicious => "SUSPICIOUS",
            Verdict::Warn => "WARN",
            Verdict::Danger => "DANGER",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload shape as the engine sees it.
///
/// This is the engine's own gating classification; the parser applies
/// its slightly stricter rules independently (see `scamscan-parser`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum DetectedType {
    Upi,
    Url,
    Product,
    #[default]
    Text,
}

impl DetectedType {
    /// Shape rules: `upi://` prefix, `http` prefix, 12-14 contiguous
    /// digits, else free text.
    pub fn classify(payload: &str) -> Self {
        if payload.starts_with("upi://") {
            DetectedType::Upi
        } else if payload.starts_with("http") {
            DetectedType::Url
        } else if (12..=14).contains(&payload.len())
            && payload.chars().all(|c| c.is_ascii_digit())
        {
            DetectedType::Product
        } else {
            DetectedType::Text
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DetectedType::Upi => "UPI",
            DetectedType::Url => "URL",
            DetectedType::Product => "PRODUCT",
            DetectedType::Text => "TEXT",
        }
    }
}

impl fmt::Display for DetectedType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The seven analyzer layers.
///
/// Declaration order is execution order; `Ord` follows it, so a
/// `BTreeMap<LayerKind, _>` iterates layers the way the engine ran them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Forensics,
    Consistency,
    Threat,
    Intelligence,
    Behavior,
    Product,
    Reputation,
}

impl LayerKind {
    pub const ALL: [LayerKind; 7] = [
        LayerKind::Forensics,
        LayerKind::Consistency,
        LayerKind::Threat,
        LayerKind::Intelligence,
        LayerKind::Behavior,
        LayerKind::Product,
        LayerKind::Reputation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Forensics => "forensics",
            LayerKind::Consistency => "consistency",
            LayerKind::Threat => "threat",
            LayerKind::Intelligence => "intelligence",
            LayerKind::Behavior => "behavior",
            LayerKind::Product => "product",
            LayerKind::Reputation => "reputation",
        }
    }

    /// Type-gated layers are skipped entirely for other payload shapes:
    /// they do not appear in the result map and contribute no findings.
    pub fn applies_to(&self, detected: DetectedType) -> bool {
        match self {
            LayerKind::Product => detected == DetectedType::Product,
            LayerKind::Reputation => detected == DetectedType::Url,
            _ => true,
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One layer's contribution: a local risk score, findings, and arbitrary
/// layer-specific detail.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerResult {
    pub risk_score: u32,
    pub findings: Vec<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub details: Map<String, Value>,
}

impl LayerResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a risk contribution with its finding.
    pub fn add(&mut self, score: u32, finding: impl Into<String>) {
        self.risk_score += score;
        self.findings.push(finding.into());
    }

    /// Attach a layer-specific detail value.
    pub fn detail(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.details.insert(key.into(), value.into());
    }

    /// Zero-contribution result recorded when a layer times out or fails.
    pub fn unavailable(kind: LayerKind) -> Self {
        Self {
            risk_score: 0,
            findings: vec![format!("{} unavailable", kind)],
            details: Map::new(),
        }
    }
}

/// Aggregated output of one `analyze` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// blake3 hex of the sanitized payload
    pub fingerprint: String,
    pub detected_type: DetectedType,
    /// Sum of layer contributions, clamped to 0-100
    pub risk_score: u32,
    pub verdict: Verdict,
    /// Concatenated findings in layer execution order
    pub findings: Vec<String>,
    pub layers: BTreeMap<LayerKind, LayerResult>,
}

impl AnalysisResult {
    /// Build the persistence-ready value the caller stores.
    pub fn into_record(self, payload: &str, decoded_data: Map<String, Value>) -> ScanRecord {
        ScanRecord {
            fingerprint: self.fingerprint,
            payload: payload.to_string(),
            decoded_data,
            detected_type: self.detected_type,
            risk_score: self.risk_score,
            verdict: self.verdict,
            findings: self.findings,
            layers: self.layers,
            engine_version: crate::ENGINE_VERSION.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Value suitable for direct storage and later retrieval by id or by
/// fingerprint-scoped history query. The engine returns it; persistence
/// is the caller's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    pub fingerprint: String,
    pub payload: String,
    pub decoded_data: Map<String, Value>,
    pub detected_type: DetectedType,
    pub risk_score: u32,
    pub verdict: Verdict,
    pub findings: Vec<String>,
    pub layers: BTreeMap<LayerKind, LayerResult>,
    pub engine_version: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_from_score() {
        assert_eq!(Verdict::from_score(0), Verdict::Safe);
        assert_eq!(Verdict::from_score(1), Verdict::Suspicious);
        assert_eq!(Verdict::from_score(39), Verdict::Suspicious);
        assert_eq!(Verdict::from_score(40), Verdict::Warn);
        assert_eq!(Verdict::from_score(79), Verdict::Warn);
        assert_eq!(Verdict::from_score(80), Verdict::Danger);
        assert_eq!(Verdict::from_score(100), Verdict::Danger);
    }

    #[test]
    fn test_verdict_severity_order() {
        assert!(Verdict::Safe < Verdict::Suspicious);
        assert!(Verdict::Suspicious < Verdict::Warn);
        assert!(Verdict::Warn < Verdict::Danger);
        // Overrides combine via max, so this must never downgrade
        assert_eq!(Verdict::Danger.max(Verdict::Warn), Verdict::Danger);
    }

    #[test]
    fn test_detected_type_classify() {
        assert_eq!(DetectedType::classify("upi://pay?pa=a@b"), DetectedType::Upi);
        assert_eq!(DetectedType::classify("https://example.com"), DetectedType::Url);
        assert_eq!(DetectedType::classify("http://example.com"), DetectedType::Url);
        assert_eq!(DetectedType::classify("890123456789"), DetectedType::Product);
        assert_eq!(DetectedType::classify("8901234567890"), DetectedType::Product);
        assert_eq!(DetectedType::classify("89012345678901"), DetectedType::Product);
        // 11 and 15 digits fall through to text
        assert_eq!(DetectedType::classify("89012345678"), DetectedType::Text);
        assert_eq!(DetectedType::classify("890123456789012"), DetectedType::Text);
        assert_eq!(DetectedType::classify("hello world"), DetectedType::Text);
    }

    #[test]
    fn test_layer_kind_gating() {
        assert!(LayerKind::Product.applies_to(DetectedType::Product));
        assert!(!LayerKind::Product.applies_to(DetectedType::Url));
        assert!(LayerKind::Reputation.applies_to(DetectedType::Url));
        assert!(!LayerKind::Reputation.applies_to(DetectedType::Text));
        assert!(LayerKind::Threat.applies_to(DetectedType::Text));
    }

    #[test]
    fn test_layer_kind_order_matches_execution() {
        let mut sorted = LayerKind::ALL;
        sorted.sort();
        assert_eq!(sorted, LayerKind::ALL);
    }

    #[test]
    fn test_layer_result_builder() {
        let mut result = LayerResult::new();
        result.add(40, "Insecure Protocol (HTTP)");
        result.add(30, "Direct IP access");
        result.detail("finalUrl", "http://10.0.0.1/");
        assert_eq!(result.risk_score, 70);
        assert_eq!(result.findings.len(), 2);
        assert_eq!(result.details["finalUrl"], "http://10.0.0.1/");
    }

    #[test]
    fn test_unavailable_result() {
        let result = LayerResult::unavailable(LayerKind::Threat);
        assert_eq!(result.risk_score, 0);
        assert_eq!(result.findings, vec!["threat unavailable".to_string()]);
    }

    #[test]
    fn test_analysis_result_serialization() {
        let mut layers = BTreeMap::new();
        layers.insert(LayerKind::Forensics, LayerResult::new());
        let result = AnalysisResult {
            fingerprint: "abc".into(),
            detected_type: DetectedType::Url,
            risk_score: 55,
            verdict: Verdict::Warn,
            findings: vec!["Insecure Protocol (HTTP)".into()],
            layers,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"verdict\":\"WARN\""));
        assert!(json.contains("\"detectedType\":\"URL\""));
        assert!(json.contains("\"forensics\""));
        let parsed: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.risk_score, 55);
    }

    #[test]
    fn test_into_record_stamps_engine_version() {
        let result = AnalysisResult {
            fingerprint: "abc".into(),
            detected_type: DetectedType::Text,
            risk_score: 0,
            verdict: Verdict::Safe,
            findings: vec![],
            layers: BTreeMap::new(),
        };
        let mut decoded = Map::new();
        decoded.insert("preview".into(), "hello".into());
        let record = result.into_record("hello", decoded);
        assert_eq!(record.payload, "hello");
        assert_eq!(record.decoded_data["preview"], "hello");
        assert_eq!(record.engine_version, crate::ENGINE_VERSION);
    }
}
