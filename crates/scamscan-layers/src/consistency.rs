//! Consistency layer: cross-field sanity for the declared payload type.
//!
//! Reparses the payload with `scamscan-parser` and flags fields that
//! are missing, contradictory, or suspicious for that kind: a UPI
//! request without a payee address, a URL served from a raw IP, a
//! barcode with a nonstandard digit count.

use async_trait::async_trait;
use scamscan_core::{DetectedType, Layer, LayerContext, LayerError, LayerKind, LayerResult};

const LARGE_AMOUNT: f64 = 10_000.0;

pub struct ConsistencyLayer;

#[async_trait]
impl Layer for ConsistencyLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::Consistency
    }

    async fn analyze(&self, payload: &str, ctx: &LayerContext) -> Result<LayerResult, LayerError> {
        let mut result = LayerResult::new();
        match ctx.detected_type {
            DetectedType::Upi => check_upi(payload, &mut result),
            DetectedType::Url => check_url(payload, &mut result),
            DetectedType::Product => check_product(payload, &mut result),
            DetectedType::Text => {}
        }
        Ok(result)
    }
}

fn check_upi(payload: &str, result: &mut LayerResult) {
    let parsed = scamscan_parser::parse(payload);
    if !parsed.valid {
        result.add(20, "Malformed UPI URI");
        return;
    }

    match parsed.field_str("vpa") {
        None => result.add(50, "Invalid UPI: Missing Payee Address"),
        Some(vpa) => {
            let lower = vpa.to_lowercase();
            if lower.contains("test") || lower.contains("generic") {
                result.add(30, "Suspicious VPA pattern");
            }
        }
    }

    if parsed.field_str("payeeName").is_none() {
        result.add(20, "Missing payee name");
    }

    if let Some(amount) = parsed.field_f64("amount") {
        result.add(15, format!("Pre-filled amount detected: {amount}"));
        if amount >= LARGE_AMOUNT {
            result.add(15, "Large pre-filled amount");
        }
    }
}

fn check_url(payload: &str, result: &mut LayerResult) {
    let parsed = scamscan_parser::parse(payload);
    if !parsed.valid {
        result.add(20, "Malformed URL");
        return;
    }

    if parsed.field_str("protocol") == Some("http") && payload.starts_with("http://") {
        result.add(10, "Insecure Protocol (HTTP)");
    }

    if parsed.fields.get("isIp").and_then(|v| v.as_bool()) == Some(true) {
        result.add(30, "Direct IP Access Detected");
    }

    if has_userinfo(payload) {
        result.add(20, "Embedded credentials in URL");
    }

    if let Some(domain) = parsed.field_str("domain") {
        if domain.starts_with("xn--") || domain.contains(".xn--") {
            result.add(20, "Punycode hostname");
        }
    }
}

fn check_product(payload: &str, result: &mut LayerResult) {
    // The engine gates on 12-14 digits but UPC-A/EAN-13 are 12-13; a
    // 14-digit code reaching here has a nonstandard retail length.
    if !matches!(payload.len(), 12 | 13) {
        result.add(10, "Nonstandard barcode length");
    }
}

/// `user@host` authority sections are a common phishing trick
/// (`https://bank.com@evil.example/`).
fn has_userinfo(payload: &str) -> bool {
    let after_scheme = payload.split("://").nth(1).unwrap_or(payload);
    let authority = after_scheme.split(['/', '?', '#']).next().unwrap_or("");
    authority.contains('@')
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn run(payload: &str, detected: DetectedType) -> LayerResult {
        let ctx = LayerContext {
            detected_type: detected,
            ..LayerContext::default()
        };
        ConsistencyLayer.analyze(payload, &ctx).await.unwrap()
    }

    #[tokio::test]
    async fn test_upi_missing_payee_address() {
        let result = run("upi://pay?am=50", DetectedType::Upi).await;
        assert!(result
            .findings
            .contains(&"Invalid UPI: Missing Payee Address".to_string()));
        assert!(result.risk_score >= 50);
    }

    #[tokio::test]
    async fn test_upi_large_prefilled_amount_without_name() {
        let result = run("upi://pay?pa=scammer@fake&am=99999", DetectedType::Upi).await;
        assert!(result.findings.contains(&"Missing payee name".to_string()));
        assert!(result.findings.contains(&"Large pre-filled amount".to_string()));
        // Missing name (20) + pre-filled (15) + large (15)
        assert_eq!(result.risk_score, 50);
    }

    #[tokio::test]
    async fn test_upi_suspicious_vpa() {
        let result = run("upi://pay?pa=test123@bank&pn=Shop", DetectedType::Upi).await;
        assert!(result.findings.contains(&"Suspicious VPA pattern".to_string()));
    }

    #[tokio::test]
    async fn test_url_ip_host() {
        let result = run("http://192.168.1.1/login", DetectedType::Url).await;
        assert!(result
            .findings
            .contains(&"Direct IP Access Detected".to_string()));
        assert!(result
            .findings
            .contains(&"Insecure Protocol (HTTP)".to_string()));
        assert_eq!(result.risk_score, 40);
    }

    #[tokio::test]
    async fn test_url_userinfo() {
        let result = run("https://bank.com@evil.example/login", DetectedType::Url).await;
        assert!(result
            .findings
            .contains(&"Embedded credentials in URL".to_string()));
    }

    #[tokio::test]
    async fn test_clean_https_url() {
        let result = run("https://example.com/shop", DetectedType::Url).await;
        assert_eq!(result.risk_score, 0);
    }

    #[tokio::test]
    async fn test_fourteen_digit_product() {
        let result = run("89012345678901", DetectedType::Product).await;
        assert!(result
            .findings
            .contains(&"Nonstandard barcode length".to_string()));
    }

    #[tokio::test]
    async fn test_text_has_no_checks() {
        let result = run("hello there", DetectedType::Text).await;
        assert_eq!(result.risk_score, 0);
    }
}
