//! Turns a verdict plus parsed payload fields into text a non-technical
//! person can act on. Pure string assembly, no IO.

use scamscan_core::{DetectedType, Verdict};
use scamscan_parser::ParsedPayload;
use serde::{Deserialize, Serialize};

/// At most this many findings are surfaced as risk factors; the rest
/// stay in the raw result.
const MAX_RISK_FACTORS: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation {
    /// One sentence describing what the payload is.
    pub summary: String,
    /// Full finding list, verbatim from the analysis.
    pub findings: Vec<String>,
    /// Top findings rephrased without jargon.
    pub risk_factors: Vec<String>,
    /// What the person should do next.
    pub recommendation: String,
}

/// Build the explanation for one completed scan.
pub fn explain(
    verdict: Verdict,
    risk_score: u32,
    findings: &[String],
    parsed: &ParsedPayload,
) -> Explanation {
    Explanation {
        summary: summarize(verdict, risk_score, parsed),
        findings: findings.to_vec(),
        risk_factors: findings
            .iter()
            .take(MAX_RISK_FACTORS)
            .map(|f| humanize(f))
            .collect(),
        recommendation: recommend(verdict, parsed.kind),
    }
}

fn summarize(verdict: Verdict, risk_score: u32, parsed: &ParsedPayload) -> String {
    let subject = match parsed.kind {
        DetectedType::Upi => {
            let payee = parsed
                .field_str("payeeName")
                .unwrap_or("an unknown payee")
                .to_string();
            match parsed.field_f64("amount") {
                Some(amount) => {
                    format!("a payment request for {payee}, amounting to \u{20b9}{amount}")
                }
                None => format!("a payment request for {payee}"),
            }
        }
        DetectedType::Url => match parsed.field_str("domain") {
            Some(domain) => format!("a link to {domain}"),
            None => "a malformed link".to_string(),
        },
        DetectedType::Product => {
            let format = parsed.field_str("format").unwrap_or("unknown format");
            match parsed.field_str("origin") {
                Some(origin) => format!("a product barcode ({format}, registered in {origin})"),
                None => format!("a product barcode ({format})"),
            }
        }
        DetectedType::Text => "raw text content".to_string(),
    };

    let assessment = match verdict {
        Verdict::Safe => {
            "No known security threats were detected. The format is valid and the destination appears clean.".to_string()
        }
        Verdict::Suspicious => format!(
            "Caution is advised. We detected some irregularities (Risk Score: {risk_score}/100). Verify the source before proceeding."
        ),
        Verdict::Warn => format!(
            "This looks unusual (Risk Score: {risk_score}/100). Check the details carefully before proceeding."
        ),
        Verdict::Danger => format!(
            "HIGH RISK WARNING. This content matches known scam patterns or blacklisted sources (Risk Score: {risk_score}/100). DO NOT PROCEED."
        ),
    };

    format!("We analyzed this code finding: {subject}. {assessment}")
}

fn recommend(verdict: Verdict, kind: DetectedType) -> String {
    match (verdict, kind) {
        (Verdict::Danger, DetectedType::Upi) => "Do NOT pay. Exit immediately.",
        (Verdict::Danger, DetectedType::Url) => "Do NOT open this link. Close it immediately.",
        (Verdict::Danger, DetectedType::Product) => "Do not purchase. Verify the vendor.",
        (Verdict::Danger, DetectedType::Text) => "Avoid interaction.",
        (Verdict::Warn | Verdict::Suspicious, DetectedType::Upi) => {
            "Verify the payee and amount before paying."
        }
        (Verdict::Warn | Verdict::Suspicious, DetectedType::Url) => {
            "Only open if you trust the source."
        }
        (Verdict::Warn | Verdict::Suspicious, DetectedType::Product) => {
            "Check the physical packaging details."
        }
        (Verdict::Warn | Verdict::Suspicious, DetectedType::Text) => "Proceed with caution.",
        (Verdict::Safe, _) => "You can proceed.",
    }
    .to_string()
}

/// Swap analyst jargon for plain words in the surfaced risk factors.
fn humanize(finding: &str) -> String {
    finding
        .replace("High-entropy domain name", "Random-looking domain name")
        .replace("Invalid Barcode Checksum", "Fake barcode number")
        .replace("Scam keyword detected", "Misleading words detected")
}
