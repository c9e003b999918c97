//! Payload classifier/parser.
//!
//! Inspects a raw (already sanitized) string and classifies it into a
//! payload kind, extracting structured fields:
//! - `upi://` prefix → UPI payment request
//! - `http` prefix, or dotted-whitespace-free non-numeric → URL
//! - 12-13 contiguous digits → product barcode
//! - anything else → free text
//!
//! `parse` is pure and total: it always returns a `ParsedPayload` and
//! never fails for well-formed string input. Malformed URIs degrade to
//! `valid: false` with an error string.

mod product;
mod upi;
mod web;

use lazy_static::lazy_static;
use regex::Regex;
use scamscan_core::DetectedType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use product::gs1_origin;

lazy_static! {
    static ref BARCODE: Regex = Regex::new(r"^\d{12,13}$").unwrap();
}

/// Structured view of a classified payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedPayload {
    #[serde(rename = "type")]
    pub kind: DetectedType,
    pub valid: bool,
    /// Kind-specific structured fields (VPA/amount for UPI, domain for
    /// URL, format/prefix/origin for Product, preview for Text).
    #[serde(rename = "data")]
    pub fields: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParsedPayload {
    pub(crate) fn invalid(kind: DetectedType, error: &str) -> Self {
        Self {
            kind,
            valid: false,
            fields: Map::new(),
            error: Some(error.to_string()),
        }
    }

    /// Convenience accessor for a string field.
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Convenience accessor for a numeric field.
    pub fn field_f64(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(Value::as_f64)
    }
}

/// Classify and parse a payload. Pure, total.
pub fn parse(payload: &str) -> ParsedPayload {
    if payload.starts_with("upi://") {
        upi::parse_upi(payload)
    } else if payload.starts_with("http") || looks_like_bare_url(payload) {
        web::parse_url(payload)
    } else if BARCODE.is_match(payload) {
        product::parse_product(payload)
    } else {
        parse_text(payload)
    }
}

/// Scheme-less URL heuristic: contains a dot, no whitespace, and is not
/// purely numeric (which would be a barcode).
fn looks_like_bare_url(payload: &str) -> bool {
    payload.contains('.')
        && !payload.chars().any(char::is_whitespace)
        && !payload.chars().all(|c| c.is_ascii_digit())
}

fn parse_text(payload: &str) -> ParsedPayload {
    let mut fields = Map::new();
    let preview: String = payload.chars().take(50).collect();
    fields.insert("preview".into(), preview.into());
    fields.insert("length".into(), payload.chars().count().into());
    ParsedPayload {
        kind: DetectedType::Text,
        valid: true,
        fields,
        error: None,
    }
}
