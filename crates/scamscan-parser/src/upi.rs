//! UPI payment URI parsing (`upi://pay?pa=...&pn=...&am=...`).

use scamscan_core::DetectedType;
use serde_json::Map;
use std::collections::HashMap;
use url::Url;

use crate::ParsedPayload;

pub(crate) fn parse_upi(payload: &str) -> ParsedPayload {
    let uri = match Url::parse(payload) {
        Ok(uri) if uri.scheme() == "upi" => uri,
        _ => return ParsedPayload::invalid(DetectedType::Upi, "Malformed UPI URI"),
    };

    let params: HashMap<String, String> = uri.query_pairs().into_owned().collect();

    let mut fields = Map::new();
    if let Some(pa) = params.get("pa") {
        fields.insert("vpa".into(), pa.as_str().into());
    }
    if let Some(pn) = params.get("pn") {
        fields.insert("payeeName".into(), pn.as_str().into());
    }
    if let Some(amount) = params.get("am").and_then(|am| am.parse::<f64>().ok()) {
        fields.insert("amount".into(), amount.into());
    }
    if let Some(tn) = params.get("tn") {
        fields.insert("transactionNote".into(), tn.as_str().into());
    }
    if let Some(mc) = params.get("mc") {
        fields.insert("merchantCode".into(), mc.as_str().into());
    }
    if let Some(tr) = params.get("tr") {
        fields.insert("transactionRef".into(), tr.as_str().into());
    }
    let currency = params.get("cu").map(String::as_str).unwrap_or("INR");
    fields.insert("currency".into(), currency.into());

    ParsedPayload {
        kind: DetectedType::Upi,
        valid: true,
        fields,
        error: None,
    }
}
