//! Product barcode structuring: UPC-A / EAN-13 format and GS1 origin.

use scamscan_core::DetectedType;
use serde_json::Map;

use crate::ParsedPayload;

/// Country/organization of issuance for a 3-digit GS1 prefix.
pub fn gs1_origin(prefix: u32) -> &'static str {
    match prefix {
        0..=19 => "USA/Canada",
        30..=39 => "USA (Drugs)",
        400..=440 => "Germany",
        450..=459 | 490..=499 => "Japan",
        500..=509 => "United Kingdom",
        690..=699 => "China",
        890..=899 => "India",
        _ => "Unknown",
    }
}

/// `payload` is guaranteed 12-13 ASCII digits by the dispatcher.
pub(crate) fn parse_product(payload: &str) -> ParsedPayload {
    let format = if payload.len() == 12 { "UPC-A" } else { "EAN-13" };
    let prefix = &payload[..3];
    let origin = prefix
        .parse::<u32>()
        .map(gs1_origin)
        .unwrap_or("Unknown");

    let mut fields = Map::new();
    fields.insert("format".into(), format.into());
    fields.insert("prefix".into(), prefix.into());
    fields.insert("origin".into(), origin.into());

    ParsedPayload {
        kind: DetectedType::Product,
        valid: true,
        fields,
        error: None,
    }
}
