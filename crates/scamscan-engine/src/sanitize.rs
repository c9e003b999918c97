//! Payload sanitization at the scan boundary.

use scamscan_core::EngineError;

/// Decoded QR payloads rarely exceed a couple of kilobytes; anything
/// larger is rejected before analysis.
pub const MAX_PAYLOAD_BYTES: usize = 2048;

/// Strip control characters, trim whitespace, and enforce the size
/// bound. Every payload passes through here before fingerprinting so
/// that equivalent scans share a fingerprint.
pub fn sanitize(raw: &str) -> Result<String, EngineError> {
    let cleaned: String = raw.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim().to_string();
    if cleaned.is_empty() {
        return Err(EngineError::EmptyPayload);
    }
    if cleaned.len() > MAX_PAYLOAD_BYTES {
        return Err(EngineError::PayloadTooLarge(cleaned.len(), MAX_PAYLOAD_BYTES));
    }
    Ok(cleaned)
}
