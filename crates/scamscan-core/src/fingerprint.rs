//! Payload fingerprinting.
//!
//! A deterministic blake3 hash of the sanitized payload. Stable,
//! non-reversible join key for behavior lookups and audit correlation;
//! not an ownership key.

/// Hex fingerprint of a sanitized payload.
pub fn fingerprint(payload: &str) -> String {
    blake3::hash(payload.as_bytes()).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_stable() {
        let a = fingerprint("upi://pay?pa=shop@bank");
        let b = fingerprint("upi://pay?pa=shop@bank");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_fingerprint_differs_per_payload() {
        assert_ne!(fingerprint("https://a.example"), fingerprint("https://b.example"));
    }
}
