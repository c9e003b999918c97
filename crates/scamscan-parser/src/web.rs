//! URL parsing and structural field extraction.

use scamscan_core::DetectedType;
use serde_json::{Map, Value};
use url::{Host, Url};

use crate::ParsedPayload;

pub(crate) fn parse_url(payload: &str) -> ParsedPayload {
    // Normalization is parsing-only; the raw payload is never altered
    // downstream.
    let normalized = if payload.starts_with("http") {
        payload.to_string()
    } else {
        format!("http://{payload}")
    };

    let parsed = match Url::parse(&normalized) {
        Ok(parsed) => parsed,
        Err(_) => return ParsedPayload::invalid(DetectedType::Url, "Invalid URL"),
    };
    let Some(domain) = parsed.host_str() else {
        return ParsedPayload::invalid(DetectedType::Url, "Invalid URL");
    };

    let is_ip = matches!(parsed.host(), Some(Host::Ipv4(_)));
    let tld = domain.rsplit('.').next().unwrap_or("");

    let mut params = Map::new();
    for (key, value) in parsed.query_pairs() {
        params.insert(key.into_owned(), Value::from(value.into_owned()));
    }

    let mut fields = Map::new();
    fields.insert("protocol".into(), parsed.scheme().into());
    fields.insert("domain".into(), domain.into());
    fields.insert("path".into(), parsed.path().into());
    fields.insert("params".into(), Value::Object(params));
    fields.insert("isIp".into(), is_ip.into());
    fields.insert("tld".into(), tld.into());

    ParsedPayload {
        kind: DetectedType::Url,
        valid: true,
        fields,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use crate::parse;

    #[test]
    fn test_https_url_fields() {
        let parsed = parse("https://shop.example.co.in/checkout?id=42&ref=qr");
        assert!(parsed.valid);
        assert_eq!(parsed.field_str("protocol"), Some("https"));
        assert_eq!(parsed.field_str("domain"), Some("shop.example.co.in"));
        assert_eq!(parsed.field_str("path"), Some("/checkout"));
        assert_eq!(parsed.field_str("tld"), Some("in"));
        assert_eq!(parsed.fields["params"]["id"], "42");
        assert_eq!(parsed.fields["isIp"], false);
    }

    #[test]
    fn test_ip_host_detected() {
        let parsed = parse("http://192.168.1.1/login");
        assert!(parsed.valid);
        assert_eq!(parsed.fields["isIp"], true);
        assert_eq!(parsed.field_str("domain"), Some("192.168.1.1"));
    }

    #[test]
    fn test_schemeless_normalization_is_parsing_only() {
        let parsed = parse("example.com");
        assert!(parsed.valid);
        // The scheme reported is the structural default, nothing more
        assert_eq!(parsed.field_str("protocol"), Some("http"));
        assert_eq!(parsed.field_str("domain"), Some("example.com"));
    }

    #[test]
    fn test_unparseable_url() {
        let parsed = parse("http://exa mple.com");
        assert!(!parsed.valid);
        assert_eq!(parsed.error.as_deref(), Some("Invalid URL"));
    }
}
