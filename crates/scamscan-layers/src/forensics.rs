//! Forensics layer: structural anomalies in the raw payload.
//!
//! Control characters are stripped upstream, so this layer looks for
//! what sanitization leaves behind: length extremes, dense URL
//! encoding, mixed-script homoglyphs, and invisible formatting
//! characters.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scamscan_core::{Layer, LayerContext, LayerError, LayerKind, LayerResult};

static PERCENT_ESCAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"%[0-9a-fA-F]{2}").unwrap());

const LONG_PAYLOAD_BYTES: usize = 1500;

pub struct ForensicsLayer;

#[async_trait]
impl Layer for ForensicsLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::Forensics
    }

    async fn analyze(&self, payload: &str, _ctx: &LayerContext) -> Result<LayerResult, LayerError> {
        let mut result = LayerResult::new();

        if payload.len() >= LONG_PAYLOAD_BYTES {
            result.add(10, format!("Unusually long payload ({} bytes)", payload.len()));
        }

        let escapes = PERCENT_ESCAPE.find_iter(payload).count();
        if escapes >= 3 {
            result.add(15, format!("Dense URL encoding ({escapes} escape sequences)"));
        }

        if has_mixed_script(payload) {
            result.add(25, "Mixed-script characters (possible homoglyph attack)");
        }

        if payload.chars().any(is_invisible) {
            result.add(20, "Invisible formatting characters detected");
        }

        Ok(result)
    }
}

/// Latin mixed with Cyrillic or Greek, the classic homoglyph setup.
fn has_mixed_script(text: &str) -> bool {
    let has_latin = text.chars().any(|c| c.is_ascii_alphabetic());
    let has_cyrillic = text.chars().any(|c| ('\u{0400}'..='\u{04FF}').contains(&c));
    let has_greek = text.chars().any(|c| ('\u{0370}'..='\u{03FF}').contains(&c));
    has_latin && (has_cyrillic || has_greek)
}

/// Zero-width and bidi override characters survive control-char
/// stripping and are a staple of URL spoofing.
fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{200B}'..='\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}' | '\u{FEFF}'
    )
}
