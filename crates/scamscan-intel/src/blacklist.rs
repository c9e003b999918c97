//! Blacklist pattern store.
//!
//! Patterns are regexes or exact payloads keyed by what they target
//! (domain, UPI handle, keyword, whole payload). The Intelligence layer
//! asks the store for every entry matching a given text.

use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternType {
    Domain,
    Upi,
    Keyword,
    ExactPayload,
}

/// Severity a match contributes; the Intelligence layer weights its
/// risk contribution by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlacklistSeverity {
    Warn,
    Danger,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlacklistEntry {
    /// Regex source, or the exact payload for `ExactPayload` entries
    pub pattern: String,
    pub pattern_type: PatternType,
    pub severity: BlacklistSeverity,
    /// e.g. "Phishing", "Malware", "FakePayment"
    pub category: String,
    pub source: String,
}

impl BlacklistEntry {
    pub fn new(
        pattern: impl Into<String>,
        pattern_type: PatternType,
        severity: BlacklistSeverity,
        category: impl Into<String>,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            pattern_type,
            severity,
            category: category.into(),
            source: "System Internal".to_string(),
        }
    }
}

#[async_trait]
pub trait BlacklistStore: Send + Sync {
    /// All entries matching the given text.
    async fn find_matches(&self, text: &str) -> Result<Vec<BlacklistEntry>, StoreError>;
}

/// In-memory reference store. Built once at startup; read-mostly after.
#[derive(Default)]
pub struct MemoryBlacklist {
    compiled: Vec<(Option<Regex>, BlacklistEntry)>,
}

impl MemoryBlacklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeded with known URL shorteners and domain-keyword phishing
    /// patterns.
    pub fn with_defaults() -> Self {
        let mut store = Self::new();
        let defaults = [
            ("bit\\.ly", PatternType::Domain, BlacklistSeverity::Warn, "Shortener"),
            ("tinyurl\\.com", PatternType::Domain, BlacklistSeverity::Warn, "Shortener"),
            ("goo\\.gl", PatternType::Domain, BlacklistSeverity::Warn, "Shortener"),
            ("free-gift", PatternType::Domain, BlacklistSeverity::Danger, "Phishing"),
            ("lottery-win", PatternType::Domain, BlacklistSeverity::Danger, "Phishing"),
            ("bank-verify", PatternType::Domain, BlacklistSeverity::Danger, "Phishing"),
            ("secure-login-update", PatternType::Domain, BlacklistSeverity::Danger, "Phishing"),
        ];
        for (pattern, pattern_type, severity, category) in defaults {
            // Seed patterns are static and known-good
            store
                .insert(BlacklistEntry::new(pattern, pattern_type, severity, category))
                .expect("seed pattern compiles");
        }
        store
    }

    /// Compile and add a pattern. `ExactPayload` entries skip regex
    /// compilation and match by equality.
    pub fn insert(&mut self, entry: BlacklistEntry) -> Result<(), StoreError> {
        let regex = if entry.pattern_type == PatternType::ExactPayload {
            None
        } else {
            let compiled = RegexBuilder::new(&entry.pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| StoreError::Pattern(e.to_string()))?;
            Some(compiled)
        };
        self.compiled.push((regex, entry));
        Ok(())
    }
}

#[async_trait]
impl BlacklistStore for MemoryBlacklist {
    async fn find_matches(&self, text: &str) -> Result<Vec<BlacklistEntry>, StoreError> {
        let mut matches = Vec::new();
        for (regex, entry) in &self.compiled {
            let hit = match regex {
                Some(regex) => regex.is_match(text),
                None => text == entry.pattern,
            };
            if hit {
                matches.push(entry.clone());
            }
        }
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_shorteners_match() {
        let store = MemoryBlacklist::with_defaults();
        let matches = store.find_matches("https://bit.ly/3xYz").await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].severity, BlacklistSeverity::Warn);
        assert_eq!(matches[0].category, "Shortener");
    }

    #[tokio::test]
    async fn test_phishing_keyword_is_danger() {
        let store = MemoryBlacklist::with_defaults();
        let matches = store
            .find_matches("http://bank-verify.example.com")
            .await
            .unwrap();
        assert!(matches
            .iter()
            .any(|m| m.severity == BlacklistSeverity::Danger));
    }

    #[tokio::test]
    async fn test_exact_payload_match() {
        let mut store = MemoryBlacklist::new();
        store
            .insert(BlacklistEntry::new(
                "upi://pay?pa=known-scam@fake",
                PatternType::ExactPayload,
                BlacklistSeverity::Danger,
                "FakePayment",
            ))
            .unwrap();
        let hit = store.find_matches("upi://pay?pa=known-scam@fake").await.unwrap();
        assert_eq!(hit.len(), 1);
        let miss = store.find_matches("upi://pay?pa=other@bank").await.unwrap();
        assert!(miss.is_empty());
    }

    #[test]
    fn test_bad_pattern_rejected() {
        let mut store = MemoryBlacklist::new();
        let err = store.insert(BlacklistEntry::new(
            "([unclosed",
            PatternType::Keyword,
            BlacklistSeverity::Warn,
            "General",
        ));
        assert!(matches!(err, Err(StoreError::Pattern(_))));
    }
}
