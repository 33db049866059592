//! Core data model shared by the parser, classifier, aggregator and catalog writer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Country partition a channel entry is filed under.
///
/// The set is closed; everything the classifier cannot place lands in [`PartitionKey::Int`].
/// Declaration order is the sort order used for deterministic output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum PartitionKey {
    Ru,
    Us,
    Uk,
    De,
    Fr,
    It,
    Es,
    Ua,
    Pl,
    Tr,
    Pt,
    Nl,
    /// International / unknown
    Int,
}

impl PartitionKey {
    /// Every key, in declaration order.
    pub const ALL: [PartitionKey; 13] = [
        PartitionKey::Ru,
        PartitionKey::Us,
        PartitionKey::Uk,
        PartitionKey::De,
        PartitionKey::Fr,
        PartitionKey::It,
        PartitionKey::Es,
        PartitionKey::Ua,
        PartitionKey::Pl,
        PartitionKey::Tr,
        PartitionKey::Pt,
        PartitionKey::Nl,
        PartitionKey::Int,
    ];

    /// Upper-case code, e.g. `"RU"` or `"INT"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            PartitionKey::Ru => "RU",
            PartitionKey::Us => "US",
            PartitionKey::Uk => "UK",
            PartitionKey::De => "DE",
            PartitionKey::Fr => "FR",
            PartitionKey::It => "IT",
            PartitionKey::Es => "ES",
            PartitionKey::Ua => "UA",
            PartitionKey::Pl => "PL",
            PartitionKey::Tr => "TR",
            PartitionKey::Pt => "PT",
            PartitionKey::Nl => "NL",
            PartitionKey::Int => "INT",
        }
    }

    /// Case-insensitive lookup of a partition code. `GB` is accepted as `UK`.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        if code.eq_ignore_ascii_case("gb") {
            return Some(PartitionKey::Uk);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.as_str().eq_ignore_ascii_case(code))
    }

    /// Lower-cased code used for output file names.
    pub fn file_stem(&self) -> String {
        self.as_str().to_ascii_lowercase()
    }
}

impl Default for PartitionKey {
    fn default() -> Self {
        PartitionKey::Int
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PartitionKey> for String {
    fn from(key: PartitionKey) -> Self {
        key.as_str().to_string()
    }
}

impl TryFrom<String> for PartitionKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PartitionKey::from_code(&value).ok_or_else(|| format!("unknown partition code '{value}'"))
    }
}

/// Locator of a fetchable playlist document (normally a URL).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceLocator(String);

impl SourceLocator {
    pub fn new<S: Into<String>>(locator: S) -> Self {
        Self(locator.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceLocator {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SourceLocator {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Fetched text of one source together with the status it was served with.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub locator: SourceLocator,
    pub status: u16,
    pub body: String,
}

impl RawDocument {
    pub fn new(locator: SourceLocator, status: u16, body: impl Into<String>) -> Self {
        Self {
            locator,
            status,
            body: body.into(),
        }
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Display name used when the directive carries no trailing name.
pub const PLACEHOLDER_NAME: &str = "Unknown";

/// Group label used when `group-title` is absent.
pub const DEFAULT_GROUP: &str = "General";

/// One channel of the catalog. `stream_url` is the identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEntry {
    pub name: String,
    pub partition_key: PartitionKey,
    pub group: String,
    pub logo: String,
    pub epg_id: String,
    pub stream_url: String,
}

impl ChannelEntry {
    /// Consume the entry and file it under `key`.
    pub fn with_partition_key(mut self, key: PartitionKey) -> Self {
        self.partition_key = key;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_code_lookup() {
        assert_eq!(PartitionKey::from_code("ru"), Some(PartitionKey::Ru));
        assert_eq!(PartitionKey::from_code(" US "), Some(PartitionKey::Us));
        assert_eq!(PartitionKey::from_code("GB"), Some(PartitionKey::Uk));
        assert_eq!(PartitionKey::from_code("int"), Some(PartitionKey::Int));
        assert_eq!(PartitionKey::from_code("xx"), None);
    }

    #[test]
    fn test_partition_key_serde() {
        let json = serde_json::to_string(&PartitionKey::Uk).unwrap();
        assert_eq!(json, "\"UK\"");
        let key: PartitionKey = serde_json::from_str("\"de\"").unwrap();
        assert_eq!(key, PartitionKey::De);
        assert!(serde_json::from_str::<PartitionKey>("\"atlantis\"").is_err());
    }

    #[test]
    fn test_file_stem_is_lowercase() {
        assert_eq!(PartitionKey::Int.file_stem(), "int");
        assert_eq!(PartitionKey::Ua.file_stem(), "ua");
    }

    #[test]
    fn test_raw_document_status() {
        let locator = SourceLocator::from("http://example.com/a.m3u");
        assert!(RawDocument::new(locator.clone(), 200, "").is_success());
        assert!(RawDocument::new(locator.clone(), 204, "").is_success());
        assert!(!RawDocument::new(locator.clone(), 301, "").is_success());
        assert!(!RawDocument::new(locator, 500, "").is_success());
    }
}
