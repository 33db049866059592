//! Partition to EPG feed mapping attached to every generated playlist header.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::defaults::{DEFAULT_EPG_PARTITION_URLS, DEFAULT_EPG_URL};
use crate::models::PartitionKey;

/// Static EPG locator table. `default` covers [`PartitionKey::Int`] and every
/// partition without its own entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpgLocatorTable {
    #[serde(default = "default_epg_url")]
    pub default: String,
    #[serde(default = "default_partition_urls")]
    pub partitions: BTreeMap<PartitionKey, String>,
}

fn default_epg_url() -> String {
    DEFAULT_EPG_URL.to_string()
}

fn default_partition_urls() -> BTreeMap<PartitionKey, String> {
    DEFAULT_EPG_PARTITION_URLS
        .iter()
        .filter_map(|(code, url)| PartitionKey::from_code(code).map(|key| (key, url.to_string())))
        .collect()
}

impl Default for EpgLocatorTable {
    fn default() -> Self {
        Self {
            default: default_epg_url(),
            partitions: default_partition_urls(),
        }
    }
}

impl EpgLocatorTable {
    pub fn new<S: Into<String>>(default: S) -> Self {
        Self {
            default: default.into(),
            partitions: BTreeMap::new(),
        }
    }

    pub fn with_partition<S: Into<String>>(mut self, key: PartitionKey, locator: S) -> Self {
        self.partitions.insert(key, locator.into());
        self
    }

    pub fn locator_for(&self, key: PartitionKey) -> &str {
        self.partitions
            .get(&key)
            .map(String::as_str)
            .filter(|locator| !locator.trim().is_empty())
            .unwrap_or(&self.default)
    }
}
