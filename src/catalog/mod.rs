//! Partitioned catalog
//!
//! Groups the deduplicated entries by partition key, renders one playlist per
//! partition ([`generator`]), persists them ([`writer`]) and builds the run
//! summary handed to the presentation layer.

pub mod epg;
pub mod generator;
pub mod writer;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{ChannelEntry, PartitionKey};

pub use epg::EpgLocatorTable;
pub use generator::render_partition;
pub use writer::{CatalogWriter, WrittenCatalog};

/// Unique entries grouped by partition key.
///
/// Within a partition entries keep the order they were handed in; partitions
/// iterate in [`PartitionKey`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionedCatalog {
    partitions: BTreeMap<PartitionKey, Vec<ChannelEntry>>,
}

impl PartitionedCatalog {
    /// Group already-deduplicated entries.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = ChannelEntry>,
    {
        let mut partitions: BTreeMap<PartitionKey, Vec<ChannelEntry>> = BTreeMap::new();
        for entry in entries {
            partitions.entry(entry.partition_key).or_default().push(entry);
        }
        Self { partitions }
    }

    pub fn get(&self, key: PartitionKey) -> Option<&[ChannelEntry]> {
        self.partitions.get(&key).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PartitionKey, &[ChannelEntry])> {
        self.partitions
            .iter()
            .map(|(key, entries)| (*key, entries.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = PartitionKey> + '_ {
        self.partitions.keys().copied()
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    pub fn total(&self) -> usize {
        self.partitions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// Distinct group labels across all partitions.
    pub fn distinct_groups(&self) -> BTreeSet<String> {
        self.partitions
            .values()
            .flatten()
            .map(|entry| entry.group.clone())
            .collect()
    }
}

/// Per-partition part of the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionSummary {
    pub count: usize,
    pub groups: BTreeSet<String>,
    /// File name of the partition playlist, relative to the playlists directory
    pub playlist: String,
}

/// Machine-readable run summary. Always written, even for an empty run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub total: usize,
    pub partition_count: usize,
    pub partitions: BTreeMap<PartitionKey, PartitionSummary>,
    pub groups: BTreeSet<String>,
    pub sources_attempted: usize,
    pub sources_succeeded: usize,
    pub generated_at: DateTime<Utc>,
}

impl CatalogSummary {
    pub fn new(
        catalog: &PartitionedCatalog,
        sources_attempted: usize,
        sources_succeeded: usize,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let partitions = catalog
            .iter()
            .map(|(key, entries)| {
                let summary = PartitionSummary {
                    count: entries.len(),
                    groups: entries.iter().map(|e| e.group.clone()).collect(),
                    playlist: playlist_file_name(key),
                };
                (key, summary)
            })
            .collect();

        Self {
            total: catalog.total(),
            partition_count: catalog.partition_count(),
            partitions,
            groups: catalog.distinct_groups(),
            sources_attempted,
            sources_succeeded,
            generated_at,
        }
    }
}

/// `us.m3u`, `int.m3u`, ...
pub fn playlist_file_name(key: PartitionKey) -> String {
    format!("{}.m3u", key.file_stem())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, key: PartitionKey, group: &str, url: &str) -> ChannelEntry {
        ChannelEntry {
            name: name.to_string(),
            partition_key: key,
            group: group.to_string(),
            logo: String::new(),
            epg_id: String::new(),
            stream_url: url.to_string(),
        }
    }

    #[test]
    fn test_grouping_preserves_first_seen_order() {
        let catalog = PartitionedCatalog::from_entries(vec![
            entry("b", PartitionKey::Us, "News", "http://x/b"),
            entry("z", PartitionKey::Int, "General", "http://x/z"),
            entry("a", PartitionKey::Us, "Sports", "http://x/a"),
        ]);

        let us: Vec<&str> = catalog
            .get(PartitionKey::Us)
            .unwrap()
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(us, vec!["b", "a"]);
        assert_eq!(catalog.total(), 3);
        assert_eq!(catalog.partition_count(), 2);
        assert_eq!(
            catalog.keys().collect::<Vec<_>>(),
            vec![PartitionKey::Us, PartitionKey::Int]
        );
    }

    #[test]
    fn test_summary_counts_and_groups() {
        let catalog = PartitionedCatalog::from_entries(vec![
            entry("a", PartitionKey::Ru, "News", "http://x/a"),
            entry("b", PartitionKey::Ru, "News", "http://x/b"),
            entry("c", PartitionKey::Fr, "Kids", "http://x/c"),
        ]);
        let summary = CatalogSummary::new(&catalog, 4, 3, Utc::now());

        assert_eq!(summary.total, 3);
        assert_eq!(summary.partition_count, 2);
        assert_eq!(summary.partitions[&PartitionKey::Ru].count, 2);
        assert_eq!(summary.partitions[&PartitionKey::Ru].playlist, "ru.m3u");
        assert_eq!(
            summary.groups.iter().cloned().collect::<Vec<_>>(),
            vec!["Kids".to_string(), "News".to_string()]
        );
        assert_eq!(summary.sources_attempted, 4);
    }

    #[test]
    fn test_empty_catalog_summary() {
        let catalog = PartitionedCatalog::default();
        let summary = CatalogSummary::new(&catalog, 0, 0, Utc::now());
        assert!(catalog.is_empty());
        assert_eq!(summary.total, 0);
        assert!(summary.partitions.is_empty());
        assert!(summary.groups.is_empty());
    }

    #[test]
    fn test_summary_json_uses_partition_codes() {
        let catalog = PartitionedCatalog::from_entries(vec![entry(
            "a",
            PartitionKey::Uk,
            "News",
            "http://x/a",
        )]);
        let summary = CatalogSummary::new(&catalog, 1, 1, Utc::now());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["partitions"]["UK"]["count"], 1);
        assert_eq!(json["total"], 1);

        let back: CatalogSummary = serde_json::from_value(json).unwrap();
        assert_eq!(back, summary);
    }
}
