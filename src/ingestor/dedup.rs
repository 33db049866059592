//! Global deduplication keyed on stream URL, first seen wins.

use std::collections::HashSet;

use crate::models::ChannelEntry;

/// Accumulates unique entries for one aggregation run.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
    entries: Vec<ChannelEntry>,
    duplicates: usize,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `entry` unless its stream URL was already seen. Returns whether it was kept.
    pub fn insert(&mut self, entry: ChannelEntry) -> bool {
        if self.seen.contains(&entry.stream_url) {
            self.duplicates += 1;
            return false;
        }
        self.seen.insert(entry.stream_url.clone());
        self.entries.push(entry);
        true
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn into_entries(self) -> Vec<ChannelEntry> {
        self.entries
    }
}

/// Deduplicate a sequence of entries in order.
pub fn dedup_entries<I>(entries: I) -> Vec<ChannelEntry>
where
    I: IntoIterator<Item = ChannelEntry>,
{
    let mut dedup = Deduplicator::new();
    for entry in entries {
        dedup.insert(entry);
    }
    dedup.into_entries()
}
