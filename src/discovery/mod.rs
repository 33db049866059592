//! Source discovery
//!
//! Produces candidate playlist locators for a run. Discovery is best effort: a
//! failing search yields an empty list and the aggregator's fallback list takes
//! over.

pub mod search;

use async_trait::async_trait;

use crate::models::SourceLocator;

pub use search::SearchDiscovery;

#[async_trait]
pub trait SourceDiscovery: Send + Sync {
    /// Candidate locators, possibly empty. Never fails.
    async fn discover(&self) -> Vec<SourceLocator>;
}

/// Fixed list of locators (CLI `--source` values, tests).
#[derive(Debug, Clone, Default)]
pub struct StaticDiscovery {
    locators: Vec<SourceLocator>,
}

impl StaticDiscovery {
    pub fn new<I, S>(locators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SourceLocator>,
    {
        Self {
            locators: locators.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl SourceDiscovery for StaticDiscovery {
    async fn discover(&self) -> Vec<SourceLocator> {
        self.locators.clone()
    }
}

/// Concatenates the results of several discoveries in order.
#[derive(Default)]
pub struct CompositeDiscovery {
    discoveries: Vec<Box<dyn SourceDiscovery>>,
}

impl CompositeDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<D: SourceDiscovery + 'static>(mut self, discovery: D) -> Self {
        self.discoveries.push(Box::new(discovery));
        self
    }
}

#[async_trait]
impl SourceDiscovery for CompositeDiscovery {
    async fn discover(&self) -> Vec<SourceLocator> {
        let mut locators = Vec::new();
        for discovery in &self.discoveries {
            locators.extend(discovery.discover().await);
        }
        locators
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_discovery_returns_its_list() {
        let discovery = StaticDiscovery::new(["http://a/1.m3u", "http://a/2.m3u"]);
        let found = discovery.discover().await;
        assert_eq!(
            found,
            vec![
                SourceLocator::from("http://a/1.m3u"),
                SourceLocator::from("http://a/2.m3u")
            ]
        );
    }

    #[tokio::test]
    async fn test_composite_discovery_keeps_order() {
        let discovery = CompositeDiscovery::new()
            .with(StaticDiscovery::new(["http://first/1.m3u"]))
            .with(StaticDiscovery::default())
            .with(StaticDiscovery::new(["http://second/1.m3u"]));
        let found = discovery.discover().await;
        assert_eq!(
            found,
            vec![
                SourceLocator::from("http://first/1.m3u"),
                SourceLocator::from("http://second/1.m3u")
            ]
        );
    }
}
