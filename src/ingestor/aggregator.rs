//! Sequential, paced aggregation of playlist sources.
//!
//! Every source is fetched in plan order, one at a time, with a jittered pause
//! between consecutive fetches. A source that fails in any way contributes no
//! entries and is recorded in the [`AggregationReport`]; it never aborts the run.

use std::collections::HashSet;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::dedup::Deduplicator;
use crate::classification::Classifier;
use crate::config::Config;
use crate::errors::{SourceError, SourceResult};
use crate::models::{ChannelEntry, RawDocument, SourceLocator};
use crate::sources::{m3u, parse_playlist, PlaylistFetcher};
use crate::utils::jitter::jittered_delay;
use crate::utils::UrlUtils;

/// Knobs the aggregator needs, lifted out of [`Config`].
#[derive(Debug, Clone)]
pub struct AggregatorSettings {
    pub request_delay: Duration,
    pub delay_jitter: Duration,
    pub fetch_timeout: Duration,
    pub min_sources: usize,
    pub fallback_sources: Vec<SourceLocator>,
}

impl AggregatorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            request_delay: config.aggregation.request_delay(),
            delay_jitter: config.aggregation.delay_jitter(),
            fetch_timeout: config.fetch.timeout(),
            min_sources: config.aggregation.min_sources,
            fallback_sources: config.aggregation.fallback_locators(),
        }
    }
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// What happened to one source.
#[derive(Debug)]
pub struct SourceReport {
    pub locator: SourceLocator,
    /// HTTP status, when the fetch got that far
    pub status: Option<u16>,
    /// Entries parsed from the document
    pub parsed: usize,
    /// Entries that survived deduplication
    pub added: usize,
    pub error: Option<SourceError>,
}

impl SourceReport {
    fn new(locator: SourceLocator) -> Self {
        Self {
            locator,
            status: None,
            parsed: 0,
            added: 0,
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Default)]
pub struct AggregationReport {
    pub sources: Vec<SourceReport>,
    /// Entries dropped because their stream URL was already seen
    pub duplicates: usize,
}

impl AggregationReport {
    pub fn attempted(&self) -> usize {
        self.sources.len()
    }

    pub fn succeeded(&self) -> usize {
        self.sources.iter().filter(|s| s.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }
}

/// Result of one aggregation call.
///
/// `NoData` is a normal outcome: the caller still writes an empty catalog.
#[derive(Debug)]
pub enum AggregationOutcome {
    Collected {
        entries: Vec<ChannelEntry>,
        report: AggregationReport,
    },
    NoData {
        report: AggregationReport,
    },
}

impl AggregationOutcome {
    fn from_parts(entries: Vec<ChannelEntry>, report: AggregationReport) -> Self {
        if entries.is_empty() {
            Self::NoData { report }
        } else {
            Self::Collected { entries, report }
        }
    }

    pub fn entries(&self) -> &[ChannelEntry] {
        match self {
            Self::Collected { entries, .. } => entries,
            Self::NoData { .. } => &[],
        }
    }

    pub fn report(&self) -> &AggregationReport {
        match self {
            Self::Collected { report, .. } | Self::NoData { report } => report,
        }
    }

    pub fn into_parts(self) -> (Vec<ChannelEntry>, AggregationReport) {
        match self {
            Self::Collected { entries, report } => (entries, report),
            Self::NoData { report } => (Vec::new(), report),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }
}

pub struct Aggregator<F: PlaylistFetcher> {
    fetcher: F,
    classifier: Classifier,
    settings: AggregatorSettings,
}

impl<F: PlaylistFetcher> Aggregator<F> {
    pub fn new(fetcher: F, classifier: Classifier, settings: AggregatorSettings) -> Self {
        Self {
            fetcher,
            classifier,
            settings,
        }
    }

    pub fn settings(&self) -> &AggregatorSettings {
        &self.settings
    }

    /// Order of sources to fetch.
    ///
    /// Discovered locators come first. When fewer than `min_sources` unique
    /// locators were discovered the fallback list is appended after them.
    pub fn plan_sources(&self, discovered: Vec<SourceLocator>) -> Vec<SourceLocator> {
        let mut seen = HashSet::new();
        let mut plan = Vec::new();
        push_unique(&mut plan, &mut seen, discovered);

        if plan.len() < self.settings.min_sources {
            info!(
                "Discovered {} sources (minimum {}), merging {} fallback sources",
                plan.len(),
                self.settings.min_sources,
                self.settings.fallback_sources.len()
            );
            push_unique(
                &mut plan,
                &mut seen,
                self.settings.fallback_sources.iter().cloned(),
            );
        }

        plan
    }

    /// Fetch, parse, classify and deduplicate every planned source.
    pub async fn aggregate(&self, discovered: Vec<SourceLocator>) -> AggregationOutcome {
        let plan = self.plan_sources(discovered);
        info!("Aggregating {} sources", plan.len());

        let mut dedup = Deduplicator::new();
        let mut report = AggregationReport::default();

        for (index, locator) in plan.into_iter().enumerate() {
            if index > 0 {
                let pause = jittered_delay(self.settings.request_delay, self.settings.delay_jitter);
                if !pause.is_zero() {
                    debug!("Pausing {:?} before next source", pause);
                    tokio::time::sleep(pause).await;
                }
            }

            let source_report = self.ingest_source(locator, &mut dedup).await;
            report.sources.push(source_report);
        }

        report.duplicates = dedup.duplicates();
        let entries = dedup.into_entries();
        info!(
            "Aggregation finished: {} unique entries from {}/{} sources ({} duplicates dropped)",
            entries.len(),
            report.succeeded(),
            report.attempted(),
            report.duplicates
        );

        AggregationOutcome::from_parts(entries, report)
    }

    async fn ingest_source(
        &self,
        locator: SourceLocator,
        dedup: &mut Deduplicator,
    ) -> SourceReport {
        let display_url = UrlUtils::obfuscate_credentials(locator.as_str());
        let mut report = SourceReport::new(locator);

        let document = match self.fetch_document(&report.locator).await {
            Ok(document) => document,
            Err(e) => {
                warn!("Source {} failed: {}", display_url, e);
                report.error = Some(e);
                return report;
            }
        };
        report.status = Some(document.status);

        if let Err(e) = check_document(&document) {
            warn!("Source {} skipped: {}", display_url, e);
            report.error = Some(e);
            return report;
        }

        for parsed in parse_playlist(&document.body) {
            report.parsed += 1;
            if dedup.insert(self.classifier.classify_entry(parsed)) {
                report.added += 1;
            }
        }

        info!(
            "Source {}: {} entries parsed, {} new",
            display_url, report.parsed, report.added
        );
        report
    }

    async fn fetch_document(&self, locator: &SourceLocator) -> SourceResult<RawDocument> {
        let timeout = self.settings.fetch_timeout;
        match tokio::time::timeout(timeout, self.fetcher.fetch(locator)).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout {
                url: locator.to_string(),
                timeout,
            }),
        }
    }
}

fn push_unique<I>(plan: &mut Vec<SourceLocator>, seen: &mut HashSet<String>, locators: I)
where
    I: IntoIterator<Item = SourceLocator>,
{
    for locator in locators {
        let trimmed = locator.as_str().trim();
        if trimmed.is_empty() || !seen.insert(trimmed.to_string()) {
            continue;
        }
        plan.push(SourceLocator::new(trimmed));
    }
}

fn check_document(document: &RawDocument) -> SourceResult<()> {
    if !document.is_success() {
        return Err(SourceError::Http {
            status: document.status,
            url: document.locator.to_string(),
        });
    }
    if !m3u::is_playlist(&document.body) {
        return Err(SourceError::Malformed {
            url: document.locator.to_string(),
        });
    }
    Ok(())
}
