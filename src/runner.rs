//! One end-to-end aggregation run.
//!
//! prepare output -> discover -> aggregate -> partition -> write
//!
//! Only output failures surface as errors. A run that collects nothing still
//! writes an empty catalog and a `total = 0` summary and reports
//! [`RunOutcome::Empty`].

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogSummary, CatalogWriter, PartitionedCatalog, WrittenCatalog};
use crate::config::Config;
use crate::discovery::SourceDiscovery;
use crate::errors::AppResult;
use crate::ingestor::{AggregationReport, Aggregator, AggregatorSettings};
use crate::sources::PlaylistFetcher;

#[derive(Debug)]
pub enum RunOutcome {
    /// At least one entry was written
    Completed {
        summary: CatalogSummary,
        written: WrittenCatalog,
        report: AggregationReport,
    },
    /// Nothing was collected; empty artifacts were written
    Empty {
        summary: CatalogSummary,
        written: WrittenCatalog,
        report: AggregationReport,
    },
}

impl RunOutcome {
    pub fn summary(&self) -> &CatalogSummary {
        match self {
            Self::Completed { summary, .. } | Self::Empty { summary, .. } => summary,
        }
    }

    pub fn written(&self) -> &WrittenCatalog {
        match self {
            Self::Completed { written, .. } | Self::Empty { written, .. } => written,
        }
    }

    pub fn report(&self) -> &AggregationReport {
        match self {
            Self::Completed { report, .. } | Self::Empty { report, .. } => report,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }
}

pub async fn run<D, F>(config: &Config, discovery: &D, fetcher: F) -> AppResult<RunOutcome>
where
    D: SourceDiscovery + ?Sized,
    F: PlaylistFetcher,
{
    let writer = CatalogWriter::new(config.output.clone(), config.epg.clone());
    writer.prepare()?;

    let discovered = discovery.discover().await;
    info!("Discovery produced {} candidate sources", discovered.len());

    let aggregator = Aggregator::new(
        fetcher,
        config.classification.classifier(),
        AggregatorSettings::from_config(config),
    );
    let settings = aggregator.settings();
    debug!(
        "Fetch timeout {:?}, request delay {:?} (+{:?} jitter), fallback below {} sources",
        settings.fetch_timeout, settings.request_delay, settings.delay_jitter, settings.min_sources
    );
    let outcome = aggregator.aggregate(discovered).await;
    let empty = outcome.is_empty();
    let (entries, report) = outcome.into_parts();

    let catalog = PartitionedCatalog::from_entries(entries);
    let summary = CatalogSummary::new(&catalog, report.attempted(), report.succeeded(), Utc::now());
    let written = writer.write(&catalog, &summary)?;

    if empty {
        warn!(
            "No channels collected from {} sources, wrote empty catalog",
            report.attempted()
        );
        Ok(RunOutcome::Empty {
            summary,
            written,
            report,
        })
    } else {
        info!(
            "Run complete: {} channels in {} partitions",
            summary.total, summary.partition_count
        );
        Ok(RunOutcome::Completed {
            summary,
            written,
            report,
        })
    }
}
