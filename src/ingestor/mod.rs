//! Ingestion: fetching every source, parsing, classifying and merging the
//! results into one deduplicated entry list.

pub mod aggregator;
pub mod dedup;

pub use aggregator::{
    AggregationOutcome, AggregationReport, Aggregator, AggregatorSettings, SourceReport,
};
pub use dedup::{dedup_entries, Deduplicator};
