//! M3U aggregator
//!
//! Collects public M3U playlists, classifies every channel by country,
//! removes duplicate streams and writes one playlist per country together with
//! a JSON summary.

pub mod catalog;
pub mod classification;
pub mod config;
pub mod discovery;
pub mod errors;
pub mod ingestor;
pub mod models;
pub mod runner;
pub mod sources;
pub mod utils;

pub use runner::{run, RunOutcome};
