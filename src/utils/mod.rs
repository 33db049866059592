//! Utility modules shared across the aggregator

pub mod http_client;
pub mod jitter;
pub mod url;

pub use http_client::HttpPlaylistFetcher;
pub use url::UrlUtils;
