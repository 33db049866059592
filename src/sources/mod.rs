//! Playlist sources
//!
//! - [`m3u`]: parsing one playlist document into channel entries
//! - [`traits`]: the fetch capability the aggregator is handed

pub mod m3u;
pub mod traits;

pub use m3u::{parse_playlist, ParsedEntry, FORMAT_MARKER};
pub use traits::PlaylistFetcher;
