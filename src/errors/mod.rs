//! Centralized error handling for the M3U aggregator
//!
//! Errors are split by the scope they are recovered at:
//!
//! - **Source Errors**: fetch, decode and format problems of a single playlist
//!   source. The aggregator converts these into a per-source report and keeps going.
//! - **App Errors**: configuration and output persistence failures. Output
//!   failures are the only errors that stop a run.
//!
//! # Usage
//!
//! ```rust
//! use m3u_aggregator::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Err(AppError::configuration("epg.default must not be empty"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Source Results
pub type SourceResult<T> = Result<T, SourceError>;
