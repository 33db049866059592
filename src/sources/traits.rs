//! Source fetch abstraction
//!
//! The aggregator only knows how to ask for a document by locator. HTTP is one
//! implementation ([`crate::utils::http_client::HttpPlaylistFetcher`]); tests use
//! in-memory fetchers.

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::SourceResult;
use crate::models::{RawDocument, SourceLocator};

/// Fetch capability: locator in, raw document (or failure) out.
///
/// Implementations return `Ok` for any completed exchange, including non-success
/// statuses, and reserve `Err` for transport, timeout and decode failures.
#[async_trait]
pub trait PlaylistFetcher: Send + Sync {
    async fn fetch(&self, locator: &SourceLocator) -> SourceResult<RawDocument>;
}

#[async_trait]
impl<T: PlaylistFetcher + ?Sized> PlaylistFetcher for Arc<T> {
    async fn fetch(&self, locator: &SourceLocator) -> SourceResult<RawDocument> {
        (**self).fetch(locator).await
    }
}

#[async_trait]
impl<T: PlaylistFetcher + ?Sized> PlaylistFetcher for Box<T> {
    async fn fetch(&self, locator: &SourceLocator) -> SourceResult<RawDocument> {
        (**self).fetch(locator).await
    }
}
