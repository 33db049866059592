//! HTTP implementation of the playlist fetch capability

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::Client;
use tracing::debug;

use crate::config::FetchConfig;
use crate::errors::{AppError, AppResult, SourceError, SourceResult};
use crate::models::{RawDocument, SourceLocator};
use crate::sources::PlaylistFetcher;
use crate::utils::url::UrlUtils;

/// Playlist fetcher backed by reqwest
///
/// Sends the configured user agent and headers with every request, bounds each
/// request by the configured timeout, and transparently decodes gzip bodies.
pub struct HttpPlaylistFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpPlaylistFetcher {
    pub fn new(config: &FetchConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(build_headers(config)?)
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            timeout: config.timeout(),
        })
    }

    fn map_send_error(&self, url: &str, e: reqwest::Error) -> SourceError {
        if e.is_timeout() {
            SourceError::Timeout {
                url: UrlUtils::obfuscate_credentials(url),
                timeout: self.timeout,
            }
        } else {
            SourceError::Transport {
                url: UrlUtils::obfuscate_credentials(url),
                message: UrlUtils::obfuscate_credentials(&e.to_string()),
            }
        }
    }
}

fn build_headers(config: &FetchConfig) -> AppResult<HeaderMap> {
    let mut headers = HeaderMap::new();

    let user_agent = HeaderValue::from_str(&config.user_agent).map_err(|e| {
        AppError::configuration(format!("Invalid user agent '{}': {e}", config.user_agent))
    })?;
    headers.insert(USER_AGENT, user_agent);

    for (name, value) in &config.headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| AppError::configuration(format!("Invalid header name '{name}': {e}")))?;
        let header_value = HeaderValue::from_str(value).map_err(|e| {
            AppError::configuration(format!("Invalid value for header '{name}': {e}"))
        })?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}

#[async_trait]
impl PlaylistFetcher for HttpPlaylistFetcher {
    async fn fetch(&self, locator: &SourceLocator) -> SourceResult<RawDocument> {
        let url = locator.as_str();
        debug!("Fetching playlist from: {}", UrlUtils::obfuscate_credentials(url));

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_send_error(url, e))?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.map_send_error(url, e))?;

        debug!("Fetched {} bytes with status {}", bytes.len(), status);

        let body = decode_body(url, &bytes)?;
        Ok(RawDocument::new(locator.clone(), status, body))
    }
}

/// Playlists must be UTF-8; anything else fails the source.
fn decode_body(url: &str, bytes: &[u8]) -> SourceResult<String> {
    String::from_utf8(bytes.to_vec()).map_err(|e| SourceError::Decode {
        url: UrlUtils::obfuscate_credentials(url),
        message: e.to_string(),
    })
}
