//! Web-search discovery
//!
//! Issues one query against an HTML search endpoint and keeps result links that
//! point at playlist files on the configured host. Result links that go through
//! a redirector carry the target in an `uddg=` parameter; those are decoded.

use std::collections::HashSet;
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use tracing::{debug, info, warn};

use super::SourceDiscovery;
use crate::config::DiscoveryConfig;
use crate::errors::AppResult;
use crate::models::SourceLocator;
use crate::utils::url::UrlUtils;

const REDIRECT_PARAM: &str = "uddg=";

pub struct SearchDiscovery {
    client: Client,
    config: DiscoveryConfig,
}

impl SearchDiscovery {
    pub fn new(config: DiscoveryConfig, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, config })
    }

    async fn search(&self) -> Result<String, reqwest::Error> {
        self.client
            .get(&self.config.search_url)
            .query(&[("q", self.config.query.as_str())])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

#[async_trait]
impl SourceDiscovery for SearchDiscovery {
    async fn discover(&self) -> Vec<SourceLocator> {
        info!("Searching for playlists: '{}'", self.config.query);

        match self.search().await {
            Ok(html) => {
                let found = extract_candidates(
                    &html,
                    &self.config.host_filter,
                    &self.config.extension_filter,
                    self.config.max_sources,
                );
                info!("Search found {} candidate sources", found.len());
                found
            }
            Err(e) => {
                warn!(
                    "Search failed: {}",
                    UrlUtils::obfuscate_credentials(&e.to_string())
                );
                Vec::new()
            }
        }
    }
}

/// Pull playlist links out of a search result page.
///
/// Keeps links whose host equals `host_filter` (any host when empty) and whose
/// path contains `extension_filter`. Query strings are stripped, duplicates
/// dropped, and at most `max_sources` returned in page order.
pub fn extract_candidates(
    html: &str,
    host_filter: &str,
    extension_filter: &str,
    max_sources: usize,
) -> Vec<SourceLocator> {
    static HREF_RE: OnceLock<Regex> = OnceLock::new();
    let re = HREF_RE.get_or_init(|| {
        Regex::new(r#"(?i)href\s*=\s*["']([^"']+)["']"#).expect("href pattern is valid")
    });

    let extension_filter = extension_filter.to_lowercase();
    let mut seen = HashSet::new();
    let mut found = Vec::new();

    for caps in re.captures_iter(html) {
        if found.len() >= max_sources {
            break;
        }

        let Some(target) = resolve_link(&caps[1]) else {
            continue;
        };
        let candidate = UrlUtils::strip_query(&target);

        if !UrlUtils::is_http_url(&candidate) {
            continue;
        }
        if !host_filter.is_empty() {
            let host_matches = UrlUtils::extract_domain(&candidate)
                .map(|host| host.eq_ignore_ascii_case(host_filter))
                .unwrap_or(false);
            if !host_matches {
                continue;
            }
        }
        if !candidate.to_lowercase().contains(&extension_filter) {
            continue;
        }

        if seen.insert(candidate.clone()) {
            debug!("Discovered source: {}", candidate);
            found.push(SourceLocator::new(candidate));
        }
    }

    found
}

fn resolve_link(href: &str) -> Option<String> {
    let href = href.replace("&amp;", "&");

    let target = match href.find(REDIRECT_PARAM) {
        Some(pos) => {
            let encoded = &href[pos + REDIRECT_PARAM.len()..];
            let encoded = encoded.split('&').next().unwrap_or(encoded);
            urlencoding::decode(encoded).ok()?.into_owned()
        }
        None => href,
    };

    if let Some(rest) = target.strip_prefix("//") {
        Some(format!("https://{rest}"))
    } else {
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = "raw.githubusercontent.com";

    #[test]
    fn test_extracts_direct_links() {
        let html = r#"
            <a href="https://raw.githubusercontent.com/a/iptv/main/ru.m3u?token=1">RU</a>
            <a href="https://raw.githubusercontent.com/a/iptv/main/README.md">readme</a>
            <a href="https://example.com/list.m3u">other host</a>
        "#;
        let found = extract_candidates(html, HOST, ".m3u", 10);
        assert_eq!(
            found,
            vec![SourceLocator::from("https://raw.githubusercontent.com/a/iptv/main/ru.m3u")]
        );
    }

    #[test]
    fn test_decodes_redirect_links() {
        let html = r#"<a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fraw.githubusercontent.com%2Fb%2Ftv%2Fmaster%2Flist.m3u8&amp;rut=abc">x</a>"#;
        let found = extract_candidates(html, HOST, ".m3u", 10);
        assert_eq!(
            found,
            vec![SourceLocator::from("https://raw.githubusercontent.com/b/tv/master/list.m3u8")]
        );
    }

    #[test]
    fn test_deduplicates_and_caps() {
        let html = r#"
            <a href="https://raw.githubusercontent.com/a/1.m3u">1</a>
            <a href="https://raw.githubusercontent.com/a/1.m3u?x=2">1 again</a>
            <a href="https://raw.githubusercontent.com/a/2.m3u">2</a>
            <a href="https://raw.githubusercontent.com/a/3.m3u">3</a>
        "#;
        let found = extract_candidates(html, HOST, ".m3u", 2);
        assert_eq!(
            found,
            vec![
                SourceLocator::from("https://raw.githubusercontent.com/a/1.m3u"),
                SourceLocator::from("https://raw.githubusercontent.com/a/2.m3u"),
            ]
        );
    }

    #[test]
    fn test_empty_host_filter_accepts_any_host() {
        let html = r#"<a href='http://example.org/tv.m3u'>tv</a>"#;
        let found = extract_candidates(html, "", ".m3u", 10);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_page_without_links() {
        assert!(extract_candidates("<html></html>", HOST, ".m3u", 10).is_empty());
    }
}
