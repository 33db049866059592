use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub mod defaults;

use defaults::*;

use crate::catalog::EpgLocatorTable;
use crate::classification::{default_rules, ClassificationRule, Classifier};
use crate::errors::AppError;
use crate::models::SourceLocator;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub aggregation: AggregationConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub epg: EpgLocatorTable,
    #[serde(default)]
    pub classification: ClassificationConfig,
}

/// Web search used to find candidate playlists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    #[serde(default = "default_discovery_enabled")]
    pub enabled: bool,
    #[serde(default = "default_search_url")]
    pub search_url: String,
    #[serde(default = "default_search_query")]
    pub query: String,
    #[serde(default = "default_max_discovered_sources")]
    pub max_sources: usize,
    /// Only links on this host are kept
    #[serde(default = "default_host_filter")]
    pub host_filter: String,
    /// Only links whose path contains this are kept
    #[serde(default = "default_extension_filter")]
    pub extension_filter: String,
    #[serde(default = "default_search_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_fetch_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Extra request headers sent with every playlist fetch
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Pause between two consecutive source fetches
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    /// Upper bound of random jitter added to the pause
    #[serde(default = "default_delay_jitter_ms")]
    pub delay_jitter_ms: u64,
    /// Below this many discovered sources the fallback list is merged in
    #[serde(default = "default_min_sources")]
    pub min_sources: usize,
    #[serde(default = "default_fallback_sources")]
    pub fallback_sources: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
    #[serde(default = "default_playlists_dir")]
    pub playlists_dir: String,
    #[serde(default = "default_summary_file")]
    pub summary_file: String,
    /// Remove partition playlists left over from earlier runs
    #[serde(default = "default_prune_stale")]
    pub prune_stale: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Replaces the built-in rule list when set
    #[serde(default)]
    pub rules: Option<Vec<ClassificationRule>>,
}

fn default_discovery_enabled() -> bool {
    DEFAULT_DISCOVERY_ENABLED
}

fn default_search_url() -> String {
    DEFAULT_SEARCH_URL.to_string()
}

fn default_search_query() -> String {
    DEFAULT_SEARCH_QUERY.to_string()
}

fn default_max_discovered_sources() -> usize {
    DEFAULT_MAX_DISCOVERED_SOURCES
}

fn default_host_filter() -> String {
    DEFAULT_HOST_FILTER.to_string()
}

fn default_extension_filter() -> String {
    DEFAULT_EXTENSION_FILTER.to_string()
}

fn default_search_user_agent() -> String {
    DEFAULT_SEARCH_USER_AGENT.to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_request_delay_ms() -> u64 {
    DEFAULT_REQUEST_DELAY_MS
}

fn default_delay_jitter_ms() -> u64 {
    DEFAULT_DELAY_JITTER_MS
}

fn default_min_sources() -> usize {
    DEFAULT_MIN_SOURCES
}

fn default_fallback_sources() -> Vec<String> {
    DEFAULT_FALLBACK_SOURCES.iter().map(|s| s.to_string()).collect()
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

fn default_playlists_dir() -> String {
    DEFAULT_PLAYLISTS_DIR.to_string()
}

fn default_summary_file() -> String {
    DEFAULT_SUMMARY_FILE.to_string()
}

fn default_prune_stale() -> bool {
    DEFAULT_PRUNE_STALE
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            enabled: default_discovery_enabled(),
            search_url: default_search_url(),
            query: default_search_query(),
            max_sources: default_max_discovered_sources(),
            host_filter: default_host_filter(),
            extension_filter: default_extension_filter(),
            user_agent: default_search_user_agent(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout_secs(),
            user_agent: default_user_agent(),
            headers: BTreeMap::new(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: default_request_delay_ms(),
            delay_jitter_ms: default_delay_jitter_ms(),
            min_sources: default_min_sources(),
            fallback_sources: default_fallback_sources(),
        }
    }
}

impl AggregationConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn delay_jitter(&self) -> Duration {
        Duration::from_millis(self.delay_jitter_ms)
    }

    pub fn fallback_locators(&self) -> Vec<SourceLocator> {
        self.fallback_sources
            .iter()
            .map(|s| SourceLocator::new(s.as_str()))
            .collect()
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            playlists_dir: default_playlists_dir(),
            summary_file: default_summary_file(),
            prune_stale: default_prune_stale(),
        }
    }
}

impl ClassificationConfig {
    pub fn classifier(&self) -> Classifier {
        match &self.rules {
            Some(rules) => Classifier::new(rules.clone()),
            None => Classifier::new(default_rules()),
        }
    }
}

impl Config {
    /// Read `config_file`, falling back to defaults when it does not exist.
    pub fn load_from_file<P: AsRef<Path>>(config_file: P) -> Result<Self> {
        let path = config_file.as_ref();
        let config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            info!("Configuration loaded from: {}", path.display());
            config
        } else {
            info!(
                "Configuration file {} not found, using defaults",
                path.display()
            );
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.epg.default.trim().is_empty() {
            return Err(AppError::configuration("epg.default must not be empty"));
        }
        if self.output.playlists_dir.trim().is_empty() {
            return Err(AppError::configuration(
                "output.playlists_dir must not be empty",
            ));
        }
        if self.output.summary_file.trim().is_empty() {
            return Err(AppError::configuration(
                "output.summary_file must not be empty",
            ));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(AppError::configuration(
                "fetch.timeout_secs must be greater than zero",
            ));
        }
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
