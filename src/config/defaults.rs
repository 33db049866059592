//! Configuration default values
//!
//! All default values for configuration options live here so they can be
//! changed in one place.

// Discovery defaults
pub const DEFAULT_DISCOVERY_ENABLED: bool = true;
pub const DEFAULT_SEARCH_URL: &str = "https://html.duckduckgo.com/html/";
pub const DEFAULT_SEARCH_QUERY: &str = "site:raw.githubusercontent.com iptv m3u";
pub const DEFAULT_MAX_DISCOVERED_SOURCES: usize = 30;
pub const DEFAULT_HOST_FILTER: &str = "raw.githubusercontent.com";
pub const DEFAULT_EXTENSION_FILTER: &str = ".m3u";

// Fetch defaults
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_USER_AGENT: &str = "VLC/3.0";
pub const DEFAULT_SEARCH_USER_AGENT: &str = "Mozilla/5.0";

// Aggregation defaults
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 1000;
pub const DEFAULT_DELAY_JITTER_MS: u64 = 250;
pub const DEFAULT_MIN_SOURCES: usize = 5;
pub const DEFAULT_FALLBACK_SOURCES: &[&str] = &[
    "https://iptv-org.github.io/iptv/countries/ru.m3u",
    "https://iptv-org.github.io/iptv/countries/us.m3u",
    "https://iptv-org.github.io/iptv/countries/uk.m3u",
    "https://iptv-org.github.io/iptv/countries/de.m3u",
    "https://iptv-org.github.io/iptv/countries/fr.m3u",
    "https://iptv-org.github.io/iptv/countries/it.m3u",
    "https://iptv-org.github.io/iptv/countries/es.m3u",
    "https://iptv-org.github.io/iptv/countries/ua.m3u",
    "https://iptv-org.github.io/iptv/countries/pl.m3u",
    "https://raw.githubusercontent.com/Free-TV/IPTV/master/playlist.m3u8",
];

// Output defaults
pub const DEFAULT_OUTPUT_PATH: &str = "./public";
pub const DEFAULT_PLAYLISTS_DIR: &str = "playlists";
pub const DEFAULT_SUMMARY_FILE: &str = "metadata.json";
pub const DEFAULT_PRUNE_STALE: bool = true;

// EPG defaults
pub const DEFAULT_EPG_URL: &str = "https://epgshare01.online/epgshare01/epg_ripper_ALL_SOURCES1.xml.gz";
pub const DEFAULT_EPG_PARTITION_URLS: &[(&str, &str)] = &[
    ("RU", "http://epg.it999.ru/edem.xml.gz"),
    ("US", "https://epgshare01.online/epgshare01/epg_ripper_US1.xml.gz"),
    ("UK", "https://epgshare01.online/epgshare01/epg_ripper_UK1.xml.gz"),
    ("DE", "https://epgshare01.online/epgshare01/epg_ripper_DE1.xml.gz"),
    ("FR", "https://epgshare01.online/epgshare01/epg_ripper_FR1.xml.gz"),
];
