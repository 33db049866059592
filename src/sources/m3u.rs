//! M3U playlist parser
//!
//! Turns the text of one playlist document into channel entries with a single
//! forward scan. The scan keeps at most one pending `#EXTINF` directive; the next
//! HTTP(S) line completes it. Everything else is skipped:
//!
//! - documents without the `#EXTM3U` marker yield nothing
//! - stream lines with no pending directive are dropped
//! - a directive that is replaced by another directive, or never followed by a
//!   stream line, is dropped
//!
//! Attribute extraction is table driven (see [`FIELD_TABLE`]) so adding a field is
//! a one-line change.

use std::collections::HashMap;
use std::str::Lines;
use std::sync::OnceLock;

use regex::Regex;
use tracing::trace;

use crate::models::{ChannelEntry, PartitionKey, DEFAULT_GROUP, PLACEHOLDER_NAME};

/// Marker a document must contain somewhere to be treated as a playlist.
pub const FORMAT_MARKER: &str = "#EXTM3U";

/// Metadata directive prefix.
pub const DIRECTIVE_PREFIX: &str = "#EXTINF:";

/// Entry field an attribute is copied into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    EpgId,
    Logo,
    Group,
}

/// One row of the attribute extraction table.
#[derive(Debug, Clone, Copy)]
pub struct FieldExtraction {
    pub attribute: &'static str,
    pub field: EntryField,
    pub default: &'static str,
}

/// Attributes lifted from a directive into [`ChannelEntry`] fields.
///
/// Empty values count as absent and fall back to the default.
pub const FIELD_TABLE: &[FieldExtraction] = &[
    FieldExtraction {
        attribute: "tvg-id",
        field: EntryField::EpgId,
        default: "",
    },
    FieldExtraction {
        attribute: "tvg-logo",
        field: EntryField::Logo,
        default: "",
    },
    FieldExtraction {
        attribute: "group-title",
        field: EntryField::Group,
        default: DEFAULT_GROUP,
    },
];

/// An entry fresh out of the parser together with the directive line it came from.
///
/// The directive is kept for the classifier, which looks at the whole line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    pub directive: String,
    pub entry: ChannelEntry,
}

/// Whether `text` carries the playlist format marker.
pub fn is_playlist(text: &str) -> bool {
    text.contains(FORMAT_MARKER)
}

/// Lazily parse a playlist document.
///
/// Returns an empty iterator for text without [`FORMAT_MARKER`].
pub fn parse_playlist(text: &str) -> M3uEntries<'_> {
    let body = if is_playlist(text) { text } else { "" };
    M3uEntries {
        lines: body.lines(),
        pending: None,
    }
}

/// Single-pass iterator over the entries of one document.
pub struct M3uEntries<'a> {
    lines: Lines<'a>,
    pending: Option<PendingEntry>,
}

struct PendingEntry {
    directive: String,
    name: String,
    attributes: HashMap<String, String>,
}

impl Iterator for M3uEntries<'_> {
    type Item = ParsedEntry;

    fn next(&mut self) -> Option<Self::Item> {
        for raw_line in self.lines.by_ref() {
            let line = raw_line.trim();

            if starts_with_ignore_case(line, DIRECTIVE_PREFIX) {
                if let Some(dropped) = self.pending.replace(parse_directive(line)) {
                    trace!("Dropping directive without stream line: {}", dropped.directive);
                }
            } else if has_http_scheme(line) {
                match self.pending.take() {
                    Some(pending) => return Some(pending.finish(line)),
                    None => trace!("Dropping orphan stream line: {}", line),
                }
            }
        }

        if let Some(dropped) = self.pending.take() {
            trace!("Dropping trailing directive: {}", dropped.directive);
        }
        None
    }
}

impl PendingEntry {
    fn finish(self, stream_url: &str) -> ParsedEntry {
        let mut entry = ChannelEntry {
            name: self.name,
            partition_key: PartitionKey::Int,
            group: String::new(),
            logo: String::new(),
            epg_id: String::new(),
            stream_url: stream_url.to_string(),
        };

        for extraction in FIELD_TABLE {
            let value = self
                .attributes
                .get(extraction.attribute)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .unwrap_or(extraction.default)
                .to_string();
            match extraction.field {
                EntryField::EpgId => entry.epg_id = value,
                EntryField::Logo => entry.logo = value,
                EntryField::Group => entry.group = value,
            }
        }

        ParsedEntry {
            directive: self.directive,
            entry,
        }
    }
}

fn parse_directive(line: &str) -> PendingEntry {
    // #EXTINF:-1 tvg-id="..." tvg-logo="..." group-title="...",Channel Name
    let payload = &line[DIRECTIVE_PREFIX.len()..];

    let (attributes_part, name) = match name_separator(payload) {
        Some(comma_pos) => (&payload[..comma_pos], payload[comma_pos + 1..].trim()),
        None => (payload, ""),
    };
    let name = if name.is_empty() {
        PLACEHOLDER_NAME
    } else {
        name
    };

    PendingEntry {
        directive: line.to_string(),
        name: name.to_string(),
        attributes: parse_attributes(attributes_part),
    }
}

/// Byte offset of the last comma outside a quoted attribute value.
fn name_separator(payload: &str) -> Option<usize> {
    let mut in_quotes = false;
    let mut separator = None;
    for (pos, c) in payload.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => separator = Some(pos),
            _ => {}
        }
    }
    separator
}

/// Extract `key="value"` pairs. Keys are lower-cased; the first occurrence of a key wins.
pub fn parse_attributes(text: &str) -> HashMap<String, String> {
    static ATTRIBUTE_RE: OnceLock<Regex> = OnceLock::new();
    let re = ATTRIBUTE_RE.get_or_init(|| {
        Regex::new(r#"([A-Za-z0-9_-]+)\s*=\s*"([^"]*)""#).expect("attribute pattern is valid")
    });

    let mut attributes = HashMap::new();
    for caps in re.captures_iter(text) {
        attributes
            .entry(caps[1].to_ascii_lowercase())
            .or_insert_with(|| caps[2].to_string());
    }
    attributes
}

/// Whether `line` starts with an `http://` or `https://` scheme (any case).
pub fn has_http_scheme(line: &str) -> bool {
    starts_with_ignore_case(line, "http://") || starts_with_ignore_case(line, "https://")
}

fn starts_with_ignore_case(line: &str, prefix: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.len() >= prefix.len() && bytes[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}
