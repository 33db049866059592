//! Playlist serialization for one partition.
//!
//! Output is byte-for-byte reproducible for the same entries: the header carries
//! the partition's EPG locator, and each entry is rendered as a directive with
//! attributes in fixed order (id, name, logo, group) followed by its stream line.

use std::fmt::Write;

use crate::catalog::EpgLocatorTable;
use crate::models::{ChannelEntry, PartitionKey};
use crate::sources::FORMAT_MARKER;

/// Header attribute naming the EPG feed.
pub const EPG_HEADER_ATTRIBUTE: &str = "x-tvg-url";

/// Render a complete playlist document for `key`.
pub fn render_partition(
    key: PartitionKey,
    entries: &[ChannelEntry],
    epg: &EpgLocatorTable,
) -> String {
    let mut m3u = render_header(epg.locator_for(key));

    for entry in entries {
        m3u.push_str(&render_directive(entry));
        m3u.push('\n');
        m3u.push_str(&entry.stream_url);
        m3u.push('\n');
    }

    m3u
}

pub fn render_header(epg_locator: &str) -> String {
    format!(
        "{FORMAT_MARKER} {EPG_HEADER_ATTRIBUTE}=\"{}\"\n",
        attribute_value(epg_locator)
    )
}

/// `#EXTINF` line for one entry, without trailing newline.
pub fn render_directive(entry: &ChannelEntry) -> String {
    let mut extinf = String::from("#EXTINF:-1");

    if !entry.epg_id.is_empty() {
        let _ = write!(extinf, " tvg-id=\"{}\"", attribute_value(&entry.epg_id));
    }

    let _ = write!(extinf, " tvg-name=\"{}\"", attribute_value(&entry.name));

    if !entry.logo.is_empty() {
        let _ = write!(extinf, " tvg-logo=\"{}\"", attribute_value(&entry.logo));
    }

    let _ = write!(extinf, " group-title=\"{}\"", attribute_value(&entry.group));
    let _ = write!(extinf, ",{}", label(&entry.name));

    extinf
}

// Quoted attribute values cannot carry a double quote or a line break.
fn attribute_value(value: &str) -> String {
    value.replace('"', "'").replace(['\r', '\n'], " ")
}

fn label(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::parse_playlist;
    use proptest::prelude::*;

    fn entry(name: &str, group: &str, logo: &str, epg_id: &str, url: &str) -> ChannelEntry {
        ChannelEntry {
            name: name.to_string(),
            partition_key: PartitionKey::Us,
            group: group.to_string(),
            logo: logo.to_string(),
            epg_id: epg_id.to_string(),
            stream_url: url.to_string(),
        }
    }

    #[test]
    fn test_exact_output() {
        let epg = EpgLocatorTable::new("http://epg/all.xml")
            .with_partition(PartitionKey::Us, "http://epg/us.xml");
        let entries = vec![
            entry("ACME News", "News", "http://logo/acme.png", "acme.us", "http://a/1"),
            entry("Plain", "General", "", "", "http://a/2"),
        ];

        let rendered = render_partition(PartitionKey::Us, &entries, &epg);
        assert_eq!(
            rendered,
            "#EXTM3U x-tvg-url=\"http://epg/us.xml\"\n\
             #EXTINF:-1 tvg-id=\"acme.us\" tvg-name=\"ACME News\" tvg-logo=\"http://logo/acme.png\" group-title=\"News\",ACME News\n\
             http://a/1\n\
             #EXTINF:-1 tvg-name=\"Plain\" group-title=\"General\",Plain\n\
             http://a/2\n"
        );
    }

    #[test]
    fn test_empty_partition_is_header_only() {
        let epg = EpgLocatorTable::new("http://epg/all.xml");
        assert_eq!(
            render_partition(PartitionKey::Int, &[], &epg),
            "#EXTM3U x-tvg-url=\"http://epg/all.xml\"\n"
        );
    }

    #[test]
    fn test_quotes_in_name_do_not_leak_into_attributes() {
        let rendered = render_directive(&entry(
            r#"Evil group-title="Hacked""#,
            "News",
            "",
            "",
            "http://a/1",
        ));
        let parsed: Vec<_> = parse_playlist(&format!("#EXTM3U\n{rendered}\nhttp://a/1\n"))
            .map(|p| p.entry)
            .collect();
        assert_eq!(parsed[0].group, "News");
        assert_eq!(parsed[0].name, r#"Evil group-title="Hacked""#);
    }

    #[test]
    fn test_round_trip_of_parsed_playlist() {
        let source = "#EXTM3U\n\
            #EXTINF:-1 group-title=\"Movies\" tvg-logo=\"http://l/1.png\" tvg-id=\"m1\",Movie One\n\
            http://m/1\n\
            #EXTINF:-1,Bare\n\
            https://m/2\n";
        let original: Vec<ChannelEntry> = parse_playlist(source).map(|p| p.entry).collect();

        let rendered = render_partition(PartitionKey::Int, &original, &EpgLocatorTable::default());
        let reparsed: Vec<ChannelEntry> = parse_playlist(&rendered).map(|p| p.entry).collect();

        assert_eq!(original, reparsed);
    }

    #[test]
    fn test_round_trip_with_comma_in_logo() {
        let written = vec![entry("Rai 1", "News", "http://l/a,b.png", "x", "http://a/1")];

        let rendered = render_partition(PartitionKey::Us, &written, &EpgLocatorTable::default());
        let reparsed: Vec<ChannelEntry> = parse_playlist(&rendered)
            .map(|p| p.entry.with_partition_key(PartitionKey::Us))
            .collect();

        assert_eq!(written, reparsed);
    }

    fn field() -> impl Strategy<Value = String> {
        "[A-Za-z0-9 ,._/:-]{0,12}"
    }

    proptest! {
        #[test]
        fn prop_round_trip_preserves_tuples(
            rows in prop::collection::vec(
                (field(), field(), field(), field(), "[a-z0-9/]{1,10}"),
                0..8,
            )
        ) {
            let source: String = std::iter::once("#EXTM3U\n".to_string())
                .chain(rows.iter().map(|(name, group, logo, id, path)| {
                    format!(
                        "#EXTINF:-1 tvg-id=\"{id}\" tvg-logo=\"{logo}\" \
                         group-title=\"{group}\",{name}\nhttp://s/{path}\n"
                    )
                }))
                .collect();
            let written: Vec<ChannelEntry> = parse_playlist(&source).map(|p| p.entry).collect();
            prop_assert_eq!(written.len(), rows.len());

            let epg = EpgLocatorTable::default();
            let rendered = render_partition(PartitionKey::Int, &written, &epg);
            let reparsed: Vec<ChannelEntry> = parse_playlist(&rendered).map(|p| p.entry).collect();

            let tuples = |entries: &[ChannelEntry]| -> Vec<[String; 5]> {
                entries
                    .iter()
                    .map(|e| {
                        [
                            e.name.clone(),
                            e.group.clone(),
                            e.logo.clone(),
                            e.epg_id.clone(),
                            e.stream_url.clone(),
                        ]
                    })
                    .collect()
            };
            prop_assert_eq!(tuples(&written), tuples(&reparsed));
        }
    }
}
