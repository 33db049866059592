//! Country classification
//!
//! A pure function from (directive line, display name) to a [`PartitionKey`].
//! Stages run in a fixed order and the first hit wins:
//!
//! 1. explicit `tvg-country` attribute
//! 2. keywords anywhere in the lower-cased directive line
//! 3. leading word of the display name (only rules that declare name prefixes)
//! 4. [`PartitionKey::Int`]
//!
//! Keywords longer than [`SHORT_KEYWORD_LEN`] characters match as substrings;
//! shorter ones only match whole words, so `"uk"` does not fire on `"ukraine"`.

pub mod rules;

use std::collections::HashSet;

use tracing::trace;

use crate::models::{ChannelEntry, PartitionKey};
use crate::sources::m3u::parse_attributes;
use crate::sources::ParsedEntry;

pub use rules::{default_rules, ClassificationRule};

/// Keywords up to this many characters match whole words only.
pub const SHORT_KEYWORD_LEN: usize = 3;

const COUNTRY_ATTRIBUTE: &str = "tvg-country";

/// Ordered rule set applied to every parsed entry.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<ClassificationRule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl Classifier {
    pub fn new(rules: Vec<ClassificationRule>) -> Self {
        Self {
            rules: rules.into_iter().map(ClassificationRule::normalized).collect(),
        }
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    /// Pick the partition for one directive line and its display name.
    pub fn classify(&self, directive: &str, name: &str) -> PartitionKey {
        if let Some(key) = self.match_country_attribute(directive) {
            trace!("Classified '{}' as {} by tvg-country", name, key);
            return key;
        }

        let line = directive.to_lowercase();
        let line_words = words(&line);
        if let Some(rule) = self.rules.iter().find(|rule| {
            rule.line_keywords
                .iter()
                .any(|keyword| keyword_matches(keyword, &line, &line_words))
        }) {
            trace!("Classified '{}' as {} by line keyword", name, rule.partition);
            return rule.partition;
        }

        let lowered_name = name.to_lowercase();
        if let Some(leading) = words(&lowered_name).into_iter().next() {
            if let Some(rule) = self
                .rules
                .iter()
                .find(|rule| rule.name_prefixes.iter().any(|prefix| prefix == leading))
            {
                trace!("Classified '{}' as {} by name prefix", name, rule.partition);
                return rule.partition;
            }
        }

        PartitionKey::Int
    }

    /// Classify a freshly parsed entry, consuming it.
    pub fn classify_entry(&self, parsed: ParsedEntry) -> ChannelEntry {
        let key = self.classify(&parsed.directive, &parsed.entry.name);
        parsed.entry.with_partition_key(key)
    }

    fn match_country_attribute(&self, directive: &str) -> Option<PartitionKey> {
        let attributes = parse_attributes(directive);
        let value = attributes.get(COUNTRY_ATTRIBUTE)?.to_lowercase();
        let codes: HashSet<&str> = value
            .split(|c: char| c == ';' || c == ',' || c.is_whitespace())
            .filter(|code| !code.is_empty())
            .collect();
        if codes.is_empty() {
            return None;
        }

        self.rules
            .iter()
            .find(|rule| rule.country_codes.iter().any(|code| codes.contains(code.as_str())))
            .map(|rule| rule.partition)
    }
}

fn words(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect()
}

fn keyword_matches(keyword: &str, line: &str, line_words: &[&str]) -> bool {
    if keyword.chars().count() > SHORT_KEYWORD_LEN {
        line.contains(keyword)
    } else {
        line_words.iter().any(|word| *word == keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::explicit_us(r#"#EXTINF:-1 tvg-country="US",ACME News"#, "ACME News", PartitionKey::Us)]
    #[case::explicit_gb_alias(r#"#EXTINF:-1 tvg-country="GB",Sky One"#, "Sky One", PartitionKey::Uk)]
    #[case::explicit_lowercase(r#"#EXTINF:-1 tvg-country="ua",Inter"#, "Inter", PartitionKey::Ua)]
    #[case::explicit_beats_keyword(r#"#EXTINF:-1 tvg-country="US",Germany Today"#, "Germany Today", PartitionKey::Us)]
    #[case::line_keyword(r#"#EXTINF:-1 group-title="Russia",Perviy Kanal"#, "Perviy Kanal", PartitionKey::Ru)]
    #[case::line_keyword_unicode(r#"#EXTINF:-1 group-title="España",La 1"#, "La 1", PartitionKey::Es)]
    #[case::line_short_word(r#"#EXTINF:-1 tvg-id="bbc1.uk",BBC One"#, "BBC One", PartitionKey::Uk)]
    #[case::short_keyword_needs_word(r#"#EXTINF:-1 group-title="Ukraine",1+1"#, "1+1", PartitionKey::Ua)]
    #[case::name_prefix(r#"#EXTINF:-1,DE: ZDF"#, "DE: ZDF", PartitionKey::De)]
    #[case::name_prefix_pipe(r#"#EXTINF:-1,FR | TF1"#, "FR | TF1", PartitionKey::Fr)]
    #[case::no_prefix_for_italian_code(r#"#EXTINF:-1,IT: Rai 1"#, "IT: Rai 1", PartitionKey::Int)]
    #[case::default_international(r#"#EXTINF:-1,Euro Sport"#, "Euro Sport", PartitionKey::Int)]
    #[case::unknown_country_code(r#"#EXTINF:-1 tvg-country="XX",Somewhere"#, "Somewhere", PartitionKey::Int)]
    fn test_classify(#[case] directive: &str, #[case] name: &str, #[case] expected: PartitionKey) {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify(directive, name), expected);
    }

    #[test]
    fn test_declared_order_breaks_ties() {
        let classifier = Classifier::default();
        // Both RU and DE keywords present: RU is declared first.
        let line = r#"#EXTINF:-1 group-title="German",Russia Today"#;
        assert_eq!(classifier.classify(line, "Russia Today"), PartitionKey::Ru);

        // Multi-valued attribute resolves by rule order, not attribute order.
        let line = r#"#EXTINF:-1 tvg-country="FR;US",Channel"#;
        assert_eq!(classifier.classify(line, "Channel"), PartitionKey::Us);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = Classifier::default();
        let line = r#"#EXTINF:-1 tvg-logo="x" group-title="News",Polsat News"#;
        let first = classifier.classify(line, "Polsat News");
        for _ in 0..10 {
            assert_eq!(classifier.classify(line, "Polsat News"), first);
        }
    }

    #[test]
    fn test_custom_rules_replace_defaults() {
        let classifier = Classifier::new(vec![ClassificationRule {
            partition: PartitionKey::Nl,
            country_codes: vec![],
            line_keywords: vec!["NPO".to_string()],
            name_prefixes: vec![],
        }]);
        assert_eq!(classifier.classify("#EXTINF:-1,NPO 1", "NPO 1"), PartitionKey::Nl);
        assert_eq!(
            classifier.classify(r#"#EXTINF:-1 tvg-country="US",CNN"#, "CNN"),
            PartitionKey::Int
        );
    }

    #[test]
    fn test_classify_entry_sets_partition() {
        let parsed = crate::sources::parse_playlist(
            "#EXTM3U\n#EXTINF:-1 tvg-country=\"PL\",TVP 1\nhttp://a/1\n",
        )
        .next()
        .unwrap();
        let entry = Classifier::default().classify_entry(parsed);
        assert_eq!(entry.partition_key, PartitionKey::Pl);
        assert_eq!(entry.name, "TVP 1");
    }
}
