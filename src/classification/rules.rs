//! Built-in country rule table
//!
//! Order matters: within every stage the first matching rule wins, so a line that
//! mentions two countries is filed under whichever comes first here.

use serde::{Deserialize, Serialize};

use crate::models::PartitionKey;

/// Signals that file an entry under one partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRule {
    pub partition: PartitionKey,
    /// Values accepted in an explicit `tvg-country` attribute.
    #[serde(default)]
    pub country_codes: Vec<String>,
    /// Keywords searched in the whole directive line.
    #[serde(default)]
    pub line_keywords: Vec<String>,
    /// Leading words of the display name ("RU: Channel One").
    #[serde(default)]
    pub name_prefixes: Vec<String>,
}

impl ClassificationRule {
    fn new(
        partition: PartitionKey,
        country_codes: &[&str],
        line_keywords: &[&str],
        name_prefixes: &[&str],
    ) -> Self {
        let owned =
            |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
        Self {
            partition,
            country_codes: owned(country_codes),
            line_keywords: owned(line_keywords),
            name_prefixes: owned(name_prefixes),
        }
    }

    /// Lower-case and trim every signal, dropping blanks.
    pub(crate) fn normalized(mut self) -> Self {
        let normalize = |items: Vec<String>| -> Vec<String> {
            items
                .into_iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        };
        self.country_codes = normalize(self.country_codes);
        self.line_keywords = normalize(self.line_keywords);
        self.name_prefixes = normalize(self.name_prefixes);
        self
    }
}

pub fn default_rules() -> Vec<ClassificationRule> {
    use PartitionKey::*;

    vec![
        ClassificationRule::new(Ru, &["ru"], &["russia", "росси", "rus"], &["ru"]),
        ClassificationRule::new(
            Us,
            &["us", "usa"],
            &["united states", "usa", "american"],
            &["us", "usa"],
        ),
        ClassificationRule::new(
            Uk,
            &["uk", "gb"],
            &["united kingdom", "british", "england", "uk", "gb"],
            &["uk"],
        ),
        ClassificationRule::new(De, &["de"], &["deutschland", "german"], &["de"]),
        ClassificationRule::new(Fr, &["fr"], &["france", "french", "français"], &["fr"]),
        ClassificationRule::new(It, &["it"], &["italia", "italy"], &[]),
        ClassificationRule::new(Es, &["es"], &["españa", "espana", "spain", "spanish"], &[]),
        ClassificationRule::new(Ua, &["ua"], &["ukrain", "україн", "украин"], &[]),
        ClassificationRule::new(Pl, &["pl"], &["poland", "polska", "polish"], &[]),
        ClassificationRule::new(Tr, &["tr"], &["turkey", "türkiye", "turkiye", "turkish"], &[]),
        ClassificationRule::new(Pt, &["pt"], &["portugal", "portugu"], &[]),
        ClassificationRule::new(
            Nl,
            &["nl"],
            &["netherlands", "nederland", "dutch", "holland"],
            &[],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_one_rule_per_partition() {
        let rules = default_rules();
        let partitions: HashSet<PartitionKey> = rules.iter().map(|r| r.partition).collect();
        assert_eq!(partitions.len(), rules.len());
        assert!(!partitions.contains(&PartitionKey::Int));
    }

    #[test]
    fn test_name_prefixes_only_for_reduced_subset() {
        let with_prefixes: Vec<PartitionKey> = default_rules()
            .into_iter()
            .filter(|r| !r.name_prefixes.is_empty())
            .map(|r| r.partition)
            .collect();
        assert_eq!(
            with_prefixes,
            vec![
                PartitionKey::Ru,
                PartitionKey::Us,
                PartitionKey::Uk,
                PartitionKey::De,
                PartitionKey::Fr
            ]
        );
    }

    #[test]
    fn test_normalized_lowercases_and_drops_blanks() {
        let rule = ClassificationRule {
            partition: PartitionKey::Pl,
            country_codes: vec![" PL ".to_string(), "".to_string()],
            line_keywords: vec!["Polska".to_string()],
            name_prefixes: vec![],
        }
        .normalized();
        assert_eq!(rule.country_codes, vec!["pl"]);
        assert_eq!(rule.line_keywords, vec!["polska"]);
    }
}
