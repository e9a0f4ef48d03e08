//! Keyword matching.
//!
//! Mirrors Postgres `plainto_tsquery('simple', ..)` closely enough that the
//! in-memory store and the database agree: text is split on anything that is
//! not alphanumeric, lowercased, and every query term must equal a word.

use std::collections::BTreeSet;

use crate::asset::Asset;

/// Maximum number of attach candidates offered at once.
pub const SUGGESTION_LIMIT: usize = 10;

/// Parsed, non-empty set of search terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerms {
    terms: Vec<String>,
}

impl SearchTerms {
    /// Returns `None` for blank input: "no query yet" is not the same as a
    /// query that matched nothing.
    pub fn parse(text: &str) -> Option<Self> {
        let terms: Vec<String> = words(text)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if terms.is_empty() {
            None
        } else {
            Some(Self { terms })
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Space-joined form handed to the database text-search function.
    pub fn as_query(&self) -> String {
        self.terms.join(" ")
    }

    pub fn matches_name(&self, asset: &Asset) -> bool {
        self.matches_text(&asset.name)
    }

    /// Keyword search covers both `name` and `type`.
    pub fn matches_asset(&self, asset: &Asset) -> bool {
        self.matches_text(&format!("{} {}", asset.name, asset.asset_type))
    }

    fn matches_text(&self, text: &str) -> bool {
        let haystack: BTreeSet<String> = words(text).collect();
        self.terms.iter().all(|t| haystack.contains(t))
    }
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use stocktag_core::AssetId;

    use crate::{Attributes, NewAsset};

    fn asset(name: &str, asset_type: &str) -> Asset {
        Asset::create(
            AssetId::new(),
            NewAsset {
                name: name.to_string(),
                asset_type: asset_type.to_string(),
                quantity: 1,
                attributes: Attributes::new(),
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn blank_query_parses_to_nothing() {
        assert!(SearchTerms::parse("").is_none());
        assert!(SearchTerms::parse("  -- ").is_none());
    }

    #[test]
    fn whole_words_match_case_insensitively() {
        let terms = SearchTerms::parse("widget").unwrap();
        assert!(terms.matches_name(&asset("Blue Widget", "part")));
        assert!(!terms.matches_name(&asset("Gadget", "part")));
        assert!(!terms.matches_name(&asset("Widgets", "part")));
    }

    #[test]
    fn all_terms_must_match() {
        let terms = SearchTerms::parse("blue widget").unwrap();
        assert!(terms.matches_name(&asset("Widget, Blue", "part")));
        assert!(!terms.matches_name(&asset("Red Widget", "part")));
    }

    #[test]
    fn keyword_search_also_covers_type() {
        let terms = SearchTerms::parse("laptop").unwrap();
        let a = asset("ThinkPad T14", "Laptop");
        assert!(terms.matches_asset(&a));
        assert!(!terms.matches_name(&a));
    }

    #[test]
    fn query_form_is_deduplicated_and_lowercased() {
        let terms = SearchTerms::parse("Cable cable HDMI").unwrap();
        assert_eq!(terms.as_query(), "cable hdmi");
    }
}
