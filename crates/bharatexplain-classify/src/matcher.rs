//! Whole-word keyword matching of free text against the rule table.

use std::sync::Arc;

use bharatexplain_core::TopicCategory;
use serde::Serialize;

use crate::rules::RuleTable;

/// A keyword that matched, and the category it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordHit {
    pub category: TopicCategory,
    pub keyword: String,
}

/// Finds the categories whose keywords occur as whole words in a text.
#[derive(Debug, Clone)]
pub struct Matcher {
    table: Arc<RuleTable>,
}

impl Matcher {
    pub fn new(table: Arc<RuleTable>) -> Self {
        Self { table }
    }

    /// Matcher over the built-in rule table.
    pub fn builtin() -> Self {
        Self::new(RuleTable::builtin())
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Categories with at least one whole-word keyword hit, in rule
    /// declaration order. Blank text matches nothing.
    pub fn match_categories(&self, text: &str) -> Vec<TopicCategory> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        self.table
            .rules()
            .iter()
            .filter(|rule| rule.patterns.iter().any(|p| p.regex.is_match(text)))
            .map(|rule| rule.category)
            .collect()
    }

    /// Every keyword that matched, grouped by rule order.
    pub fn matched_keywords(&self, text: &str) -> Vec<KeywordHit> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        let mut hits = Vec::new();
        for rule in self.table.rules() {
            for pattern in &rule.patterns {
                if pattern.regex.is_match(text) {
                    hits.push(KeywordHit {
                        category: rule.category,
                        keyword: pattern.keyword.clone(),
                    });
                }
            }
        }
        hits
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::CategoryRule;

    fn tax_taxi_matcher() -> Matcher {
        let table = RuleTable::new(vec![
            CategoryRule::new(TopicCategory::Policies, "Govt Policies", &["tax"]),
            CategoryRule::new(TopicCategory::Tourism, "Tourism", &["taxi"]),
            CategoryRule::new(TopicCategory::Laws, "Laws", &["law"]),
        ])
        .unwrap();
        Matcher::new(Arc::new(table))
    }

    #[test]
    fn test_whole_word_boundary() {
        let matcher = tax_taxi_matcher();
        assert_eq!(
            matcher.match_categories("I paid road tax today"),
            vec![TopicCategory::Policies]
        );
        assert_eq!(
            matcher.match_categories("I took a taxi"),
            vec![TopicCategory::Tourism]
        );
        assert!(matcher.match_categories("mowing the lawn").is_empty());
    }

    #[test]
    fn test_builtin_tax_and_taxi() {
        let matcher = Matcher::builtin();
        let tax = matcher.match_categories("I paid road tax today");
        assert!(tax.contains(&TopicCategory::Policies));
        assert!(!tax.contains(&TopicCategory::Tourism));

        let taxi = matcher.match_categories("I took a taxi");
        assert!(taxi.contains(&TopicCategory::Tourism));
        assert!(!taxi.contains(&TopicCategory::Policies));
    }

    #[test]
    fn test_case_insensitive() {
        let matcher = Matcher::builtin();
        let upper = matcher.match_categories("UPSC exam");
        assert_eq!(upper, matcher.match_categories("upsc EXAM"));
        assert_eq!(upper, vec![TopicCategory::Exams]);
    }

    #[test]
    fn test_blank_text_matches_nothing() {
        let matcher = Matcher::builtin();
        assert!(matcher.match_categories("").is_empty());
        assert!(matcher.match_categories("   \t\n").is_empty());
        assert!(matcher.matched_keywords("  ").is_empty());
    }

    #[test]
    fn test_phrase_keywords_and_punctuation() {
        let matcher = Matcher::builtin();
        assert_eq!(
            matcher.match_categories("Where is the Supreme Court?"),
            vec![TopicCategory::Laws]
        );
        assert_eq!(
            matcher.match_categories("5G rollout"),
            vec![TopicCategory::Tech]
        );
    }

    #[test]
    fn test_multiple_categories_in_declaration_order() {
        let matcher = Matcher::builtin();
        // "scheme" is a Policies keyword, "drone" a Tech keyword.
        let matched = matcher.match_categories("drone scheme");
        assert_eq!(matched, vec![TopicCategory::Policies, TopicCategory::Tech]);
    }

    #[test]
    fn test_matched_keywords_reports_hits() {
        let matcher = Matcher::builtin();
        let hits = matcher.matched_keywords("JEE Main cutoff");
        let keywords: Vec<_> = hits.iter().map(|h| h.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["jee", "cutoff"]);
        assert!(hits.iter().all(|h| h.category == TopicCategory::Exams));
    }

    #[test]
    fn test_unicode_text_is_handled() {
        let matcher = Matcher::builtin();
        assert!(matcher.match_categories("भारत की संस्कृति").is_empty());
        assert_eq!(
            matcher.match_categories("ताज महल hotel"),
            vec![TopicCategory::Tourism]
        );
    }

    #[test]
    fn test_keyword_glued_to_non_ascii_letters() {
        let matcher = Matcher::builtin();
        assert_eq!(
            matcher.match_categories("UPSCकी तैयारी"),
            vec![TopicCategory::Exams]
        );
        assert!(matcher
            .match_categories("cafétax")
            .contains(&TopicCategory::Policies));
    }
}
