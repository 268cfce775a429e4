//! Keyword rule table: category → curated keywords, compiled to whole-word regexes.

use std::collections::HashSet;
use std::sync::Arc;

use bharatexplain_core::TopicCategory;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ClassifyError;

/// Uncompiled keyword rule for one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: TopicCategory,
    /// Name used in mismatch messages ("Govt Policies", not "Policies").
    pub label: String,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(category: TopicCategory, label: &str, keywords: &[&str]) -> Self {
        Self {
            category,
            label: label.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// A keyword together with its compiled whole-word pattern.
#[derive(Debug)]
pub(crate) struct KeywordPattern {
    pub keyword: String,
    pub regex: Regex,
}

#[derive(Debug)]
pub(crate) struct CompiledRule {
    pub category: TopicCategory,
    pub label: String,
    pub patterns: Vec<KeywordPattern>,
}

/// Compiled, immutable rule table. Rule order is significant: it decides
/// which category is suggested when several match.
#[derive(Debug)]
pub struct RuleTable {
    rules: Vec<CompiledRule>,
}

static BUILTIN: Lazy<Arc<RuleTable>> = Lazy::new(|| {
    Arc::new(RuleTable::new(default_rules()).expect("built-in keyword rules must compile"))
});

impl RuleTable {
    /// Compile a rule table. Keywords are trimmed and lowercased; each one
    /// becomes a case-insensitive whole-word pattern with metacharacters
    /// escaped. Word boundaries are ASCII-only, so a keyword glued to
    /// Devanagari or accented letters ("UPSCकी") still matches.
    pub fn new(rules: Vec<CategoryRule>) -> Result<Self, ClassifyError> {
        let mut seen = HashSet::new();
        let mut compiled = Vec::with_capacity(rules.len());

        for rule in rules {
            if rule.category.is_catch_all() {
                return Err(ClassifyError::CatchAllRule(rule.category));
            }
            if !seen.insert(rule.category) {
                return Err(ClassifyError::DuplicateRule(rule.category));
            }
            if rule.keywords.is_empty() {
                return Err(ClassifyError::EmptyRule(rule.category));
            }

            let mut patterns = Vec::with_capacity(rule.keywords.len());
            for keyword in &rule.keywords {
                let keyword = keyword.trim().to_lowercase();
                if keyword.is_empty() {
                    return Err(ClassifyError::BlankKeyword(rule.category));
                }
                let pattern = format!(r"(?i)(?-u:\b){}(?-u:\b)", regex::escape(&keyword));
                let regex = Regex::new(&pattern).map_err(|source| ClassifyError::BadKeyword {
                    keyword: keyword.clone(),
                    source,
                })?;
                patterns.push(KeywordPattern { keyword, regex });
            }

            compiled.push(CompiledRule {
                category: rule.category,
                label: rule.label,
                patterns,
            });
        }

        Ok(Self { rules: compiled })
    }

    /// The curated default table, compiled once per process.
    pub fn builtin() -> Arc<RuleTable> {
        BUILTIN.clone()
    }

    /// Categories that carry a rule, in declaration order.
    pub fn categories(&self) -> impl Iterator<Item = TopicCategory> + '_ {
        self.rules.iter().map(|r| r.category)
    }

    /// Mismatch label for a category, if it has a rule.
    pub fn label_for(&self, category: TopicCategory) -> Option<&str> {
        self.rules
            .iter()
            .find(|r| r.category == category)
            .map(|r| r.label.as_str())
    }

    pub fn keyword_count(&self) -> usize {
        self.rules.iter().map(|r| r.patterns.len()).sum()
    }

    pub(crate) fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }
}

/// Curated rules for Bharat topics. Declaration order: Exams, Laws,
/// Policies, Tech, Tourism.
pub fn default_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new(
            TopicCategory::Exams,
            "Exams",
            &[
                "jee", "neet", "upsc", "gate", "iit", "exam", "syllabus", "cutoff", "counseling",
                "cbse", "icse", "state board", "result", "admit card", "percentile", "rank",
                "marks", "preparation", "study plan", "eligibility", "question paper", "cat",
                "clat", "nda", "cds", "ssb", "ibps", "ssc", "rrb", "bank po", "clerk", "ca",
                "cs", "cma", "board exam", "practical", "viva", "hall ticket", "revaluation",
                "compartment", "scholarship", "fellowship", "ugc", "nta", "net",
            ],
        ),
        CategoryRule::new(
            TopicCategory::Laws,
            "Laws",
            &[
                "article", "section", "act", "ipc", "bns", "constitution", "law",
                "supreme court", "high court", "legal", "lawyer", "rights", "fir", "bail",
                "court", "police", "arrest", "crime", "justice", "judge", "advocate", "tribunal",
                "petition", "lawsuit", "litigation", "affidavit", "notary", "warrant", "summons",
                "custody", "divorce", "alimony", "property dispute", "consumer forum", "rti",
                "pil", "fundamental rights", "directive principles", "amendment", "ordinance",
                "bill", "parliament", "lok sabha", "rajya sabha",
            ],
        ),
        CategoryRule::new(
            TopicCategory::Policies,
            "Govt Policies",
            &[
                "scheme", "yojana", "policy", "subsidy", "pension", "ration", "aadhaar",
                "pan card", "govt", "government", "minister", "budget", "tax", "gst", "welfare",
                "beneficiary", "housing", "insurance", "fund", "pm kisan", "ayushman bharat",
                "mgnrega", "startup india", "digital india", "make in india", "beti bachao",
                "swachh bharat", "smart city", "passport", "voter id", "driving license", "rc",
                "challan", "fastag", "epf", "ppf", "nps", "sukanya samriddhi", "mudra loan",
                "itr", "income tax",
            ],
        ),
        CategoryRule::new(
            TopicCategory::Tech,
            "Tech",
            &[
                "ai", "software", "hardware", "coding", "programming", "computer", "internet",
                "5g", "smartphone", "app", "crypto", "blockchain", "robot", "technology",
                "digital", "data", "server", "cloud", "cyber", "network", "wifi",
                "machine learning", "data science", "web development", "android", "ios",
                "windows", "linux", "mac", "laptop", "tablet", "gadget", "bluetooth",
                "processor", "ram", "gpu", "cpu", "motherboard", "satellite", "isro", "nasa",
                "space", "telescope", "drone", "ev", "electric vehicle", "semiconductor",
            ],
        ),
        CategoryRule::new(
            TopicCategory::Tourism,
            "Tourism",
            &[
                "travel", "visit", "hotel", "flight", "train", "booking", "temple", "fort",
                "beach", "hill station", "museum", "park", "tourism", "tourist", "best place",
                "resort", "vacation", "trip", "guide", "monument", "waterfall", "lake", "darshan",
                "pilgrimage", "ticket", "pnr", "irctc", "bus", "taxi", "cab", "rental",
                "homestay", "backpacking", "trekking", "camping", "safari", "zoo", "sanctuary",
                "heritage", "culture", "festival", "fair", "mela", "yatra", "char dham",
                "jyotirlinga",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_every_category_but_chatbot() {
        let table = RuleTable::builtin();
        let categories: Vec<_> = table.categories().collect();
        assert_eq!(
            categories,
            vec![
                TopicCategory::Exams,
                TopicCategory::Laws,
                TopicCategory::Policies,
                TopicCategory::Tech,
                TopicCategory::Tourism,
            ]
        );
        assert!(table.label_for(TopicCategory::Chatbot).is_none());
        assert_eq!(table.label_for(TopicCategory::Policies), Some("Govt Policies"));
    }

    #[test]
    fn test_rejects_catch_all_rule() {
        let err = RuleTable::new(vec![CategoryRule::new(
            TopicCategory::Chatbot,
            "Chat",
            &["hello"],
        )])
        .unwrap_err();
        assert!(matches!(err, ClassifyError::CatchAllRule(TopicCategory::Chatbot)));
    }

    #[test]
    fn test_rejects_duplicate_and_empty_rules() {
        let dup = RuleTable::new(vec![
            CategoryRule::new(TopicCategory::Tech, "Tech", &["ai"]),
            CategoryRule::new(TopicCategory::Tech, "Tech", &["gpu"]),
        ]);
        assert!(matches!(dup, Err(ClassifyError::DuplicateRule(TopicCategory::Tech))));

        let empty = RuleTable::new(vec![CategoryRule::new(TopicCategory::Laws, "Laws", &[])]);
        assert!(matches!(empty, Err(ClassifyError::EmptyRule(TopicCategory::Laws))));

        let blank = RuleTable::new(vec![CategoryRule::new(TopicCategory::Laws, "Laws", &["  "])]);
        assert!(matches!(blank, Err(ClassifyError::BlankKeyword(TopicCategory::Laws))));
    }

    #[test]
    fn test_keywords_with_metacharacters_compile() {
        let table = RuleTable::new(vec![CategoryRule::new(
            TopicCategory::Tech,
            "Tech",
            &["c++", "node.js", "(beta)"],
        )])
        .unwrap();
        assert_eq!(table.keyword_count(), 3);
    }
}
