//! Topic autocomplete over a curated per-category corpus.

use std::collections::HashMap;

use bharatexplain_core::config::DEFAULT_SUGGESTION_LIMIT;
use bharatexplain_core::{ExplainConfig, TopicCategory};

/// Example topics per category. Order is curated: the head of each list is
/// what a blank topic box shows.
#[derive(Debug, Clone)]
pub struct SuggestionCorpus {
    topics: HashMap<TopicCategory, Vec<String>>,
}

impl SuggestionCorpus {
    /// Build a corpus. Categories missing from `topics` get an empty list.
    pub fn new(mut topics: HashMap<TopicCategory, Vec<String>>) -> Self {
        for category in TopicCategory::ALL {
            topics.entry(category).or_default();
        }
        Self { topics }
    }

    /// The curated popular-topics corpus.
    pub fn builtin() -> Self {
        let topics = POPULAR_TOPICS
            .iter()
            .map(|(category, list)| {
                let list: Vec<String> = list.iter().map(|t| t.to_string()).collect();
                (*category, list)
            })
            .collect();
        Self::new(topics)
    }

    pub fn topics(&self, category: TopicCategory) -> &[String] {
        self.topics
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl Default for SuggestionCorpus {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Autocomplete lookups. Pure: every call depends only on its arguments and
/// the corpus, so stale results can simply be discarded by the caller.
#[derive(Debug, Clone)]
pub struct SuggestionIndex {
    corpus: SuggestionCorpus,
    default_limit: usize,
}

impl SuggestionIndex {
    pub fn new(corpus: SuggestionCorpus, default_limit: usize) -> Self {
        Self {
            corpus,
            default_limit,
        }
    }

    pub fn builtin() -> Self {
        Self::new(SuggestionCorpus::builtin(), DEFAULT_SUGGESTION_LIMIT)
    }

    /// Built-in corpus with the configured blank-input limit.
    pub fn from_config(config: &ExplainConfig) -> Self {
        Self::new(SuggestionCorpus::builtin(), config.suggestion_limit)
    }

    pub fn corpus(&self) -> &SuggestionCorpus {
        &self.corpus
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Suggestions for `partial` within `category`.
    ///
    /// Blank input returns the first `default_limit` topics. Otherwise every
    /// topic containing `partial` case-insensitively, in corpus order.
    pub fn suggest(&self, category: TopicCategory, partial: &str) -> Vec<String> {
        let topics = self.corpus.topics(category);

        if partial.trim().is_empty() {
            return topics.iter().take(self.default_limit).cloned().collect();
        }

        let needle = partial.to_lowercase();
        topics
            .iter()
            .filter(|t| t.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

impl Default for SuggestionIndex {
    fn default() -> Self {
        Self::builtin()
    }
}

const POPULAR_TOPICS: &[(TopicCategory, &[&str])] = &[
    (
        TopicCategory::Exams,
        &[
            "UPSC Civil Services Syllabus",
            "JEE Main Cutoff",
            "NEET Exam Pattern",
            "GATE Eligibility",
            "CAT Exam Preparation",
            "SSC CGL Syllabus",
            "NDA Exam Date",
            "CTET Eligibility Criteria",
            "CBSE Class 10 Board Exam",
            "ICSE Class 12 Results",
        ],
    ),
    (
        TopicCategory::Laws,
        &[
            "Article 370",
            "Fundamental Rights of Bharat",
            "RTI Act 2005",
            "Consumer Protection Act",
            "Motor Vehicles Act Fines",
            "Article 21 Right to Life",
            "POCSO Act",
            "Domestic Violence Act",
            "Cyber Crime Laws in Bharat",
            "IPC Section 420",
        ],
    ),
    (
        TopicCategory::Policies,
        &[
            "Pradhan Mantri Awas Yojana",
            "Ayushman Bharat Scheme",
            "PM Kisan Samman Nidhi",
            "Sukanya Samriddhi Yojana",
            "Digital India Initiative",
            "Make in India Policy",
            "National Education Policy 2020",
            "Atmanirbhar Bharat Abhiyan",
            "Swachh Bharat Mission",
            "Jan Dhan Yojana",
        ],
    ),
    (
        TopicCategory::Tech,
        &[
            "UPI Payment System",
            "5G in Bharat",
            "Aadhaar Card Security",
            "Digital Rupee (e-Rupee)",
            "Artificial Intelligence in Bharat",
            "Chandrayaan-3 Mission",
            "ISRO Gaganyaan",
            "Data Protection Bill",
            "Semiconductor Mission Bharat",
            "ONDC Network",
        ],
    ),
    (
        TopicCategory::Tourism,
        &[
            "Best places to visit in Kerala",
            "Taj Mahal ticket booking",
            "Varanasi Ganga Aarti timing",
            "Goa beach guide",
            "Jaipur forts history",
            "Shimla Manali tour plan",
            "Kedarnath Yatra registration",
            "Statue of Unity tickets",
            "Rann of Kutch festival",
            "Sundarbans National Park",
        ],
    ),
    (
        TopicCategory::Chatbot,
        &[
            "How to make Chai?",
            "Best street food in Mumbai",
            "History of Bharatiya Cricket",
            "Famous Festivals",
            "Yoga benefits",
            "Railway booking tips",
            "Bollywood history",
            "Monsoon in Bharat",
        ],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cap_is_first_five_in_order() {
        let index = SuggestionIndex::builtin();
        let suggestions = index.suggest(TopicCategory::Exams, "");
        assert_eq!(
            suggestions,
            index.corpus().topics(TopicCategory::Exams)[..5].to_vec()
        );
        assert_eq!(suggestions[0], "UPSC Civil Services Syllabus");
        assert_eq!(index.suggest(TopicCategory::Exams, "   "), suggestions);
    }

    #[test]
    fn test_substring_containment() {
        let index = SuggestionIndex::builtin();
        let expected: Vec<String> = index
            .corpus()
            .topics(TopicCategory::Exams)
            .iter()
            .filter(|t| t.to_lowercase().contains("jee"))
            .cloned()
            .collect();
        assert_eq!(index.suggest(TopicCategory::Exams, "jee"), expected);
        assert_eq!(index.suggest(TopicCategory::Exams, "JEE"), vec!["JEE Main Cutoff"]);
    }

    #[test]
    fn test_substring_is_not_whole_word() {
        let index = SuggestionIndex::builtin();
        assert_eq!(
            index.suggest(TopicCategory::Exams, "sylla"),
            vec!["UPSC Civil Services Syllabus", "SSC CGL Syllabus"]
        );
    }

    #[test]
    fn test_configured_limit() {
        let config = ExplainConfig {
            port: 0,
            data_paths: bharatexplain_core::DataPaths {
                root: "data".into(),
                llm_config_file: "data/llm-config.json".into(),
            },
            suggestion_limit: 2,
        };
        let index = SuggestionIndex::from_config(&config);
        assert_eq!(
            index.suggest(TopicCategory::Exams, ""),
            vec!["UPSC Civil Services Syllabus", "JEE Main Cutoff"]
        );
    }

    #[test]
    fn test_trailing_space_is_kept() {
        let index = SuggestionIndex::builtin();
        assert_eq!(index.suggest(TopicCategory::Exams, "jee "), vec!["JEE Main Cutoff"]);
        assert_eq!(index.suggest(TopicCategory::Exams, "syllabus").len(), 2);
        // Both syllabus topics end with the word, so nothing follows it.
        assert!(index.suggest(TopicCategory::Exams, "syllabus ").is_empty());
    }

    #[test]
    fn test_non_blank_input_is_unbounded() {
        let index = SuggestionIndex::builtin();
        // Every Laws topic with an "a" in it; more than the blank-input cap.
        let suggestions = index.suggest(TopicCategory::Laws, "a");
        assert!(suggestions.len() > index.default_limit());
    }

    #[test]
    fn test_category_isolation() {
        let index = SuggestionIndex::builtin();
        assert!(index.suggest(TopicCategory::Laws, "jee").is_empty());
        assert_eq!(
            index.suggest(TopicCategory::Tourism, "taj"),
            vec!["Taj Mahal ticket booking"]
        );
    }

    #[test]
    fn test_injected_corpus_fills_missing_categories() {
        let mut topics = HashMap::new();
        topics.insert(TopicCategory::Tech, vec!["Rust".to_string(), "RISC-V".to_string()]);
        let index = SuggestionIndex::new(SuggestionCorpus::new(topics), 1);

        assert_eq!(index.suggest(TopicCategory::Tech, ""), vec!["Rust"]);
        assert_eq!(index.suggest(TopicCategory::Tech, "r"), vec!["Rust", "RISC-V"]);
        assert!(index.suggest(TopicCategory::Laws, "").is_empty());
        assert!(index.corpus().topics(TopicCategory::Chatbot).is_empty());
    }

    #[test]
    fn test_chatbot_has_suggestions() {
        let index = SuggestionIndex::builtin();
        assert_eq!(index.corpus().topics(TopicCategory::Chatbot).len(), 8);
        assert_eq!(index.suggest(TopicCategory::Chatbot, "").len(), 5);
    }
}
