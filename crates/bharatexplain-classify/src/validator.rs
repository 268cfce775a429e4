//! Topic/category mismatch detection.
//!
//! Validation is advisory: only confident mismatches are flagged. Unknown or
//! novel topics always pass, and the catch-all category is never checked.

use std::sync::Arc;

use bharatexplain_core::TopicCategory;
use serde::Serialize;
use tracing::debug;

use crate::matcher::Matcher;
use crate::rules::RuleTable;

/// Result of checking a topic against the selected category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ValidationOutcome {
    Valid,
    Mismatch {
        #[serde(rename = "suggestedCategory")]
        suggested_category: TopicCategory,
        #[serde(rename = "suggestedLabel")]
        suggested_label: String,
        message: String,
    },
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Mismatch { message, .. } => Some(message),
        }
    }

    pub fn suggested_category(&self) -> Option<TopicCategory> {
        match self {
            Self::Valid => None,
            Self::Mismatch { suggested_category, .. } => Some(*suggested_category),
        }
    }
}

/// User-facing correction prompt for a mismatch.
pub fn mismatch_message(label: &str) -> String {
    format!(
        "It looks like you're asking about {label}. Please select the '{label}' category for the best explanation."
    )
}

#[derive(Debug, Clone, Default)]
pub struct Validator {
    matcher: Matcher,
}

impl Validator {
    pub fn new(table: Arc<RuleTable>) -> Self {
        Self {
            matcher: Matcher::new(table),
        }
    }

    pub fn builtin() -> Self {
        Self::default()
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Check `text` against `selected`.
    ///
    /// When several categories match and none is the selected one, the first
    /// in rule declaration order is suggested.
    pub fn validate(&self, text: &str, selected: TopicCategory) -> ValidationOutcome {
        if selected.is_catch_all() {
            return ValidationOutcome::Valid;
        }

        let matched = self.matcher.match_categories(text);
        if matched.is_empty() || matched.contains(&selected) {
            return ValidationOutcome::Valid;
        }

        let suggested = matched[0];
        let label = self
            .matcher
            .table()
            .label_for(suggested)
            .unwrap_or_else(|| suggested.as_str())
            .to_string();

        debug!(
            "Topic matched {:?} but {} was selected; suggesting {}",
            matched, selected, suggested
        );

        ValidationOutcome::Mismatch {
            suggested_category: suggested,
            message: mismatch_message(&label),
            suggested_label: label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_passes() {
        let validator = Validator::builtin();
        for category in TopicCategory::ALL {
            assert!(validator.validate("", category).is_valid());
            assert!(validator.validate("   ", category).is_valid());
        }
    }

    #[test]
    fn test_catch_all_always_valid() {
        let validator = Validator::builtin();
        assert!(validator
            .validate("literally anything", TopicCategory::Chatbot)
            .is_valid());
        assert!(validator
            .validate("JEE Main cutoff", TopicCategory::Chatbot)
            .is_valid());
    }

    #[test]
    fn test_membership_acceptance() {
        let validator = Validator::builtin();
        assert!(validator
            .matcher()
            .match_categories("JEE Main cutoff")
            .contains(&TopicCategory::Exams));
        assert_eq!(
            validator.validate("JEE Main cutoff", TopicCategory::Exams),
            ValidationOutcome::Valid
        );
    }

    #[test]
    fn test_membership_with_several_matches() {
        let validator = Validator::builtin();
        // Matches Policies ("scheme") and Tech ("drone"); either selection is fine.
        assert!(validator.validate("drone scheme", TopicCategory::Tech).is_valid());
        assert!(validator.validate("drone scheme", TopicCategory::Policies).is_valid());
    }

    #[test]
    fn test_mismatch_is_deterministic() {
        let validator = Validator::builtin();
        let topic = "best place to visit taj mahal";
        assert_eq!(
            validator.matcher().match_categories(topic),
            vec![TopicCategory::Tourism]
        );

        let first = validator.validate(topic, TopicCategory::Tech);
        let second = validator.validate(topic, TopicCategory::Tech);
        assert_eq!(first, second);
        assert_eq!(first.suggested_category(), Some(TopicCategory::Tourism));
        assert_eq!(
            first.message(),
            Some("It looks like you're asking about Tourism. Please select the 'Tourism' category for the best explanation.")
        );
    }

    #[test]
    fn test_mismatch_uses_rule_label() {
        let validator = Validator::builtin();
        let outcome = validator.validate("income tax slab", TopicCategory::Exams);
        match outcome {
            ValidationOutcome::Mismatch {
                suggested_category,
                suggested_label,
                ..
            } => {
                assert_eq!(suggested_category, TopicCategory::Policies);
                assert_eq!(suggested_label, "Govt Policies");
            }
            ValidationOutcome::Valid => panic!("expected a mismatch"),
        }
    }

    #[test]
    fn test_first_declared_category_wins() {
        let validator = Validator::builtin();
        let outcome = validator.validate("drone scheme", TopicCategory::Exams);
        assert_eq!(outcome.suggested_category(), Some(TopicCategory::Policies));
    }

    #[test]
    fn test_hinglish_topic_is_flagged() {
        let validator = Validator::builtin();
        let outcome = validator.validate("UPSCकी तैयारी", TopicCategory::Tourism);
        assert_eq!(outcome.suggested_category(), Some(TopicCategory::Exams));
    }

    #[test]
    fn test_no_match_passes() {
        let validator = Validator::builtin();
        for category in TopicCategory::ALL {
            assert!(validator
                .validate("lorem ipsum dolor sit amet", category)
                .is_valid());
        }
    }

    #[test]
    fn test_outcome_serialization() {
        let validator = Validator::builtin();
        let json = serde_json::to_value(validator.validate("I took a taxi", TopicCategory::Laws))
            .unwrap();
        assert_eq!(json["outcome"], "mismatch");
        assert_eq!(json["suggestedCategory"], "Tourism");

        let valid = serde_json::to_value(ValidationOutcome::Valid).unwrap();
        assert_eq!(valid["outcome"], "valid");
    }
}
