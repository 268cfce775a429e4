//! Topic categories, difficulty levels and request payloads.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

/// Subject domain a topic is explained under.
///
/// `Chatbot` is the catch-all "general chat" category: it carries no keyword
/// rule and is never flagged by validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TopicCategory {
    Exams,
    Laws,
    Policies,
    Tech,
    Tourism,
    Chatbot,
}

impl TopicCategory {
    /// All categories in menu order.
    pub const ALL: [TopicCategory; 6] = [
        TopicCategory::Exams,
        TopicCategory::Laws,
        TopicCategory::Policies,
        TopicCategory::Tech,
        TopicCategory::Tourism,
        TopicCategory::Chatbot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exams => "Exams",
            Self::Laws => "Laws",
            Self::Policies => "Policies",
            Self::Tech => "Tech",
            Self::Tourism => "Tourism",
            Self::Chatbot => "Chatbot",
        }
    }

    /// Menu label shown next to the category picker.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Exams => "Exams (UPSC, JEE)",
            Self::Laws => "Laws & Rights",
            Self::Policies => "Govt Policies",
            Self::Tech => "Technology",
            Self::Tourism => "Tourism & Places",
            Self::Chatbot => "Ask Bhartiya",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Exams => "📚",
            Self::Laws => "⚖️",
            Self::Policies => "🏛️",
            Self::Tech => "💻",
            Self::Tourism => "✈️",
            Self::Chatbot => "🤖",
        }
    }

    pub fn is_catch_all(&self) -> bool {
        matches!(self, Self::Chatbot)
    }
}

impl std::fmt::Display for TopicCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TopicCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

/// Accepts any casing on the wire, same as `FromStr`.
impl<'de> Deserialize<'de> for TopicCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// How deep and long an explanation should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DifficultyLevel {
    #[default]
    Simple,
    Student,
    Advanced,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 3] = [
        DifficultyLevel::Simple,
        DifficultyLevel::Student,
        DifficultyLevel::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "Simple",
            Self::Student => "Student",
            Self::Advanced => "Advanced",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Simple => "Simple",
            Self::Student => "Medium",
            Self::Advanced => "Advanced (Expert)",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Simple => "Analogies, no jargon",
            Self::Student => "Key definitions & points",
            Self::Advanced => "Nuances & detailed analysis",
        }
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownDifficulty(s.to_string()))
    }
}

/// Client-supplied coordinates, used for Tourism grounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lng: f64,
}

/// A request for an explanation of a topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplanationRequest {
    pub topic: String,
    pub category: TopicCategory,
    #[serde(default)]
    pub difficulty: DifficultyLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoLocation>,
}

/// One answered follow-up question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoubtItem {
    pub question: String,
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!("tourism".parse::<TopicCategory>().unwrap(), TopicCategory::Tourism);
        assert_eq!(" EXAMS ".parse::<TopicCategory>().unwrap(), TopicCategory::Exams);
        assert!("sports".parse::<TopicCategory>().is_err());
    }

    #[test]
    fn test_category_wire_names() {
        let json = serde_json::to_string(&TopicCategory::Chatbot).unwrap();
        assert_eq!(json, "\"Chatbot\"");
        let parsed: TopicCategory = serde_json::from_str("\"Policies\"").unwrap();
        assert_eq!(parsed, TopicCategory::Policies);
        let lower: TopicCategory = serde_json::from_str("\"exams\"").unwrap();
        assert_eq!(lower, TopicCategory::Exams);
        assert!(serde_json::from_str::<TopicCategory>("\"sports\"").is_err());
    }

    #[test]
    fn test_only_chatbot_is_catch_all() {
        let catch_all: Vec<_> = TopicCategory::ALL
            .into_iter()
            .filter(|c| c.is_catch_all())
            .collect();
        assert_eq!(catch_all, vec![TopicCategory::Chatbot]);
    }

    #[test]
    fn test_request_defaults_difficulty() {
        let req: ExplanationRequest =
            serde_json::from_str(r#"{"topic":"RTI Act 2005","category":"Laws"}"#).unwrap();
        assert_eq!(req.difficulty, DifficultyLevel::Simple);
        assert!(req.location.is_none());
    }

    #[test]
    fn test_difficulty_labels() {
        assert_eq!(DifficultyLevel::Student.label(), "Medium");
        assert_eq!("advanced".parse::<DifficultyLevel>().unwrap(), DifficultyLevel::Advanced);
    }
}
