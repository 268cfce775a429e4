//! Maps raw provider failures to messages a user can act on.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    RateLimited,
    ContentPolicy,
    Connection,
    Location,
    Generic,
}

/// User-facing description of a failed generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FriendlyError {
    pub kind: ErrorKind,
    pub title: &'static str,
    pub message: &'static str,
    pub suggestion: &'static str,
}

/// Substrings checked in order; the first group with a hit decides the kind.
const RULES: &[(ErrorKind, &[&str])] = &[
    (ErrorKind::RateLimited, &["429", "quota", "exhausted"]),
    (ErrorKind::ContentPolicy, &["safety", "blocked", "policy"]),
    (ErrorKind::Connection, &["network", "fetch", "internet"]),
    (ErrorKind::Location, &["location", "geolocation"]),
];

impl FriendlyError {
    /// Classify an error message by case-insensitive substring inspection.
    pub fn classify(raw: &str) -> Self {
        let msg = raw.to_lowercase();
        let kind = RULES
            .iter()
            .find(|(_, needles)| needles.iter().any(|n| msg.contains(n)))
            .map(|(kind, _)| *kind)
            .unwrap_or(ErrorKind::Generic);
        Self::from_kind(kind)
    }

    pub fn from_kind(kind: ErrorKind) -> Self {
        let (title, message, suggestion) = match kind {
            ErrorKind::RateLimited => (
                "High Traffic",
                "We are currently experiencing high demand.",
                "Please wait a minute and try again.",
            ),
            ErrorKind::ContentPolicy => (
                "Content Policy",
                "This topic couldn't be processed due to safety guidelines.",
                "Try rephrasing your topic to be more specific or neutral.",
            ),
            ErrorKind::Connection => (
                "Connection Error",
                "We couldn't reach our servers.",
                "Please check your internet connection.",
            ),
            ErrorKind::Location => (
                "Location Error",
                "We couldn't access your location.",
                "Please enable location services or try a different category.",
            ),
            ErrorKind::Generic => (
                "Something went wrong",
                "We encountered an unexpected error.",
                "Please try searching for the topic again.",
            ),
        };
        Self {
            kind,
            title,
            message,
            suggestion,
        }
    }
}

impl From<&crate::error::ChatError> for FriendlyError {
    fn from(err: &crate::error::ChatError) -> Self {
        Self::classify(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChatError;

    #[test]
    fn test_rate_limit() {
        let e = FriendlyError::classify("API error 429 Too Many Requests: RESOURCE_EXHAUSTED");
        assert_eq!(e.kind, ErrorKind::RateLimited);
        assert_eq!(e.title, "High Traffic");
    }

    #[test]
    fn test_content_policy() {
        let e = FriendlyError::classify("Response was BLOCKED due to SAFETY");
        assert_eq!(e.kind, ErrorKind::ContentPolicy);
    }

    #[test]
    fn test_first_group_wins() {
        // Mentions both quota and network; rate limiting is checked first.
        let e = FriendlyError::classify("network quota exceeded");
        assert_eq!(e.kind, ErrorKind::RateLimited);
    }

    #[test]
    fn test_connection_and_location() {
        assert_eq!(
            FriendlyError::classify("Request failed: error sending request (network unreachable)").kind,
            ErrorKind::Connection
        );
        assert_eq!(
            FriendlyError::classify("Geolocation permission denied").kind,
            ErrorKind::Location
        );
    }

    #[test]
    fn test_generic_fallback() {
        let e = FriendlyError::from(&ChatError::NoContent);
        assert_eq!(e.kind, ErrorKind::Generic);
        assert_eq!(e.suggestion, "Please try searching for the topic again.");
    }
}
