//! BharatExplain Classify — keyword rules, topic/category validation, autocomplete.
//!
//! Everything here is pure and immutable after construction: the rule table
//! and suggestion corpus are built once and shared read-only.

pub mod error;
pub mod matcher;
pub mod rules;
pub mod suggest;
pub mod validator;

pub use error::ClassifyError;
pub use matcher::{KeywordHit, Matcher};
pub use rules::{default_rules, CategoryRule, RuleTable};
pub use suggest::{SuggestionCorpus, SuggestionIndex};
pub use validator::{ValidationOutcome, Validator};
