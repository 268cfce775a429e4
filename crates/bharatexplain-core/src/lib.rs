//! BharatExplain Core — domain types, configuration, errors.

pub mod config;
pub mod error;
pub mod languages;
pub mod types;

pub use config::{DataPaths, ExplainConfig};
pub use error::{Error, Result};
pub use languages::{language_label, TranslationLanguage, TRANSLATION_LANGUAGES};
pub use types::{DifficultyLevel, DoubtItem, ExplanationRequest, GeoLocation, TopicCategory};
