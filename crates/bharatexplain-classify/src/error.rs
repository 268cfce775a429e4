//! Rule table construction errors.

use bharatexplain_core::TopicCategory;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("category {0} is exempt from validation and cannot carry a rule")]
    CatchAllRule(TopicCategory),

    #[error("category {0} has more than one rule")]
    DuplicateRule(TopicCategory),

    #[error("rule for {0} has no keywords")]
    EmptyRule(TopicCategory),

    #[error("rule for {0} contains a blank keyword")]
    BlankKeyword(TopicCategory),

    #[error("invalid keyword {keyword:?}: {source}")]
    BadKeyword {
        keyword: String,
        #[source]
        source: regex::Error,
    },
}
