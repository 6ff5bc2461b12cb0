use siftql::ast::PatternKind;
use siftql::error::ValidationError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SqlGenerationError {
    #[error("unknown field {0:?}")]
    UnknownField(String),
    #[error("field {0:?} is used in the condition but has no column mapping")]
    UnmappedField(String),
    #[error("{0}")]
    State(&'static str),
    #[error("conversion of a value for field {field:?} failed: {message}")]
    Conversion { field: String, message: String },
    #[error("condition is invalid: {0}")]
    InvalidCondition(#[from] ValidationError),
    #[error("{platform} does not support {kind:?} pattern matching")]
    UnsupportedPattern { platform: &'static str, kind: PatternKind },
}
