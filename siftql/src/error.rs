use crate::ast::ValueKind;
use thiserror::Error;

/// A view, norm or model value could not be converted.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct TransformationFailed {
    pub message: String,
}

impl TransformationFailed {
    pub fn new(message: impl Into<String>) -> Self { Self { message: message.into() } }
}

/// A configured cardinality or depth limit was exceeded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OverflowError {
    #[error("field {field:?} accepts at most {max} values per group")]
    TooManyValues { field: String, max: usize },
    #[error("a group accepts at most {max} subgroups")]
    TooManyGroups { max: usize },
    #[error("groups may be nested at most {max} levels deep")]
    GroupsNestingTooDeep { max: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConditionErrorKind {
    #[error("syntax error: {0}")]
    Syntax(String),
    #[error("unknown field")]
    UnknownField,
    #[error("{0} values are not accepted by this field")]
    InvalidVariant(ValueKind),
    #[error(transparent)]
    Overflow(#[from] OverflowError),
    #[error(transparent)]
    Transformation(#[from] TransformationFailed),
    #[error("lower range-value {lower:?} must be lower than upper range-value {upper:?}")]
    InvalidRange { lower: String, upper: String },
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),
}

/// One structured problem found while processing or validating a condition.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}{kind}{}", field_prefix(.field), offset_suffix(.offset))]
pub struct ConditionError {
    pub field: Option<String>,
    /// Character offset into the processed input, when there is one.
    pub offset: Option<usize>,
    pub kind: ConditionErrorKind,
}

impl ConditionError {
    pub fn new(kind: impl Into<ConditionErrorKind>) -> Self { Self { field: None, offset: None, kind: kind.into() } }

    pub fn for_field(field: impl Into<String>, kind: impl Into<ConditionErrorKind>) -> Self {
        Self { field: Some(field.into()), offset: None, kind: kind.into() }
    }

    pub fn at(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

fn field_prefix(field: &Option<String>) -> String { field.as_ref().map(|f| format!("{}: ", f)).unwrap_or_default() }

fn offset_suffix(offset: &Option<usize>) -> String { offset.map(|o| format!(" (at offset {})", o)).unwrap_or_default() }

fn join(errors: &[ConditionError]) -> String { errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ") }

/// Aggregate of every problem an input processor found in one pass.
#[derive(Debug, Clone, PartialEq, Default, Error)]
#[error("input contains {} error(s): {}", .errors.len(), join(.errors))]
pub struct InputProcessingError {
    pub errors: Vec<ConditionError>,
}

/// Aggregate of every semantic violation the validator found.
#[derive(Debug, Clone, PartialEq, Default, Error)]
#[error("condition is invalid, {} violation(s): {}", .errors.len(), join(.errors))]
pub struct ValidationError {
    pub errors: Vec<ConditionError>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("field {0:?} is already registered")]
    DuplicateField(String),
    #[error("unknown field {0:?}")]
    UnknownField(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("formatter {formatter} failed: {source}")]
pub struct FormatterError {
    pub formatter: &'static str,
    #[source]
    pub source: ValidationError,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExportError {
    #[error("unknown field {0:?}")]
    UnknownField(String),
    #[error("cannot export value of field {field:?}: {source}")]
    Transformation {
        field: String,
        #[source]
        source: TransformationFailed,
    },
    #[error("JSON serialization failed: {0}")]
    Json(String),
    #[error("cannot export an invalid condition: {0}")]
    InvalidCondition(#[from] ValidationError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid processor configuration: {0}")]
    Parse(String),
}
