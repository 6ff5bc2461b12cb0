use super::DataTransformer;
use crate::error::TransformationFailed;
use crate::value::Value;
use chrono::{NaiveDate, NaiveDateTime};

/// Dates (or date-times) in a chrono format, e.g. `%m-%d-%Y`.
#[derive(Debug, Clone)]
pub struct DateTransformer {
    format: String,
    with_time: bool,
}

impl DateTransformer {
    pub fn new(format: impl Into<String>) -> Self { Self { format: format.into(), with_time: false } }

    /// Produces [`Value::DateTime`] instead of [`Value::Date`].
    pub fn with_time(format: impl Into<String>) -> Self { Self { format: format.into(), with_time: true } }

    /// The machine representation, `2010-03-05`.
    pub fn iso() -> Self { Self::new("%Y-%m-%d") }
}

impl DataTransformer for DateTransformer {
    fn transform(&self, value: &Value) -> Result<String, TransformationFailed> {
        match value {
            Value::Date(d) if !self.with_time => Ok(d.format(&self.format).to_string()),
            Value::DateTime(dt) if self.with_time => Ok(dt.format(&self.format).to_string()),
            other => Err(TransformationFailed::new(format!(
                "Expected a {}, got {}.",
                if self.with_time { "datetime" } else { "date" },
                other.type_name()
            ))),
        }
    }

    fn reverse_transform(&self, value: &str) -> Result<Value, TransformationFailed> {
        let value = value.trim();
        let parsed = if self.with_time {
            NaiveDateTime::parse_from_str(value, &self.format).map(Value::DateTime)
        } else {
            NaiveDate::parse_from_str(value, &self.format).map(Value::Date)
        };
        parsed.map_err(|e| TransformationFailed::new(format!("Unable to parse \"{}\" with format \"{}\": {}", value, self.format, e)))
    }
}
