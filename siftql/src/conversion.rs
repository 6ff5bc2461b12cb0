use crate::value::Value;
use chrono::{NaiveDate, NaiveDateTime};
use std::convert::TryFrom;

impl From<i64> for Value {
    fn from(value: i64) -> Self { Value::Integer(value) }
}
impl From<i32> for Value {
    fn from(value: i32) -> Self { Value::Integer(value as i64) }
}
impl From<u32> for Value {
    fn from(value: u32) -> Self { Value::Integer(value as i64) }
}
impl From<f64> for Value {
    fn from(value: f64) -> Self { Value::Float(value) }
}
impl From<bool> for Value {
    fn from(value: bool) -> Self { Value::Boolean(value) }
}
impl<'a> From<&'a str> for Value {
    fn from(value: &'a str) -> Self { Value::String(value.to_owned()) }
}
impl From<String> for Value {
    fn from(value: String) -> Self { Value::String(value) }
}
impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self { Value::Date(value) }
}
impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self { Value::DateTime(value) }
}

/// Returned when a model value is not of the requested native type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("expected {expected} value, got {got}")]
pub struct ValueTypeMismatch {
    pub expected: &'static str,
    pub got: &'static str,
}

impl<'a> TryFrom<&'a Value> for i64 {
    type Error = ValueTypeMismatch;

    fn try_from(value: &'a Value) -> Result<Self, Self::Error> {
        value.as_i64().ok_or(ValueTypeMismatch { expected: "integer", got: value.type_name() })
    }
}

impl<'a> TryFrom<&'a Value> for NaiveDate {
    type Error = ValueTypeMismatch;

    fn try_from(value: &'a Value) -> Result<Self, Self::Error> {
        value.as_date().ok_or(ValueTypeMismatch { expected: "date", got: value.type_name() })
    }
}

impl<'a> TryFrom<&'a Value> for String {
    type Error = ValueTypeMismatch;

    fn try_from(value: &'a Value) -> Result<Self, Self::Error> {
        value.as_str().map(str::to_owned).ok_or(ValueTypeMismatch { expected: "string", got: value.type_name() })
    }
}
