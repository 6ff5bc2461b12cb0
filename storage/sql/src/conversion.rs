//! Storage-side conversions applied while generating SQL.
//!
//! These are independent of a field's view/norm transformers: a [`ValueConversion`]
//! turns a model value into what the column stores, a [`FieldConversion`] wraps the
//! column reference (for instance in a SQL function) and a [`ConversionStrategy`]
//! picks, per value, which variant the other two should apply.

use crate::platform::QueryPlatform;
use siftql::error::TransformationFailed;
use siftql::field::FieldConfig;
use siftql::value::Value;
use std::fmt::Debug;
use std::sync::Arc;

/// Context handed to every conversion call.
#[derive(Debug, Clone, Copy)]
pub struct ConversionHints<'a> {
    pub field: &'a FieldConfig,
    /// The mapped column, as configured on the builder.
    pub column: &'a str,
    pub platform: &'a dyn QueryPlatform,
    /// Set by the field's [`ConversionStrategy`], if it has one.
    pub strategy: Option<u32>,
}

pub trait ValueConversion: Debug + Send + Sync {
    fn convert_value(&self, value: &Value, hints: &ConversionHints<'_>) -> Result<Value, TransformationFailed>;

    /// Wraps the bound placeholder, e.g. `CAST(? AS DATE)`.
    fn convert_sql_value(&self, placeholder: String, _hints: &ConversionHints<'_>) -> String { placeholder }
}

pub trait FieldConversion: Debug + Send + Sync {
    fn convert_sql_field(&self, column: &str, hints: &ConversionHints<'_>) -> String;
}

pub trait ConversionStrategy: Debug + Send + Sync {
    fn conversion_strategy(&self, value: &Value, hints: &ConversionHints<'_>) -> Option<u32>;
}

/// One registrable conversion; a field holds at most one of each kind.
#[derive(Debug, Clone)]
pub enum Converter {
    Value(Arc<dyn ValueConversion>),
    Field(Arc<dyn FieldConversion>),
    Strategy(Arc<dyn ConversionStrategy>),
}

impl Converter {
    pub fn value(conversion: impl ValueConversion + 'static) -> Self { Converter::Value(Arc::new(conversion)) }

    pub fn field(conversion: impl FieldConversion + 'static) -> Self { Converter::Field(Arc::new(conversion)) }

    pub fn strategy(strategy: impl ConversionStrategy + 'static) -> Self { Converter::Strategy(Arc::new(strategy)) }
}

/// The conversions registered for one field.
#[derive(Debug, Clone, Default)]
pub struct FieldConverters {
    value: Option<Arc<dyn ValueConversion>>,
    field: Option<Arc<dyn FieldConversion>>,
    strategy: Option<Arc<dyn ConversionStrategy>>,
}

impl FieldConverters {
    /// Replaces the slot matching the converter's kind.
    pub fn set(&mut self, converter: Converter) {
        match converter {
            Converter::Value(c) => self.value = Some(c),
            Converter::Field(c) => self.field = Some(c),
            Converter::Strategy(c) => self.strategy = Some(c),
        }
    }

    pub fn is_empty(&self) -> bool { self.value.is_none() && self.field.is_none() && self.strategy.is_none() }

    pub fn strategy_for(&self, value: &Value, hints: &ConversionHints<'_>) -> Option<u32> {
        self.strategy.as_ref().and_then(|s| s.conversion_strategy(value, hints))
    }

    pub fn column_sql(&self, hints: &ConversionHints<'_>) -> String {
        match &self.field {
            Some(conversion) => conversion.convert_sql_field(hints.column, hints),
            None => hints.column.to_owned(),
        }
    }

    pub fn value(&self, value: &Value, hints: &ConversionHints<'_>) -> Result<Value, TransformationFailed> {
        match &self.value {
            Some(conversion) => conversion.convert_value(value, hints),
            None => Ok(value.clone()),
        }
    }

    pub fn placeholder_sql(&self, placeholder: String, hints: &ConversionHints<'_>) -> String {
        match &self.value {
            Some(conversion) => conversion.convert_sql_value(placeholder, hints),
            None => placeholder,
        }
    }
}

/// Wraps the column in `LOWER(..)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowerCaseField;

impl FieldConversion for LowerCaseField {
    fn convert_sql_field(&self, column: &str, _hints: &ConversionHints<'_>) -> String { format!("LOWER({})", column) }
}

/// Stores dates and timestamps as ISO-8601 text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateAsText;

impl ValueConversion for DateAsText {
    fn convert_value(&self, value: &Value, _hints: &ConversionHints<'_>) -> Result<Value, TransformationFailed> {
        match value {
            Value::Date(d) => Ok(Value::String(d.format("%Y-%m-%d").to_string())),
            Value::DateTime(dt) => Ok(Value::String(dt.format("%Y-%m-%dT%H:%M:%S").to_string())),
            other => Err(TransformationFailed::new(format!("expected a date, got {}", other.type_name()))),
        }
    }
}
