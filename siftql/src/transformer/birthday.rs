use super::DataTransformer;
use crate::error::TransformationFailed;
use crate::value::Value;
use chrono::{Local, NaiveDate};
use std::sync::Arc;

const AGE_DISABLED: &str = "Age support is not enabled.";

/// Accepts either a date, delegated to the wrapped transformer, or a plain
/// non-negative age.
#[derive(Debug, Clone)]
pub struct BirthdayTransformer {
    inner: Arc<dyn DataTransformer>,
    allow_age: bool,
    allow_future_date: bool,
    today: Option<NaiveDate>,
}

impl BirthdayTransformer {
    /// Ages allowed, future dates rejected.
    pub fn new(inner: Arc<dyn DataTransformer>) -> Self { Self { inner, allow_age: true, allow_future_date: false, today: None } }

    pub fn allow_age(mut self, allow: bool) -> Self {
        self.allow_age = allow;
        self
    }

    pub fn allow_future_date(mut self, allow: bool) -> Self {
        self.allow_future_date = allow;
        self
    }

    /// Pins the reference date used for the future-date check.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate { self.today.unwrap_or_else(|| Local::now().date_naive()) }
}

impl DataTransformer for BirthdayTransformer {
    fn transform(&self, value: &Value) -> Result<String, TransformationFailed> {
        match value {
            Value::Integer(_) if !self.allow_age => Err(TransformationFailed::new(AGE_DISABLED)),
            Value::Integer(age) => Ok(age.to_string()),
            other => self.inner.transform(other),
        }
    }

    fn reverse_transform(&self, value: &str) -> Result<Value, TransformationFailed> {
        let trimmed = value.trim();
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            if !self.allow_age {
                return Err(TransformationFailed::new(AGE_DISABLED));
            }
            return trimmed.parse::<i64>().map(Value::Integer).map_err(|_| TransformationFailed::new(format!("Age \"{}\" is out of range", trimmed)));
        }

        let model = self.inner.reverse_transform(trimmed)?;
        if !self.allow_future_date {
            if let Value::Date(date) = &model {
                if *date > self.today() {
                    return Err(TransformationFailed::new(format!("Date \"{}\" is later than the current date", trimmed)));
                }
            }
        }
        Ok(model)
    }
}
