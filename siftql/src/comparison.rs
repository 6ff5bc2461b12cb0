use crate::value::Value;
use chrono::Days;
use std::cmp::Ordering;
use std::fmt::Debug;

/// Ordering and equality of model values for one field.
pub trait ValueComparison: Debug + Send + Sync {
    /// Compare two values, `None` when they are not comparable (e.g. of different types).
    fn compare(&self, a: &Value, b: &Value) -> Option<Ordering>;

    fn is_equal(&self, a: &Value, b: &Value) -> bool { self.compare(a, b) == Some(Ordering::Equal) }

    fn is_lower(&self, a: &Value, b: &Value) -> bool { self.compare(a, b) == Some(Ordering::Less) }

    fn is_higher(&self, a: &Value, b: &Value) -> bool { self.compare(a, b) == Some(Ordering::Greater) }

    /// The increment capability, when values of this field have a well defined successor.
    fn incrementer(&self) -> Option<&dyn ValueIncrementer> { None }
}

pub trait ValueIncrementer {
    /// Returns the immediate successor of the value if one exists
    fn increment(&self, value: &Value) -> Option<Value>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerComparison;

impl ValueComparison for IntegerComparison {
    fn compare(&self, a: &Value, b: &Value) -> Option<Ordering> {
        match (a, b) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    fn incrementer(&self) -> Option<&dyn ValueIncrementer> { Some(self) }
}

impl ValueIncrementer for IntegerComparison {
    fn increment(&self, value: &Value) -> Option<Value> {
        match value {
            Value::Integer(i) => i.checked_add(1).map(Value::Integer),
            _ => None,
        }
    }
}

/// Floats and integers, compared numerically. Not incrementable.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberComparison;

impl ValueComparison for NumberComparison {
    fn compare(&self, a: &Value, b: &Value) -> Option<Ordering> {
        let as_f64 = |v: &Value| match v {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        };
        as_f64(a)?.partial_cmp(&as_f64(b)?)
    }
}

/// Dates increment by one day; date-times compare but do not increment.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateComparison;

impl ValueComparison for DateComparison {
    fn compare(&self, a: &Value, b: &Value) -> Option<Ordering> {
        match (a, b) {
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    fn incrementer(&self) -> Option<&dyn ValueIncrementer> { Some(self) }
}

impl ValueIncrementer for DateComparison {
    fn increment(&self, value: &Value) -> Option<Value> {
        match value {
            Value::Date(d) => d.checked_add_days(Days::new(1)).map(Value::Date),
            Value::DateTime(dt) => dt.checked_add_days(Days::new(1)).map(Value::DateTime),
            _ => None,
        }
    }
}

/// Byte-wise string ordering.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextComparison;

impl ValueComparison for TextComparison {
    fn compare(&self, a: &Value, b: &Value) -> Option<Ordering> {
        match (a, b) {
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Birthdays are either dates or ages; each only compares with its own kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct BirthdayComparison;

impl ValueComparison for BirthdayComparison {
    fn compare(&self, a: &Value, b: &Value) -> Option<Ordering> {
        match (a, b) {
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    fn incrementer(&self) -> Option<&dyn ValueIncrementer> { Some(self) }
}

impl ValueIncrementer for BirthdayComparison {
    fn increment(&self, value: &Value) -> Option<Value> {
        match value {
            Value::Date(_) => DateComparison.increment(value),
            Value::Integer(_) => IntegerComparison.increment(value),
            _ => None,
        }
    }
}
