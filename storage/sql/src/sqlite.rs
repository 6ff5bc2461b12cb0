//! Binding generated parameters with rusqlite.

use rusqlite::types::Value as SqliteValue;
use siftql::value::Value;

/// Maps parameters to SQLite values. Dates are bound as ISO-8601 text, booleans as 0/1.
pub fn to_sqlite_params(parameters: &[Value]) -> Vec<SqliteValue> { parameters.iter().map(to_sqlite_value).collect() }

pub fn to_sqlite_value(value: &Value) -> SqliteValue {
    match value {
        Value::Integer(i) => SqliteValue::Integer(*i),
        Value::Float(f) => SqliteValue::Real(*f),
        Value::String(s) => SqliteValue::Text(s.clone()),
        Value::Boolean(b) => SqliteValue::Integer(if *b { 1 } else { 0 }),
        Value::Date(_) | Value::DateTime(_) => SqliteValue::Text(value.to_string()),
    }
}
