//! Accumulates SQL text and its bound parameters in text order.

use crate::platform::QueryPlatform;
use siftql::value::Value;

pub struct SqlBuilder<'a> {
    sql: String,
    params: Vec<Value>,
    platform: &'a dyn QueryPlatform,
}

impl<'a> SqlBuilder<'a> {
    pub fn new(platform: &'a dyn QueryPlatform) -> Self { Self { sql: String::new(), params: Vec::new(), platform } }

    pub fn platform(&self) -> &'a dyn QueryPlatform { self.platform }

    pub fn push_sql(&mut self, s: &str) { self.sql.push_str(s); }

    /// Records `value` and returns its placeholder without writing it.
    ///
    /// Fragments are assembled before they are pushed, so the caller must request
    /// placeholders in the order they appear in the final text.
    pub fn param(&mut self, value: Value) -> String {
        self.params.push(value);
        self.platform.placeholder(self.params.len())
    }

    pub fn build_where_clause(self) -> (String, Vec<Value>) { (self.sql, self.params) }
}
