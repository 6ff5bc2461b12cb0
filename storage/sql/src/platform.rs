//! The few places where database identity changes the generated SQL: placeholders,
//! LIKE wildcard escaping, identifier quoting and regular expression matching.

use crate::error::SqlGenerationError;
use siftql::ast::PatternKind;
use std::fmt::Debug;

pub trait QueryPlatform: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Placeholder for the `index`th (1-based) bound parameter.
    fn placeholder(&self, _index: usize) -> String { "?".to_owned() }

    /// Characters with a wildcard meaning inside a LIKE pattern.
    fn like_escape_chars(&self) -> &'static str;

    /// Clause appended to LIKE when the database has no default escape character.
    fn like_escape_clause(&self) -> Option<&'static str> { None }

    fn quote_identifier(&self, identifier: &str) -> String { format!("\"{}\"", identifier.replace('"', "\"\"")) }

    /// Escapes the wildcard characters and the escape character itself with `\`.
    fn escape_like(&self, value: &str) -> String {
        let special = self.like_escape_chars();
        let mut escaped = String::with_capacity(value.len() + 4);
        for c in value.chars() {
            if c == '\\' || special.contains(c) {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped
    }

    fn like_sql(&self, column: &str, placeholder: &str, negated: bool, case_insensitive: bool) -> String {
        let not = if negated { "NOT " } else { "" };
        let escape = self.like_escape_clause().map(|clause| format!(" {}", clause)).unwrap_or_default();
        if case_insensitive {
            format!("LOWER({}) {}LIKE LOWER({}){}", column, not, placeholder, escape)
        } else {
            format!("{} {}LIKE {}{}", column, not, placeholder, escape)
        }
    }

    /// Regular expression match of `column` against the bound pattern.
    fn regex_sql(&self, column: &str, placeholder: &str, negated: bool, case_insensitive: bool) -> Result<String, SqlGenerationError>;

    /// The value bound for a regular expression pattern.
    fn regex_value(&self, pattern: &str, _case_insensitive: bool) -> String { pattern.to_owned() }
}

/// SQLite. `REGEXP` requires a user function registered on the connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlitePlatform;

impl QueryPlatform for SqlitePlatform {
    fn name(&self) -> &'static str { "sqlite" }

    fn like_escape_chars(&self) -> &'static str { "%_" }

    fn like_escape_clause(&self) -> Option<&'static str> { Some("ESCAPE '\\'") }

    fn regex_sql(&self, column: &str, placeholder: &str, negated: bool, _case_insensitive: bool) -> Result<String, SqlGenerationError> {
        Ok(format!("{} {}REGEXP {}", column, if negated { "NOT " } else { "" }, placeholder))
    }

    fn regex_value(&self, pattern: &str, case_insensitive: bool) -> String {
        if case_insensitive {
            format!("(?i){}", pattern)
        } else {
            pattern.to_owned()
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresPlatform;

impl QueryPlatform for PostgresPlatform {
    fn name(&self) -> &'static str { "postgres" }

    fn placeholder(&self, index: usize) -> String { format!("${}", index) }

    fn like_escape_chars(&self) -> &'static str { "%_" }

    fn like_sql(&self, column: &str, placeholder: &str, negated: bool, case_insensitive: bool) -> String {
        let operator = match (negated, case_insensitive) {
            (false, false) => "LIKE",
            (false, true) => "ILIKE",
            (true, false) => "NOT LIKE",
            (true, true) => "NOT ILIKE",
        };
        format!("{} {} {}", column, operator, placeholder)
    }

    fn regex_sql(&self, column: &str, placeholder: &str, negated: bool, case_insensitive: bool) -> Result<String, SqlGenerationError> {
        let operator = match (negated, case_insensitive) {
            (false, false) => "~",
            (false, true) => "~*",
            (true, false) => "!~",
            (true, true) => "!~*",
        };
        Ok(format!("{} {} {}", column, operator, placeholder))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlPlatform;

impl QueryPlatform for MysqlPlatform {
    fn name(&self) -> &'static str { "mysql" }

    fn like_escape_chars(&self) -> &'static str { "%_" }

    fn quote_identifier(&self, identifier: &str) -> String { format!("`{}`", identifier.replace('`', "``")) }

    fn regex_sql(&self, column: &str, placeholder: &str, negated: bool, case_insensitive: bool) -> Result<String, SqlGenerationError> {
        Ok(format!(
            "{}REGEXP_LIKE({}, {}, '{}')",
            if negated { "NOT " } else { "" },
            column,
            placeholder,
            if case_insensitive { "i" } else { "c" }
        ))
    }
}

/// Microsoft SQL Server. `[` and `]` form character classes in LIKE patterns.
#[derive(Debug, Clone, Copy, Default)]
pub struct MssqlPlatform;

impl QueryPlatform for MssqlPlatform {
    fn name(&self) -> &'static str { "mssql" }

    fn like_escape_chars(&self) -> &'static str { "%_[]" }

    fn like_escape_clause(&self) -> Option<&'static str> { Some("ESCAPE '\\'") }

    fn quote_identifier(&self, identifier: &str) -> String { format!("[{}]", identifier.replace(']', "]]")) }

    fn regex_sql(&self, _column: &str, _placeholder: &str, _negated: bool, _case_insensitive: bool) -> Result<String, SqlGenerationError> {
        Err(SqlGenerationError::UnsupportedPattern { platform: self.name(), kind: PatternKind::Regex })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_escaping_differs_per_platform() {
        assert_eq!(SqlitePlatform.escape_like(r"50%_[a]\"), r"50\%\_[a]\\");
        assert_eq!(MssqlPlatform.escape_like(r"50%_[a]\"), r"50\%\_\[a\]\\");
        assert_eq!(PostgresPlatform.escape_like("plain"), "plain");
    }

    #[test]
    fn test_like_sql() {
        assert_eq!(SqlitePlatform.like_sql("name", "?", false, false), r"name LIKE ? ESCAPE '\'");
        assert_eq!(SqlitePlatform.like_sql("name", "?", true, true), r"LOWER(name) NOT LIKE LOWER(?) ESCAPE '\'");
        assert_eq!(PostgresPlatform.like_sql("name", "$1", false, true), "name ILIKE $1");
        assert_eq!(MysqlPlatform.like_sql("name", "?", true, false), "name NOT LIKE ?");
    }

    #[test]
    fn test_regex_sql() {
        assert_eq!(PostgresPlatform.regex_sql("name", "$2", true, true).unwrap(), "name !~* $2");
        assert_eq!(MysqlPlatform.regex_sql("name", "?", false, true).unwrap(), "REGEXP_LIKE(name, ?, 'i')");
        assert_eq!(SqlitePlatform.regex_sql("name", "?", false, true).unwrap(), "name REGEXP ?");
        assert_eq!(SqlitePlatform.regex_value("^a", true), "(?i)^a");
        assert_eq!(
            MssqlPlatform.regex_sql("name", "?", false, false),
            Err(SqlGenerationError::UnsupportedPattern { platform: "mssql", kind: PatternKind::Regex })
        );
    }

    #[test]
    fn test_placeholders_and_identifiers() {
        assert_eq!(PostgresPlatform.placeholder(3), "$3");
        assert_eq!(SqlitePlatform.placeholder(3), "?");
        assert_eq!(SqlitePlatform.quote_identifier(r#"my "col""#), r#""my ""col""""#);
        assert_eq!(MysqlPlatform.quote_identifier("col"), "`col`");
        assert_eq!(MssqlPlatform.quote_identifier("col"), "[col]");
    }
}
