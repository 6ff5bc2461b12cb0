//! Lowers a [`SearchCondition`] into a parameterized WHERE clause.
//!
//! Per field, the values that widen the result (single values, ranges, comparisons other
//! than `<>`, plain pattern matchers) are OR'd together and the ones that narrow it
//! (excluded values, excluded ranges, `<>`, negated pattern matchers) are AND'd onto that:
//! `((P1 OR P2) AND E1 AND E2)`. Fields and child groups are joined with the group's
//! logical operator; the root group is not parenthesised.

use crate::conversion::{ConversionHints, FieldConverters};
use crate::error::SqlGenerationError;
use crate::platform::QueryPlatform;
use crate::sql_builder::SqlBuilder;
use indexmap::IndexMap;
use siftql::ast::{Compare, PatternKind, PatternMatch, Range, SearchCondition, ValuesBag, ValuesGroup};
use siftql::field::{FieldConfig, FieldSet};
use siftql::formatter::Validator;
use siftql::value::Value;
use std::collections::HashMap;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WhereClause {
    pub sql: String,
    /// Bound values in placeholder order.
    pub parameters: Vec<Value>,
}

impl WhereClause {
    pub fn is_empty(&self) -> bool { self.sql.is_empty() }
}

/// Validates `condition` and generates its WHERE clause.
///
/// Every field used by the condition needs an entry in `columns`; `converters` is optional per field.
pub fn generate(
    condition: &SearchCondition,
    validator: &Validator,
    columns: &IndexMap<String, String>,
    converters: &HashMap<String, FieldConverters>,
    platform: &dyn QueryPlatform,
) -> Result<WhereClause, SqlGenerationError> {
    validator.validate(condition)?;

    let mut generator = QueryGenerator { field_set: condition.field_set(), columns, converters, builder: SqlBuilder::new(platform) };
    let sql = generator.group(condition.group())?;
    generator.builder.push_sql(&sql);
    let (sql, parameters) = generator.builder.build_where_clause();
    Ok(WhereClause { sql, parameters })
}

struct QueryGenerator<'a> {
    field_set: &'a FieldSet,
    columns: &'a IndexMap<String, String>,
    converters: &'a HashMap<String, FieldConverters>,
    builder: SqlBuilder<'a>,
}

/// Everything needed to render the values of one field.
struct FieldTarget<'a> {
    field: &'a FieldConfig,
    column: &'a str,
    converters: Option<&'a FieldConverters>,
    platform: &'a dyn QueryPlatform,
}

impl<'a> FieldTarget<'a> {
    /// Hints for a value; the strategy is decided by `sample`.
    fn hints(&self, sample: &Value) -> ConversionHints<'a> {
        let mut hints = ConversionHints { field: self.field, column: self.column, platform: self.platform, strategy: None };
        if let Some(converters) = self.converters {
            hints.strategy = converters.strategy_for(sample, &hints);
        }
        hints
    }

    fn column_sql(&self, hints: &ConversionHints<'_>) -> String {
        match self.converters {
            Some(converters) => converters.column_sql(hints),
            None => self.column.to_owned(),
        }
    }

    fn bind(&self, builder: &mut SqlBuilder<'_>, value: &Value, hints: &ConversionHints<'_>) -> Result<String, SqlGenerationError> {
        let Some(converters) = self.converters else {
            return Ok(builder.param(value.clone()));
        };
        let converted = converters
            .value(value, hints)
            .map_err(|e| SqlGenerationError::Conversion { field: self.field.name().to_owned(), message: e.message })?;
        let placeholder = builder.param(converted);
        Ok(converters.placeholder_sql(placeholder, hints))
    }
}

impl<'a> QueryGenerator<'a> {
    fn group(&mut self, group: &ValuesGroup) -> Result<String, SqlGenerationError> {
        let mut parts = Vec::new();
        for (name, bag) in &group.fields {
            if bag.is_empty() {
                continue;
            }
            parts.push(format!("({})", self.field(name, bag)?));
        }
        for child in &group.groups {
            let sql = self.group(child)?;
            if !sql.is_empty() {
                parts.push(format!("({})", sql));
            }
        }
        let separator = format!(" {} ", group.logical.as_sql());
        Ok(parts.join(separator.as_str()))
    }

    fn target(&self, name: &str) -> Result<FieldTarget<'a>, SqlGenerationError> {
        let field = self.field_set.get(name).ok_or_else(|| SqlGenerationError::UnknownField(name.to_owned()))?;
        let column = self.columns.get(name).ok_or_else(|| SqlGenerationError::UnmappedField(name.to_owned()))?;
        Ok(FieldTarget { field, column, converters: self.converters.get(name), platform: self.builder.platform() })
    }

    fn field(&mut self, name: &str, bag: &ValuesBag) -> Result<String, SqlGenerationError> {
        let target = self.target(name)?;
        trace!("generating {} value(s) of {} against {}", bag.count(), name, target.column);

        let mut inclusive = Vec::new();
        for value in &bag.simple_values {
            let hints = target.hints(&value.value);
            let column = target.column_sql(&hints);
            inclusive.push(format!("{} = {}", column, target.bind(&mut self.builder, &value.value, &hints)?));
        }
        for range in &bag.ranges {
            inclusive.push(self.range(&target, range, false)?);
        }
        for compare in bag.comparisons.iter().filter(|c| !c.operator.is_exclusive()) {
            inclusive.push(self.compare(&target, compare)?);
        }
        for pattern in bag.pattern_matchers.iter().filter(|p| !p.negated) {
            inclusive.push(self.pattern(&target, pattern)?);
        }

        let mut exclusive = Vec::new();
        for value in &bag.excluded_simple_values {
            let hints = target.hints(&value.value);
            let column = target.column_sql(&hints);
            exclusive.push(format!("{} <> {}", column, target.bind(&mut self.builder, &value.value, &hints)?));
        }
        for range in &bag.excluded_ranges {
            exclusive.push(self.range(&target, range, true)?);
        }
        for compare in bag.comparisons.iter().filter(|c| c.operator.is_exclusive()) {
            exclusive.push(self.compare(&target, compare)?);
        }
        for pattern in bag.pattern_matchers.iter().filter(|p| p.negated) {
            exclusive.push(self.pattern(&target, pattern)?);
        }

        Ok(match (inclusive.len(), exclusive.is_empty()) {
            (0, _) => exclusive.join(" AND "),
            (_, true) => inclusive.join(" OR "),
            (1, false) => format!("{} AND {}", inclusive[0], exclusive.join(" AND ")),
            _ => format!("({}) AND {}", inclusive.join(" OR "), exclusive.join(" AND ")),
        })
    }

    fn range(&mut self, target: &FieldTarget<'_>, range: &Range, excluded: bool) -> Result<String, SqlGenerationError> {
        let hints = target.hints(&range.lower);
        let column = target.column_sql(&hints);
        let lower = target.bind(&mut self.builder, &range.lower, &hints)?;
        let upper = target.bind(&mut self.builder, &range.upper, &hints)?;
        Ok(if excluded {
            let lower_op = if range.inclusive_lower { "<" } else { "<=" };
            let upper_op = if range.inclusive_upper { ">" } else { ">=" };
            format!("({col} {} {} OR {col} {} {})", lower_op, lower, upper_op, upper, col = column)
        } else {
            let lower_op = if range.inclusive_lower { ">=" } else { ">" };
            let upper_op = if range.inclusive_upper { "<=" } else { "<" };
            format!("({col} {} {} AND {col} {} {})", lower_op, lower, upper_op, upper, col = column)
        })
    }

    fn compare(&mut self, target: &FieldTarget<'_>, compare: &Compare) -> Result<String, SqlGenerationError> {
        let hints = target.hints(&compare.value);
        let column = target.column_sql(&hints);
        Ok(format!("{} {} {}", column, compare.operator.as_str(), target.bind(&mut self.builder, &compare.value, &hints)?))
    }

    /// Pattern values are bound as text; only the field conversion applies to them.
    fn pattern(&mut self, target: &FieldTarget<'_>, pattern: &PatternMatch) -> Result<String, SqlGenerationError> {
        let platform = target.platform;
        let hints = target.hints(&Value::String(pattern.value.clone()));
        let column = target.column_sql(&hints);
        match pattern.kind {
            PatternKind::Equals => {
                let placeholder = self.builder.param(Value::String(pattern.value.clone()));
                let operator = if pattern.negated { "<>" } else { "=" };
                Ok(if pattern.case_insensitive {
                    format!("LOWER({}) {} LOWER({})", column, operator, placeholder)
                } else {
                    format!("{} {} {}", column, operator, placeholder)
                })
            }
            PatternKind::Regex => {
                let placeholder = self.builder.param(Value::String(platform.regex_value(&pattern.value, pattern.case_insensitive)));
                platform.regex_sql(&column, &placeholder, pattern.negated, pattern.case_insensitive)
            }
            PatternKind::Contains | PatternKind::StartsWith | PatternKind::EndsWith => {
                let escaped = platform.escape_like(&pattern.value);
                let like = match pattern.kind {
                    PatternKind::StartsWith => format!("{}%", escaped),
                    PatternKind::EndsWith => format!("%{}", escaped),
                    _ => format!("%{}%", escaped),
                };
                let placeholder = self.builder.param(Value::String(like));
                Ok(platform.like_sql(&column, &placeholder, pattern.negated, pattern.case_insensitive))
            }
        }
    }
}
