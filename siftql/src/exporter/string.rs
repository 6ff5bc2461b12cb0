use super::Exporter;
use crate::ast::{GroupLogical, PatternKind, PatternMatch, Range, SearchCondition, ValuesBag, ValuesGroup};
use crate::config::ProcessorConfig;
use crate::error::ExportError;
use crate::field::{FieldConfig, FieldSet};
use crate::formatter::Validator;
use crate::value::Value;

const SPECIAL: &[char] = &[' ', '\t', '\r', '\n', '"', ',', ';', '(', ')', '[', ']', '!', '<', '>', '~', '*', '-', ':'];

/// Renders a condition in the text query syntax, values in their view representation.
#[derive(Debug, Clone, Default)]
pub struct StringExporter {
    validator: Validator,
}

impl StringExporter {
    pub fn new() -> Self { Self::default() }

    pub fn with_config(config: ProcessorConfig) -> Self { Self { validator: Validator::new(config) } }
}

impl Exporter for StringExporter {
    type Output = String;

    fn validator(&self) -> &Validator { &self.validator }

    fn write(&self, condition: &SearchCondition) -> Result<String, ExportError> {
        let group = condition.group();
        let mut parts = Vec::new();
        if group.logical == GroupLogical::Or {
            parts.push("*;".to_owned());
        }
        render_body(condition.field_set(), group, &mut parts)?;
        Ok(parts.join(" "))
    }
}

fn render_body(field_set: &FieldSet, group: &ValuesGroup, parts: &mut Vec<String>) -> Result<(), ExportError> {
    for (name, bag) in &group.fields {
        if bag.is_empty() {
            continue;
        }
        let field = field_set.get(name).ok_or_else(|| ExportError::UnknownField(name.clone()))?;
        parts.push(format!("{}: {};", name, render_values(field, bag)?.join(", ")));
    }
    for child in &group.groups {
        let mut inner = Vec::new();
        render_body(field_set, child, &mut inner)?;
        let marker = if child.logical == GroupLogical::Or { "*" } else { "" };
        parts.push(format!("{}({})", marker, inner.join(" ")));
    }
    Ok(())
}

fn render_values(field: &FieldConfig, bag: &ValuesBag) -> Result<Vec<String>, ExportError> {
    let view = |value: &Value| -> Result<String, ExportError> {
        field.model_to_view(value).map(|v| quote(&v)).map_err(|source| ExportError::Transformation { field: field.name().to_owned(), source })
    };
    let range = |range: &Range| -> Result<String, ExportError> {
        Ok(format!(
            "{}{}-{}{}",
            if range.inclusive_lower { "" } else { "]" },
            view(&range.lower)?,
            view(&range.upper)?,
            if range.inclusive_upper { "" } else { "[" }
        ))
    };

    let mut values = Vec::with_capacity(bag.count());
    for value in &bag.simple_values {
        values.push(view(&value.value)?);
    }
    for value in &bag.excluded_simple_values {
        values.push(format!("!{}", view(&value.value)?));
    }
    for value in &bag.ranges {
        values.push(range(value)?);
    }
    for value in &bag.excluded_ranges {
        values.push(format!("!{}", range(value)?));
    }
    for compare in &bag.comparisons {
        values.push(format!("{}{}", compare.operator, view(&compare.value)?));
    }
    for pattern in &bag.pattern_matchers {
        values.push(render_pattern(pattern));
    }
    Ok(values)
}

fn render_pattern(pattern: &PatternMatch) -> String {
    let op = match pattern.kind {
        PatternKind::Contains => '*',
        PatternKind::StartsWith => '>',
        PatternKind::EndsWith => '<',
        PatternKind::Equals => '=',
        PatternKind::Regex => '?',
    };
    format!(
        "~{}{}{}{}",
        if pattern.case_insensitive { "i" } else { "" },
        if pattern.negated { "!" } else { "" },
        op,
        quote(&pattern.value)
    )
}

/// Quotes a scalar when it is empty or contains a character with syntactic meaning.
fn quote(value: &str) -> String {
    if value.is_empty() || value.contains(SPECIAL) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Compare, CompareOperator};
    use std::sync::Arc;

    fn field_set() -> Arc<FieldSet> {
        FieldSet::builder("users")
            .field(FieldConfig::integer("id"))
            .field(FieldConfig::text("name"))
            .field(FieldConfig::date("date", "%m-%d-%Y"))
            .build()
            .unwrap()
    }

    fn export(group: ValuesGroup) -> String { StringExporter::new().export(&SearchCondition::new(field_set(), group)).unwrap() }

    #[test]
    fn test_export_all_variants() {
        let group = ValuesGroup::new().field(
            "id",
            ValuesBag::new()
                .simple(1)
                .excluded_simple(2)
                .range(Range::new(5, 10).exclusive_lower())
                .excluded_range(Range::new(20, 30))
                .compare(Compare::new(100, CompareOperator::GreaterOrEqual)),
        );
        assert_eq!(export(group), "id: 1, !2, ]5-10, !20-30, >=100;");
    }

    #[test]
    fn test_export_quotes_and_views() {
        let date = chrono::NaiveDate::from_ymd_opt(2010, 3, 5).unwrap();
        let group = ValuesGroup::new()
            .field("name", ValuesBag::new().simple("say \"hi\"").pattern_match(PatternMatch::new("foo", PatternKind::Contains).case_insensitive()))
            .field("date", ValuesBag::new().simple(date));
        assert_eq!(export(group), r#"name: "say ""hi""", ~i*foo; date: "03-05-2010";"#);
    }

    #[test]
    fn test_export_groups() {
        let group = ValuesGroup::with_logical(GroupLogical::Or)
            .group(ValuesGroup::new().field("id", ValuesBag::new().simple(1)))
            .group(ValuesGroup::with_logical(GroupLogical::Or).field("id", ValuesBag::new().simple(2)).group(ValuesGroup::new()));
        assert_eq!(export(group), "*; (id: 1;) *(id: 2; ())");
        assert_eq!(export(ValuesGroup::with_logical(GroupLogical::Or)), "*;");
        assert_eq!(export(ValuesGroup::new().group(ValuesGroup::new()).group(ValuesGroup::with_logical(GroupLogical::Or))), "() *()");
    }

    #[test]
    fn test_negative_numbers_are_quoted() {
        assert_eq!(export(ValuesGroup::new().field("id", ValuesBag::new().range(Range::new(-5, -1)))), r#"id: "-5"-"-1";"#);
    }
}
