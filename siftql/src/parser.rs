use crate::ast::{Compare, CompareOperator, ConditionValue, GroupLogical, PatternKind, PatternMatch, Range, SearchCondition, SingleValue, ValuesGroup};
use crate::config::ProcessorConfig;
use crate::error::{ConditionError, ConditionErrorKind, InputProcessingError};
use crate::field::{FieldConfig, FieldSet};
use crate::grammar::{Rule, SiftqlParser};
use crate::input::{InputProcessor, ProcessingContext, Representation};
use crate::value::Value;
use pest::iterators::{Pair, Pairs};
use pest::Parser;
use std::sync::Arc;
use tracing::debug;

/// Parse a text query into a condition over `field_set`, using the default limits.
///
/// ```text
/// id: 1, 3-5, !7, >10; name: ~i*foo; *(date: "03-05-2010"; date: >="01-01-2020")
/// ```
pub fn parse_condition(input: &str, field_set: &Arc<FieldSet>) -> Result<SearchCondition, InputProcessingError> {
    StringQueryInput::default().process(field_set, input)
}

/// Text query input processor.
#[derive(Debug, Clone, Default)]
pub struct StringQueryInput {
    config: ProcessorConfig,
}

impl StringQueryInput {
    pub fn new() -> Self { Self::default() }

    pub fn with_config(config: ProcessorConfig) -> Self { Self { config } }
}

impl InputProcessor for StringQueryInput {
    type Input = str;

    fn process(&self, field_set: &Arc<FieldSet>, input: &str) -> Result<SearchCondition, InputProcessingError> {
        debug!("parsing condition {:?} for {}", input, field_set.name());
        let mut pairs = SiftqlParser::parse(Rule::Condition, input).map_err(|e| syntax_error(input, e))?;
        let condition = pairs.next().ok_or_else(|| InputProcessingError { errors: vec![ConditionError::new(ConditionErrorKind::Syntax("empty parse".into()))] })?;

        let mut walker = Walker { input, ctx: ProcessingContext::new(field_set, &self.config) };
        let mut root = ValuesGroup::new();
        let mut body = condition.into_inner().peekable();
        if body.peek().is_some_and(|pair| pair.as_rule() == Rule::RootOr) {
            root.logical = GroupLogical::Or;
            body.next();
        }
        walker.body(&mut root, body, 0);

        let result = walker.ctx.finish(field_set, root);
        if let Ok(condition) = &result {
            debug!("parsed condition with {} value(s)", condition.group().count_values());
        }
        result
    }
}

fn syntax_error(input: &str, error: pest::error::Error<Rule>) -> InputProcessingError {
    let position = match error.location {
        pest::error::InputLocation::Pos(pos) => pos,
        pest::error::InputLocation::Span((start, _)) => start,
    };
    let offset = input.get(..position).map_or(position, |prefix| prefix.chars().count());
    let message = error.variant.message().into_owned();
    debug!("syntax error at offset {}: {}", offset, message);
    InputProcessingError { errors: vec![ConditionError::new(ConditionErrorKind::Syntax(message)).at(offset)] }
}

struct Walker<'a> {
    input: &'a str,
    ctx: ProcessingContext<'a>,
}

impl<'a> Walker<'a> {
    /// Character offset of a pair, for error reporting.
    fn offset(&self, pair: &Pair<Rule>) -> usize {
        let start = pair.as_span().start();
        self.input.get(..start).map_or(start, |prefix| prefix.chars().count())
    }

    fn body<'i>(&mut self, group: &mut ValuesGroup, pairs: impl Iterator<Item = Pair<'i, Rule>>, level: usize) {
        let mut groups_seen = 0;
        for pair in pairs {
            match pair.as_rule() {
                Rule::Statement => self.statement(group, pair),
                Rule::Group => {
                    groups_seen += 1;
                    let offset = self.offset(&pair);
                    if self.ctx.enter_group(groups_seen, level + 1, Some(offset)) {
                        group.groups.push(self.group(pair, level + 1));
                    }
                }
                _ => {}
            }
        }
    }

    fn group(&mut self, pair: Pair<Rule>, level: usize) -> ValuesGroup {
        let mut group = ValuesGroup::new();
        let mut inner = pair.into_inner().peekable();
        if inner.peek().is_some_and(|p| p.as_rule() == Rule::OrMarker) {
            group.logical = GroupLogical::Or;
            inner.next();
        }
        self.body(&mut group, inner, level);
        group
    }

    fn statement(&mut self, group: &mut ValuesGroup, pair: Pair<Rule>) {
        let mut inner = pair.into_inner();
        let Some(name) = inner.next() else { return };
        let Some(field) = self.ctx.field(name.as_str(), Some(self.offset(&name))) else { return };
        let Some(values) = inner.next() else { return };

        let bag = group.fields.entry(field.name().to_owned()).or_default();
        for value in values.into_inner() {
            let offset = self.offset(&value);
            if let Some(value) = self.value(field, value, offset) {
                self.ctx.add_value(field, bag, value, Some(offset));
            }
        }
        if bag.is_empty() {
            group.fields.shift_remove(field.name());
        }
    }

    fn value(&mut self, field: &FieldConfig, pair: Pair<Rule>, offset: usize) -> Option<ConditionValue> {
        match pair.as_rule() {
            Rule::SingleValue => self.single(field, pair.into_inner(), offset).map(ConditionValue::Single),
            Rule::ExcludedValue => self.single(field, pair.into_inner(), offset).map(ConditionValue::ExcludedSingle),
            Rule::Range => self.range(field, pair, offset).map(ConditionValue::Range),
            Rule::ExcludedRange => {
                let range = pair.into_inner().next()?;
                self.range(field, range, offset).map(ConditionValue::ExcludedRange)
            }
            Rule::Comparison => {
                let mut inner = pair.into_inner();
                let operator = CompareOperator::parse(inner.next()?.as_str())?;
                let (value, view) = self.scalar(field, inner.next()?, offset)?;
                Some(ConditionValue::Compare(Compare { value, operator, view }))
            }
            Rule::PatternMatch => Some(ConditionValue::PatternMatch(pattern(pair)?)),
            _ => None,
        }
    }

    fn single(&mut self, field: &FieldConfig, mut inner: Pairs<Rule>, offset: usize) -> Option<SingleValue> {
        let (value, view) = self.scalar(field, inner.next()?, offset)?;
        Some(SingleValue { value, view })
    }

    fn range(&mut self, field: &FieldConfig, pair: Pair<Rule>, offset: usize) -> Option<Range> {
        let mut inclusive_lower = true;
        let mut inclusive_upper = true;
        let mut bounds = Vec::with_capacity(2);
        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::LowerExclusive => inclusive_lower = false,
                Rule::UpperExclusive => inclusive_upper = false,
                _ => bounds.push(self.scalar(field, inner, offset)),
            }
        }
        let mut bounds = bounds.into_iter();
        let (lower, view_lower) = bounds.next()??;
        let (upper, view_upper) = bounds.next()??;
        Some(Range { lower, upper, inclusive_lower, inclusive_upper, view_lower, view_upper })
    }

    /// Transforms a scalar from its view representation, returning the model value and the view.
    fn scalar(&mut self, field: &FieldConfig, pair: Pair<Rule>, offset: usize) -> Option<(Value, String)> {
        let view = unquote(pair);
        let value = self.ctx.to_model(field, &view, Representation::View, Some(offset))?;
        Some((value, view))
    }
}

fn pattern(pair: Pair<Rule>) -> Option<PatternMatch> {
    let mut negated = false;
    let mut case_insensitive = false;
    let mut kind = None;
    let mut value = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::CaseInsensitive => case_insensitive = true,
            Rule::PatternNegation => negated = true,
            Rule::PatternOp => {
                kind = Some(match inner.as_str() {
                    "*" => PatternKind::Contains,
                    ">" => PatternKind::StartsWith,
                    "<" => PatternKind::EndsWith,
                    "=" => PatternKind::Equals,
                    _ => PatternKind::Regex,
                })
            }
            Rule::QuotedValue | Rule::BareValue => value = Some(unquote(inner)),
            _ => {}
        }
    }
    Some(PatternMatch { value: value?, kind: kind?, negated, case_insensitive })
}

fn unquote(pair: Pair<Rule>) -> String {
    let raw = pair.as_str();
    match pair.as_rule() {
        Rule::QuotedValue => raw.get(1..raw.len() - 1).unwrap_or_default().replace("\"\"", "\""),
        _ => raw.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ValuesBag;
    use crate::error::OverflowError;

    fn field_set() -> Arc<FieldSet> {
        FieldSet::builder("users")
            .field(FieldConfig::integer("id"))
            .field(FieldConfig::text("name"))
            .field(FieldConfig::date("date", "%m-%d-%Y"))
            .field(FieldConfig::new("status").accept_exclusions(false))
            .build()
            .unwrap()
    }

    fn kinds(err: &InputProcessingError) -> Vec<&ConditionErrorKind> { err.errors.iter().map(|e| &e.kind).collect() }

    #[test]
    fn test_parse_simple_condition() -> anyhow::Result<()> {
        let fields = field_set();
        let condition = parse_condition("id: 1, 2, 3, >10; name: ~*foo*;", &fields)?;
        let expected = ValuesGroup::new()
            .field("id", ValuesBag::new().simple(1).simple(2).simple(3).compare(Compare::new(10, CompareOperator::Greater)))
            .field("name", ValuesBag::new().pattern_match(PatternMatch::new("foo", PatternKind::Contains)));
        assert_eq!(condition.group(), &expected);
        Ok(())
    }

    #[test]
    fn test_parse_ranges_and_exclusions() {
        let fields = field_set();
        let condition = parse_condition("id: 1-5, ]6-10[, !20-30, !40", &fields).unwrap();
        let bag = condition.group().get_field("id").unwrap();
        assert_eq!(bag.ranges, vec![Range::new(1, 5), Range::new(6, 10).exclusive_lower().exclusive_upper()]);
        assert_eq!(bag.excluded_ranges, vec![Range::new(20, 30)]);
        assert_eq!(bag.excluded_simple_values, vec![SingleValue::from_value(40)]);
        assert_eq!(bag.ranges[1].view_lower, "6");
    }

    #[test]
    fn test_parse_views_are_kept() {
        let fields = field_set();
        let condition = parse_condition(r#"date: "03-05-2010""#, &fields).unwrap();
        let value = &condition.group().get_field("date").unwrap().simple_values[0];
        assert_eq!(value.value, Value::Date(chrono::NaiveDate::from_ymd_opt(2010, 3, 5).unwrap()));
        assert_eq!(value.view, "03-05-2010");
    }

    #[test]
    fn test_parse_groups() {
        let fields = field_set();
        let condition = parse_condition("*; id: 1; (name: foo; name: bar) *(id: 2; id: 3)", &fields).unwrap();
        let root = condition.group();
        assert_eq!(root.logical, GroupLogical::Or);
        assert_eq!(root.groups.len(), 2);
        assert_eq!(root.groups[0].logical, GroupLogical::And);
        assert_eq!(root.groups[0].get_field("name").unwrap().simple_values.len(), 2, "repeated fields merge");
        assert_eq!(root.groups[1].logical, GroupLogical::Or);
    }

    #[test]
    fn test_parse_patterns() {
        let fields = field_set();
        let condition = parse_condition(r#"name: ~i>foo, ~!<bar, ~=baz, ~?"^a.*b$", ~*"x y""#, &fields).unwrap();
        let patterns = &condition.group().get_field("name").unwrap().pattern_matchers;
        assert_eq!(patterns, &vec![
            PatternMatch::new("foo", PatternKind::StartsWith).case_insensitive(),
            PatternMatch::new("bar", PatternKind::EndsWith).negated(),
            PatternMatch::new("baz", PatternKind::Equals),
            PatternMatch::new("^a.*b$", PatternKind::Regex),
            PatternMatch::new("x y", PatternKind::Contains),
        ]);
    }

    #[test]
    fn test_quoted_values() {
        let fields = field_set();
        let condition = parse_condition(r#"name: "a, ""b""", """#, &fields).unwrap();
        let values = &condition.group().get_field("name").unwrap().simple_values;
        assert_eq!(values[0].value, Value::String(r#"a, "b""#.into()));
        assert_eq!(values[1].value, Value::String(String::new()));
    }

    #[test]
    fn test_empty_input_and_empty_statement() {
        let fields = field_set();
        assert!(parse_condition("", &fields).unwrap().is_empty());
        let condition = parse_condition("id: ; name: foo", &fields).unwrap();
        assert!(!condition.group().fields.contains_key("id"));
    }

    #[test]
    fn test_errors_are_accumulated() {
        let fields = field_set();
        let err = parse_condition("id: abc, 10-1; foo: 1; name: 1-2; status: !x; name: ~?\"(\"", &fields).unwrap_err();
        let kinds = kinds(&err);
        assert_eq!(kinds.len(), 6, "{}", err);
        assert!(matches!(kinds[0], ConditionErrorKind::Transformation(_)));
        assert!(matches!(kinds[1], ConditionErrorKind::InvalidRange { .. }));
        assert_eq!(kinds[2], &ConditionErrorKind::UnknownField);
        assert_eq!(kinds[3], &ConditionErrorKind::InvalidVariant(crate::ast::ValueKind::Range));
        assert_eq!(kinds[4], &ConditionErrorKind::InvalidVariant(crate::ast::ValueKind::ExcludedSimpleValue));
        assert!(matches!(kinds[5], ConditionErrorKind::InvalidPattern(_)));

        assert_eq!(err.errors[0].field.as_deref(), Some("id"));
        assert_eq!(err.errors[0].offset, Some(4));
        assert_eq!(err.errors[2].offset, Some(15));
    }

    #[test]
    fn test_syntax_error_offset() {
        let fields = field_set();
        let err = parse_condition("name: é; id: 1 2", &fields).unwrap_err();
        assert_eq!(err.errors.len(), 1);
        assert!(matches!(err.errors[0].kind, ConditionErrorKind::Syntax(_)));
        assert_eq!(err.errors[0].offset, Some(15));
    }

    #[test]
    fn test_limits() {
        let fields = field_set();
        let input = StringQueryInput::with_config(ProcessorConfig::default().with_max_values(2).with_max_groups(1).with_max_nesting_level(1));

        let err = input.process(&fields, "id: 1, 2, 3, 4").unwrap_err();
        assert_eq!(kinds(&err), vec![&ConditionErrorKind::Overflow(OverflowError::TooManyValues { field: "id".into(), max: 2 })]);

        let err = input.process(&fields, "(id: 1) (id: 2) (id: 3)").unwrap_err();
        assert_eq!(kinds(&err), vec![&ConditionErrorKind::Overflow(OverflowError::TooManyGroups { max: 1 })]);

        let err = input.process(&fields, "((id: 1))").unwrap_err();
        assert_eq!(kinds(&err), vec![&ConditionErrorKind::Overflow(OverflowError::GroupsNestingTooDeep { max: 1 })]);

        assert!(input.process(&fields, "id: 1, 2; (id: 3)").is_ok());
    }
}
