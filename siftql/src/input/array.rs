use super::{InputProcessor, ProcessingContext, Representation};
use crate::ast::{Compare, ConditionValue, GroupLogical, PatternMatch, Range, SearchCondition, SingleValue, ValuesBag, ValuesGroup};
use crate::config::ProcessorConfig;
use crate::error::{ConditionError, ConditionErrorKind, InputProcessingError};
use crate::exporter::{ExportedGroup, ExportedRange, ExportedValues};
use crate::field::{FieldConfig, FieldSet};
use crate::value::Value;
use std::sync::Arc;
use tracing::debug;

/// Reads an [`ExportedGroup`], the structure `ArrayExporter` produces. Values are in norm representation.
#[derive(Debug, Clone, Default)]
pub struct ArrayInput {
    config: ProcessorConfig,
}

impl ArrayInput {
    pub fn new() -> Self { Self::default() }

    pub fn with_config(config: ProcessorConfig) -> Self { Self { config } }
}

impl InputProcessor for ArrayInput {
    type Input = ExportedGroup;

    fn process(&self, field_set: &Arc<FieldSet>, input: &ExportedGroup) -> Result<SearchCondition, InputProcessingError> {
        let mut ctx = ProcessingContext::new(field_set, &self.config);
        let root = import_group(&mut ctx, input, 0);
        ctx.finish(field_set, root)
    }
}

/// Reads the JSON text `JsonExporter` produces.
#[derive(Debug, Clone, Default)]
pub struct JsonInput {
    array: ArrayInput,
}

impl JsonInput {
    pub fn new() -> Self { Self::default() }

    pub fn with_config(config: ProcessorConfig) -> Self { Self { array: ArrayInput::with_config(config) } }
}

impl InputProcessor for JsonInput {
    type Input = str;

    fn process(&self, field_set: &Arc<FieldSet>, input: &str) -> Result<SearchCondition, InputProcessingError> {
        let exported: ExportedGroup = serde_json::from_str(input).map_err(|e| {
            debug!("invalid condition JSON: {}", e);
            InputProcessingError { errors: vec![ConditionError::new(ConditionErrorKind::Syntax(e.to_string()))] }
        })?;
        self.array.process(field_set, &exported)
    }
}

fn import_group(ctx: &mut ProcessingContext<'_>, exported: &ExportedGroup, level: usize) -> ValuesGroup {
    let mut group = ValuesGroup::with_logical(exported.logical_case.unwrap_or(GroupLogical::And));
    for (name, values) in &exported.fields {
        let Some(field) = ctx.field(name, None) else { continue };
        let bag = import_values(ctx, field, values);
        if !bag.is_empty() {
            group.add_field(name.clone(), bag);
        }
    }
    for (i, child) in exported.groups.iter().enumerate() {
        if ctx.enter_group(i + 1, level + 1, None) {
            group.groups.push(import_group(ctx, child, level + 1));
        }
    }
    group
}

fn import_values(ctx: &mut ProcessingContext<'_>, field: &FieldConfig, values: &ExportedValues) -> ValuesBag {
    let mut bag = ValuesBag::new();
    for norm in &values.simple_values {
        if let Some(value) = single(ctx, field, norm) {
            ctx.add_value(field, &mut bag, ConditionValue::Single(value), None);
        }
    }
    for norm in &values.excluded_simple_values {
        if let Some(value) = single(ctx, field, norm) {
            ctx.add_value(field, &mut bag, ConditionValue::ExcludedSingle(value), None);
        }
    }
    for range in &values.ranges {
        if let Some(range) = import_range(ctx, field, range) {
            ctx.add_value(field, &mut bag, ConditionValue::Range(range), None);
        }
    }
    for range in &values.excluded_ranges {
        if let Some(range) = import_range(ctx, field, range) {
            ctx.add_value(field, &mut bag, ConditionValue::ExcludedRange(range), None);
        }
    }
    for comparison in &values.comparisons {
        if let Some((value, view)) = model(ctx, field, &comparison.value) {
            ctx.add_value(field, &mut bag, ConditionValue::Compare(Compare { value, operator: comparison.operator, view }), None);
        }
    }
    for pattern in &values.pattern_matchers {
        match PatternMatch::parse_type_name(&pattern.kind) {
            Some((kind, negated)) => {
                let pattern = PatternMatch { value: pattern.value.clone(), kind, negated, case_insensitive: pattern.case_insensitive };
                ctx.add_value(field, &mut bag, ConditionValue::PatternMatch(pattern), None);
            }
            None => {
                let kind = ConditionErrorKind::InvalidPattern(format!("unknown pattern type {:?}", pattern.kind));
                ctx.error(ConditionError::for_field(field.name(), kind));
            }
        }
    }
    bag
}

/// Converts a norm string to its model value and derives the view from the model.
fn model(ctx: &mut ProcessingContext<'_>, field: &FieldConfig, norm: &str) -> Option<(Value, String)> {
    let value = ctx.to_model(field, norm, Representation::Norm, None)?;
    let view = field.model_to_view(&value).unwrap_or_else(|_| norm.to_owned());
    Some((value, view))
}

fn single(ctx: &mut ProcessingContext<'_>, field: &FieldConfig, norm: &str) -> Option<SingleValue> {
    let (value, view) = model(ctx, field, norm)?;
    Some(SingleValue { value, view })
}

fn import_range(ctx: &mut ProcessingContext<'_>, field: &FieldConfig, range: &ExportedRange) -> Option<Range> {
    let lower = model(ctx, field, &range.lower);
    let upper = model(ctx, field, &range.upper);
    let ((lower, view_lower), (upper, view_upper)) = (lower?, upper?);
    Some(Range { lower, upper, inclusive_lower: range.inclusive_lower, inclusive_upper: range.inclusive_upper, view_lower, view_upper })
}
