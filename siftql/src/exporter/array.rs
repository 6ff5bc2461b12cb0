use super::Exporter;
use crate::ast::{CompareOperator, GroupLogical, PatternMatch, Range, SearchCondition, SingleValue, ValuesBag, ValuesGroup};
use crate::config::ProcessorConfig;
use crate::error::ExportError;
use crate::field::{FieldConfig, FieldSet};
use crate::formatter::Validator;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

fn yes() -> bool { true }

fn is_true(value: &bool) -> bool { *value }

fn is_false(value: &bool) -> bool { !*value }

/// Nested, serializable form of a condition; every value in its norm representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExportedGroup {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub fields: IndexMap<String, ExportedValues>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<ExportedGroup>,
    /// Only present for OR groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_case: Option<GroupLogical>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExportedValues {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub simple_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_simple_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ranges: Vec<ExportedRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_ranges: Vec<ExportedRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comparisons: Vec<ExportedComparison>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pattern_matchers: Vec<ExportedPattern>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExportedRange {
    pub lower: String,
    pub upper: String,
    #[serde(default = "yes", skip_serializing_if = "is_true")]
    pub inclusive_lower: bool,
    #[serde(default = "yes", skip_serializing_if = "is_true")]
    pub inclusive_upper: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedComparison {
    pub operator: CompareOperator,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExportedPattern {
    /// `CONTAINS`, `NOT_STARTS_WITH`, ...
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub case_insensitive: bool,
}

/// Exports a condition into an [`ExportedGroup`].
#[derive(Debug, Clone, Default)]
pub struct ArrayExporter {
    validator: Validator,
}

impl ArrayExporter {
    pub fn new() -> Self { Self::default() }

    pub fn with_config(config: ProcessorConfig) -> Self { Self { validator: Validator::new(config) } }
}

impl Exporter for ArrayExporter {
    type Output = ExportedGroup;

    fn validator(&self) -> &Validator { &self.validator }

    fn write(&self, condition: &SearchCondition) -> Result<ExportedGroup, ExportError> { export_group(condition.field_set(), condition.group()) }
}

fn export_group(field_set: &FieldSet, group: &ValuesGroup) -> Result<ExportedGroup, ExportError> {
    let mut exported = ExportedGroup::default();
    for (name, bag) in &group.fields {
        if bag.is_empty() {
            continue;
        }
        let field = field_set.get(name).ok_or_else(|| ExportError::UnknownField(name.clone()))?;
        exported.fields.insert(name.clone(), export_values(field, bag)?);
    }
    for child in &group.groups {
        exported.groups.push(export_group(field_set, child)?);
    }
    if group.logical == GroupLogical::Or {
        exported.logical_case = Some(GroupLogical::Or);
    }
    Ok(exported)
}

fn export_values(field: &FieldConfig, bag: &ValuesBag) -> Result<ExportedValues, ExportError> {
    let norm = |value: &crate::value::Value| {
        field.model_to_norm(value).map_err(|source| ExportError::Transformation { field: field.name().to_owned(), source })
    };
    let single = |value: &SingleValue| norm(&value.value);
    let range = |range: &Range| -> Result<ExportedRange, ExportError> {
        Ok(ExportedRange {
            lower: norm(&range.lower)?,
            upper: norm(&range.upper)?,
            inclusive_lower: range.inclusive_lower,
            inclusive_upper: range.inclusive_upper,
        })
    };

    Ok(ExportedValues {
        simple_values: bag.simple_values.iter().map(single).collect::<Result<_, _>>()?,
        excluded_simple_values: bag.excluded_simple_values.iter().map(single).collect::<Result<_, _>>()?,
        ranges: bag.ranges.iter().map(range).collect::<Result<_, _>>()?,
        excluded_ranges: bag.excluded_ranges.iter().map(range).collect::<Result<_, _>>()?,
        comparisons: bag
            .comparisons
            .iter()
            .map(|c| Ok(ExportedComparison { operator: c.operator, value: norm(&c.value)? }))
            .collect::<Result<_, ExportError>>()?,
        pattern_matchers: bag.pattern_matchers.iter().map(export_pattern).collect(),
    })
}

fn export_pattern(pattern: &PatternMatch) -> ExportedPattern {
    ExportedPattern { kind: pattern.type_name(), value: pattern.value.clone(), case_insensitive: pattern.case_insensitive }
}
