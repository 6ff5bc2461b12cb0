use crate::ast::{ConditionValueRef, PatternKind, Range, ValueKind};
use crate::comparison::ValueComparison;
use crate::error::{ConditionErrorKind, SchemaError, TransformationFailed};
use crate::transformer::DataTransformer;
use crate::value::Value;
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::sync::Arc;

/// Declaration of one searchable field: its capabilities, comparison and transformers.
#[derive(Debug, Clone)]
pub struct FieldConfig {
    name: String,
    accept_single_values: bool,
    accept_exclusions: bool,
    accept_ranges: bool,
    accept_compares: bool,
    accept_pattern_matchers: bool,
    max_values: Option<usize>,
    comparison: Option<Arc<dyn ValueComparison>>,
    view_transformer: Option<Arc<dyn DataTransformer>>,
    norm_transformer: Option<Arc<dyn DataTransformer>>,
}

impl FieldConfig {
    /// A field accepting single and excluded values only.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accept_single_values: true,
            accept_exclusions: true,
            accept_ranges: false,
            accept_compares: false,
            accept_pattern_matchers: false,
            max_values: None,
            comparison: None,
            view_transformer: None,
            norm_transformer: None,
        }
    }

    pub fn accept_single_values(mut self, accept: bool) -> Self {
        self.accept_single_values = accept;
        self
    }

    pub fn accept_exclusions(mut self, accept: bool) -> Self {
        self.accept_exclusions = accept;
        self
    }

    pub fn accept_ranges(mut self, accept: bool) -> Self {
        self.accept_ranges = accept;
        self
    }

    pub fn accept_compares(mut self, accept: bool) -> Self {
        self.accept_compares = accept;
        self
    }

    pub fn accept_pattern_matchers(mut self, accept: bool) -> Self {
        self.accept_pattern_matchers = accept;
        self
    }

    pub fn max_values(mut self, max: usize) -> Self {
        self.max_values = Some(max);
        self
    }

    pub fn comparison(mut self, comparison: impl ValueComparison + 'static) -> Self {
        self.comparison = Some(Arc::new(comparison));
        self
    }

    pub fn view_transformer(mut self, transformer: impl DataTransformer + 'static) -> Self {
        self.view_transformer = Some(Arc::new(transformer));
        self
    }

    pub fn norm_transformer(mut self, transformer: impl DataTransformer + 'static) -> Self {
        self.norm_transformer = Some(Arc::new(transformer));
        self
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn accepts_ranges(&self) -> bool { self.accept_ranges }

    pub fn accepts_compares(&self) -> bool { self.accept_compares }

    pub fn accepts_pattern_matchers(&self) -> bool { self.accept_pattern_matchers }

    pub fn max_values_limit(&self) -> Option<usize> { self.max_values }

    pub fn value_comparison(&self) -> Option<&dyn ValueComparison> { self.comparison.as_deref() }

    pub fn get_view_transformer(&self) -> Option<&dyn DataTransformer> { self.view_transformer.as_deref() }

    /// The norm transformer, falling back to the view transformer.
    pub fn get_norm_transformer(&self) -> Option<&dyn DataTransformer> { self.norm_transformer.as_deref().or(self.view_transformer.as_deref()) }

    /// True when the optimizer can fold consecutive values of this field into ranges.
    pub fn supports_increments(&self) -> bool { self.accept_ranges && self.value_comparison().is_some_and(|c| c.incrementer().is_some()) }

    pub fn accepts(&self, kind: ValueKind) -> bool {
        match kind {
            ValueKind::SimpleValue => self.accept_single_values,
            ValueKind::ExcludedSimpleValue => self.accept_single_values && self.accept_exclusions,
            ValueKind::Range => self.accept_ranges,
            ValueKind::ExcludedRange => self.accept_ranges && self.accept_exclusions,
            ValueKind::Comparison => self.accept_compares,
            ValueKind::PatternMatch => self.accept_pattern_matchers,
        }
    }

    pub fn view_to_model(&self, view: &str) -> Result<Value, TransformationFailed> { reverse(self.get_view_transformer(), view) }

    pub fn norm_to_model(&self, norm: &str) -> Result<Value, TransformationFailed> { reverse(self.get_norm_transformer(), norm) }

    pub fn model_to_view(&self, model: &Value) -> Result<String, TransformationFailed> { forward(self.get_view_transformer(), model) }

    pub fn model_to_norm(&self, model: &Value) -> Result<String, TransformationFailed> { forward(self.get_norm_transformer(), model) }

    /// Compares two values with the field's comparison, `None` without one or when incomparable.
    pub fn compare(&self, a: &Value, b: &Value) -> Option<Ordering> { self.value_comparison()?.compare(a, b) }

    /// Equality under the field's comparison, falling back to model equality.
    pub fn is_equal(&self, a: &Value, b: &Value) -> bool {
        match self.value_comparison() {
            Some(comparison) => comparison.is_equal(a, b),
            None => a == b,
        }
    }

    /// Lower bound must be below the upper bound; equal bounds only when both are inclusive.
    pub fn check_range(&self, range: &Range) -> Result<(), ConditionErrorKind> {
        let valid = match self.compare(&range.lower, &range.upper) {
            Some(Ordering::Less) | None => true,
            Some(Ordering::Equal) => range.inclusive_lower && range.inclusive_upper,
            Some(Ordering::Greater) => false,
        };
        if valid {
            Ok(())
        } else {
            Err(ConditionErrorKind::InvalidRange { lower: range.view_lower.clone(), upper: range.view_upper.clone() })
        }
    }

    /// Checks one value against the field's capabilities and value rules.
    pub fn check_value(&self, value: ConditionValueRef<'_>) -> Result<(), ConditionErrorKind> {
        if !self.accepts(value.kind()) {
            return Err(ConditionErrorKind::InvalidVariant(value.kind()));
        }
        match value {
            ConditionValueRef::Range(range) | ConditionValueRef::ExcludedRange(range) => self.check_range(range),
            ConditionValueRef::PatternMatch(pattern) if pattern.kind == PatternKind::Regex => {
                regex::Regex::new(&pattern.value).map(|_| ()).map_err(|e| ConditionErrorKind::InvalidPattern(e.to_string()))
            }
            _ => Ok(()),
        }
    }
}

fn reverse(transformer: Option<&dyn DataTransformer>, input: &str) -> Result<Value, TransformationFailed> {
    match transformer {
        Some(t) => t.reverse_transform(input),
        None => Ok(Value::String(input.to_owned())),
    }
}

fn forward(transformer: Option<&dyn DataTransformer>, model: &Value) -> Result<String, TransformationFailed> {
    match transformer {
        Some(t) => t.transform(model),
        None => Ok(model.to_string()),
    }
}

/// Named, ordered, read-only collection of field configurations.
#[derive(Debug, Clone)]
pub struct FieldSet {
    name: String,
    fields: IndexMap<String, FieldConfig>,
}

impl FieldSet {
    pub fn builder(name: impl Into<String>) -> FieldSetBuilder { FieldSetBuilder { name: name.into(), fields: Vec::new() } }

    pub fn name(&self) -> &str { &self.name }

    pub fn get(&self, name: &str) -> Option<&FieldConfig> { self.fields.get(name) }

    pub fn has(&self, name: &str) -> bool { self.fields.contains_key(name) }

    pub fn all(&self) -> impl Iterator<Item = &FieldConfig> { self.fields.values() }

    pub fn len(&self) -> usize { self.fields.len() }

    pub fn is_empty(&self) -> bool { self.fields.is_empty() }
}

pub struct FieldSetBuilder {
    name: String,
    fields: Vec<FieldConfig>,
}

impl FieldSetBuilder {
    pub fn field(mut self, field: FieldConfig) -> Self {
        self.fields.push(field);
        self
    }

    /// Freezes the set; field names must be unique.
    pub fn build(self) -> Result<Arc<FieldSet>, SchemaError> {
        let mut fields = IndexMap::with_capacity(self.fields.len());
        for field in self.fields {
            if fields.contains_key(field.name()) {
                return Err(SchemaError::DuplicateField(field.name));
            }
            fields.insert(field.name.clone(), field);
        }
        Ok(Arc::new(FieldSet { name: self.name, fields }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::{IntegerComparison, TextComparison};
    use crate::transformer::{DateTransformer, IntegerTransformer};

    #[test]
    fn test_duplicate_field_names_rejected() {
        let err = FieldSet::builder("users").field(FieldConfig::new("id")).field(FieldConfig::new("id")).build().unwrap_err();
        assert_eq!(err, SchemaError::DuplicateField("id".into()));
    }

    #[test]
    fn test_norm_falls_back_to_view() {
        let field = FieldConfig::new("id").view_transformer(IntegerTransformer::new().with_grouping(true));
        assert_eq!(field.norm_to_model("1,000").unwrap(), Value::Integer(1000));
        assert_eq!(field.model_to_norm(&Value::Integer(1000)).unwrap(), "1,000");

        let field = field.norm_transformer(IntegerTransformer::new());
        assert_eq!(field.model_to_view(&Value::Integer(1000)).unwrap(), "1,000");
        assert_eq!(field.model_to_norm(&Value::Integer(1000)).unwrap(), "1000");
    }

    #[test]
    fn test_no_transformer_is_identity() {
        let field = FieldConfig::new("name");
        assert_eq!(field.view_to_model("foo").unwrap(), Value::String("foo".into()));
        assert_eq!(field.model_to_view(&Value::String("foo".into())).unwrap(), "foo");
    }

    #[test]
    fn test_capabilities() {
        let field = FieldConfig::new("id").accept_ranges(true).accept_exclusions(false);
        assert!(field.accepts(ValueKind::SimpleValue));
        assert!(field.accepts(ValueKind::Range));
        assert!(!field.accepts(ValueKind::ExcludedRange));
        assert!(!field.accepts(ValueKind::Comparison));
        assert!(!field.supports_increments());
        assert!(field.comparison(IntegerComparison).supports_increments());
        assert!(!FieldConfig::new("name").accept_ranges(true).comparison(TextComparison).supports_increments());
    }

    #[test]
    fn test_range_bounds() {
        let field = FieldConfig::new("id").accept_ranges(true).comparison(IntegerComparison);
        assert!(field.check_range(&Range::new(1, 10)).is_ok());
        assert!(field.check_range(&Range::new(5, 5)).is_ok());
        assert!(field.check_range(&Range::new(5, 5).exclusive_upper()).is_err());
        assert!(field.check_range(&Range::new(10, 1)).is_err());

        let date = FieldConfig::new("date").view_transformer(DateTransformer::iso());
        assert!(date.check_range(&Range::new(10, 1)).is_ok(), "without comparison bounds are not checked");
    }
}
