use crate::field::FieldSet;
use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GroupLogical {
    #[default]
    And,
    Or,
}

impl GroupLogical {
    pub fn as_sql(&self) -> &'static str {
        match self {
            GroupLogical::And => "AND",
            GroupLogical::Or => "OR",
        }
    }
}

/// A single model value together with the view string it was read from.
///
/// Equality only considers the model value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleValue {
    pub value: Value,
    pub view: String,
}

impl SingleValue {
    pub fn new(value: impl Into<Value>, view: impl Into<String>) -> Self { Self { value: value.into(), view: view.into() } }

    /// Uses the model value's display form as the view.
    pub fn from_value(value: impl Into<Value>) -> Self {
        let value = value.into();
        let view = value.to_string();
        Self { value, view }
    }
}

impl PartialEq for SingleValue {
    fn eq(&self, other: &Self) -> bool { self.value == other.value }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Range {
    pub lower: Value,
    pub upper: Value,
    pub inclusive_lower: bool,
    pub inclusive_upper: bool,
    pub view_lower: String,
    pub view_upper: String,
}

impl Range {
    /// An inclusive range.
    pub fn new(lower: impl Into<Value>, upper: impl Into<Value>) -> Self {
        let (lower, upper) = (lower.into(), upper.into());
        let (view_lower, view_upper) = (lower.to_string(), upper.to_string());
        Self { lower, upper, inclusive_lower: true, inclusive_upper: true, view_lower, view_upper }
    }

    pub fn with_views(mut self, view_lower: impl Into<String>, view_upper: impl Into<String>) -> Self {
        self.view_lower = view_lower.into();
        self.view_upper = view_upper.into();
        self
    }

    pub fn exclusive_lower(mut self) -> Self {
        self.inclusive_lower = false;
        self
    }

    pub fn exclusive_upper(mut self) -> Self {
        self.inclusive_upper = false;
        self
    }
}

impl PartialEq for Range {
    fn eq(&self, other: &Self) -> bool {
        self.lower == other.lower
            && self.upper == other.upper
            && self.inclusive_lower == other.inclusive_lower
            && self.inclusive_upper == other.inclusive_upper
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOperator {
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "<")]
    Lower,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<=")]
    LowerOrEqual,
    #[serde(rename = "<>")]
    NotEqual,
}

impl CompareOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOperator::Greater => ">",
            CompareOperator::Lower => "<",
            CompareOperator::GreaterOrEqual => ">=",
            CompareOperator::LowerOrEqual => "<=",
            CompareOperator::NotEqual => "<>",
        }
    }

    pub fn parse(operator: &str) -> Option<Self> {
        Some(match operator {
            ">" => CompareOperator::Greater,
            "<" => CompareOperator::Lower,
            ">=" => CompareOperator::GreaterOrEqual,
            "<=" => CompareOperator::LowerOrEqual,
            "<>" => CompareOperator::NotEqual,
            _ => return None,
        })
    }

    /// `<>` narrows the result set, so it joins with AND rather than OR.
    pub fn is_exclusive(&self) -> bool { matches!(self, CompareOperator::NotEqual) }
}

impl fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Compare {
    pub value: Value,
    pub operator: CompareOperator,
    pub view: String,
}

impl Compare {
    pub fn new(value: impl Into<Value>, operator: CompareOperator) -> Self {
        let value = value.into();
        let view = value.to_string();
        Self { value, operator, view }
    }

    pub fn with_view(mut self, view: impl Into<String>) -> Self {
        self.view = view.into();
        self
    }
}

impl PartialEq for Compare {
    fn eq(&self, other: &Self) -> bool { self.value == other.value && self.operator == other.operator }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternKind {
    Contains,
    StartsWith,
    EndsWith,
    Regex,
    Equals,
}

impl PatternKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::Contains => "CONTAINS",
            PatternKind::StartsWith => "STARTS_WITH",
            PatternKind::EndsWith => "ENDS_WITH",
            PatternKind::Regex => "REGEX",
            PatternKind::Equals => "EQUALS",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatternMatch {
    pub value: String,
    pub kind: PatternKind,
    pub negated: bool,
    pub case_insensitive: bool,
}

impl PatternMatch {
    pub fn new(value: impl Into<String>, kind: PatternKind) -> Self {
        Self { value: value.into(), kind, negated: false, case_insensitive: false }
    }

    pub fn negated(mut self) -> Self {
        self.negated = true;
        self
    }

    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    /// The exported type name, e.g. `CONTAINS` or `NOT_ENDS_WITH`.
    pub fn type_name(&self) -> String {
        if self.negated {
            format!("NOT_{}", self.kind.as_str())
        } else {
            self.kind.as_str().to_owned()
        }
    }

    /// Inverse of [`PatternMatch::type_name`], returns `(kind, negated)`.
    pub fn parse_type_name(name: &str) -> Option<(PatternKind, bool)> {
        let (negated, name) = match name.strip_prefix("NOT_") {
            Some(rest) => (true, rest),
            None => (false, name),
        };
        let kind = match name {
            "CONTAINS" => PatternKind::Contains,
            "STARTS_WITH" => PatternKind::StartsWith,
            "ENDS_WITH" => PatternKind::EndsWith,
            "REGEX" => PatternKind::Regex,
            "EQUALS" => PatternKind::Equals,
            _ => return None,
        };
        Some((kind, negated))
    }
}

/// Tag of the six value variants a bag can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    SimpleValue,
    ExcludedSimpleValue,
    Range,
    ExcludedRange,
    Comparison,
    PatternMatch,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueKind::SimpleValue => "simple",
            ValueKind::ExcludedSimpleValue => "excluded simple",
            ValueKind::Range => "range",
            ValueKind::ExcludedRange => "excluded range",
            ValueKind::Comparison => "comparison",
            ValueKind::PatternMatch => "pattern-match",
        })
    }
}

/// One value of any variant, the unit the input processors hand to a bag.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionValue {
    Single(SingleValue),
    ExcludedSingle(SingleValue),
    Range(Range),
    ExcludedRange(Range),
    Compare(Compare),
    PatternMatch(PatternMatch),
}

impl ConditionValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            ConditionValue::Single(_) => ValueKind::SimpleValue,
            ConditionValue::ExcludedSingle(_) => ValueKind::ExcludedSimpleValue,
            ConditionValue::Range(_) => ValueKind::Range,
            ConditionValue::ExcludedRange(_) => ValueKind::ExcludedRange,
            ConditionValue::Compare(_) => ValueKind::Comparison,
            ConditionValue::PatternMatch(_) => ValueKind::PatternMatch,
        }
    }

    pub fn as_ref(&self) -> ConditionValueRef<'_> {
        match self {
            ConditionValue::Single(v) => ConditionValueRef::Single(v),
            ConditionValue::ExcludedSingle(v) => ConditionValueRef::ExcludedSingle(v),
            ConditionValue::Range(v) => ConditionValueRef::Range(v),
            ConditionValue::ExcludedRange(v) => ConditionValueRef::ExcludedRange(v),
            ConditionValue::Compare(v) => ConditionValueRef::Compare(v),
            ConditionValue::PatternMatch(v) => ConditionValueRef::PatternMatch(v),
        }
    }
}

/// Borrowed view over one value of a bag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConditionValueRef<'a> {
    Single(&'a SingleValue),
    ExcludedSingle(&'a SingleValue),
    Range(&'a Range),
    ExcludedRange(&'a Range),
    Compare(&'a Compare),
    PatternMatch(&'a PatternMatch),
}

impl ConditionValueRef<'_> {
    pub fn kind(&self) -> ValueKind {
        match self {
            ConditionValueRef::Single(_) => ValueKind::SimpleValue,
            ConditionValueRef::ExcludedSingle(_) => ValueKind::ExcludedSimpleValue,
            ConditionValueRef::Range(_) => ValueKind::Range,
            ConditionValueRef::ExcludedRange(_) => ValueKind::ExcludedRange,
            ConditionValueRef::Compare(_) => ValueKind::Comparison,
            ConditionValueRef::PatternMatch(_) => ValueKind::PatternMatch,
        }
    }
}

/// All values of one field within one group, kept per variant in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuesBag {
    pub simple_values: Vec<SingleValue>,
    pub excluded_simple_values: Vec<SingleValue>,
    pub ranges: Vec<Range>,
    pub excluded_ranges: Vec<Range>,
    pub comparisons: Vec<Compare>,
    pub pattern_matchers: Vec<PatternMatch>,
}

impl ValuesBag {
    pub fn new() -> Self { Self::default() }

    pub fn add(&mut self, value: ConditionValue) -> &mut Self {
        match value {
            ConditionValue::Single(v) => self.simple_values.push(v),
            ConditionValue::ExcludedSingle(v) => self.excluded_simple_values.push(v),
            ConditionValue::Range(v) => self.ranges.push(v),
            ConditionValue::ExcludedRange(v) => self.excluded_ranges.push(v),
            ConditionValue::Compare(v) => self.comparisons.push(v),
            ConditionValue::PatternMatch(v) => self.pattern_matchers.push(v),
        }
        self
    }

    /// Builder form of [`ValuesBag::add`].
    pub fn with(mut self, value: ConditionValue) -> Self {
        self.add(value);
        self
    }

    pub fn simple(self, value: impl Into<Value>) -> Self { self.with(ConditionValue::Single(SingleValue::from_value(value))) }

    pub fn excluded_simple(self, value: impl Into<Value>) -> Self {
        self.with(ConditionValue::ExcludedSingle(SingleValue::from_value(value)))
    }

    pub fn range(self, range: Range) -> Self { self.with(ConditionValue::Range(range)) }

    pub fn excluded_range(self, range: Range) -> Self { self.with(ConditionValue::ExcludedRange(range)) }

    pub fn compare(self, compare: Compare) -> Self { self.with(ConditionValue::Compare(compare)) }

    pub fn pattern_match(self, pattern: PatternMatch) -> Self { self.with(ConditionValue::PatternMatch(pattern)) }

    /// Iterates all values, variant by variant, each in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = ConditionValueRef<'_>> {
        self.simple_values
            .iter()
            .map(ConditionValueRef::Single)
            .chain(self.excluded_simple_values.iter().map(ConditionValueRef::ExcludedSingle))
            .chain(self.ranges.iter().map(ConditionValueRef::Range))
            .chain(self.excluded_ranges.iter().map(ConditionValueRef::ExcludedRange))
            .chain(self.comparisons.iter().map(ConditionValueRef::Compare))
            .chain(self.pattern_matchers.iter().map(ConditionValueRef::PatternMatch))
    }

    pub fn count_of(&self, kind: ValueKind) -> usize {
        match kind {
            ValueKind::SimpleValue => self.simple_values.len(),
            ValueKind::ExcludedSimpleValue => self.excluded_simple_values.len(),
            ValueKind::Range => self.ranges.len(),
            ValueKind::ExcludedRange => self.excluded_ranges.len(),
            ValueKind::Comparison => self.comparisons.len(),
            ValueKind::PatternMatch => self.pattern_matchers.len(),
        }
    }

    pub fn has(&self, kind: ValueKind) -> bool { self.count_of(kind) > 0 }

    pub fn count(&self) -> usize {
        self.simple_values.len()
            + self.excluded_simple_values.len()
            + self.ranges.len()
            + self.excluded_ranges.len()
            + self.comparisons.len()
            + self.pattern_matchers.len()
    }

    pub fn is_empty(&self) -> bool { self.count() == 0 }

    /// Copy of the bag with every value of `kind` removed.
    pub fn without(&self, kind: ValueKind) -> Self {
        let mut bag = self.clone();
        match kind {
            ValueKind::SimpleValue => bag.simple_values.clear(),
            ValueKind::ExcludedSimpleValue => bag.excluded_simple_values.clear(),
            ValueKind::Range => bag.ranges.clear(),
            ValueKind::ExcludedRange => bag.excluded_ranges.clear(),
            ValueKind::Comparison => bag.comparisons.clear(),
            ValueKind::PatternMatch => bag.pattern_matchers.clear(),
        }
        bag
    }
}

/// A node of the condition tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuesGroup {
    pub logical: GroupLogical,
    pub fields: IndexMap<String, ValuesBag>,
    pub groups: Vec<ValuesGroup>,
}

impl ValuesGroup {
    pub fn new() -> Self { Self::default() }

    pub fn with_logical(logical: GroupLogical) -> Self { Self { logical, ..Self::default() } }

    pub fn field(mut self, name: impl Into<String>, values: ValuesBag) -> Self {
        self.add_field(name, values);
        self
    }

    pub fn group(mut self, group: ValuesGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Adds the values to the field's bag, merging with values already present.
    pub fn add_field(&mut self, name: impl Into<String>, values: ValuesBag) {
        let bag = self.fields.entry(name.into()).or_default();
        bag.simple_values.extend(values.simple_values);
        bag.excluded_simple_values.extend(values.excluded_simple_values);
        bag.ranges.extend(values.ranges);
        bag.excluded_ranges.extend(values.excluded_ranges);
        bag.comparisons.extend(values.comparisons);
        bag.pattern_matchers.extend(values.pattern_matchers);
    }

    pub fn get_field(&self, name: &str) -> Option<&ValuesBag> { self.fields.get(name) }

    pub fn has_field(&self, name: &str) -> bool { self.fields.get(name).is_some_and(|bag| !bag.is_empty()) }

    /// Total number of values in this group and all descendants.
    pub fn count_values(&self) -> usize {
        self.fields.values().map(ValuesBag::count).sum::<usize>() + self.groups.iter().map(ValuesGroup::count_values).sum::<usize>()
    }

    /// Nesting depth, where a group without subgroups has depth 0.
    pub fn depth(&self) -> usize { self.groups.iter().map(|g| g.depth() + 1).max().unwrap_or(0) }

    pub fn is_empty(&self) -> bool { self.fields.values().all(ValuesBag::is_empty) && self.groups.is_empty() }
}

/// A field set paired with the root group; the unit passed between stages.
#[derive(Debug, Clone)]
pub struct SearchCondition {
    field_set: Arc<FieldSet>,
    group: ValuesGroup,
}

impl SearchCondition {
    pub fn new(field_set: Arc<FieldSet>, group: ValuesGroup) -> Self { Self { field_set, group } }

    pub fn field_set(&self) -> &Arc<FieldSet> { &self.field_set }

    pub fn group(&self) -> &ValuesGroup { &self.group }

    pub fn into_group(self) -> ValuesGroup { self.group }

    /// Returns a condition over the same field set with a replaced root group.
    pub fn with_group(self, group: ValuesGroup) -> Self { Self { field_set: self.field_set, group } }

    pub fn is_empty(&self) -> bool { self.group.is_empty() }
}

impl PartialEq for SearchCondition {
    fn eq(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.field_set, &other.field_set) || self.field_set.name() == other.field_set.name()) && self.group == other.group
    }
}
