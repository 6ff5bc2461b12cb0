use super::{rewrite_bags, Formatter};
use crate::ast::{Range, SearchCondition, ValuesGroup};
use crate::error::FormatterError;
use crate::field::FieldConfig;
use tracing::trace;

/// Removes repeated values from every bag and repeated sibling groups.
///
/// Values are compared with the field's comparison; the first occurrence wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateRemover;

impl Formatter for DuplicateRemover {
    fn name(&self) -> &'static str { "duplicate-remover" }

    fn format(&self, condition: SearchCondition) -> Result<SearchCondition, FormatterError> {
        let condition = rewrite_bags(condition, |field, bag| {
            let before = bag.count();
            dedup_by(&mut bag.simple_values, |a, b| field.is_equal(&a.value, &b.value));
            dedup_by(&mut bag.excluded_simple_values, |a, b| field.is_equal(&a.value, &b.value));
            dedup_by(&mut bag.ranges, |a, b| same_range(field, a, b));
            dedup_by(&mut bag.excluded_ranges, |a, b| same_range(field, a, b));
            dedup_by(&mut bag.comparisons, |a, b| a.operator == b.operator && field.is_equal(&a.value, &b.value));
            dedup_by(&mut bag.pattern_matchers, |a, b| a == b);
            if bag.count() != before {
                trace!("{}: removed {} duplicate value(s)", field.name(), before - bag.count());
            }
        });

        let field_set = condition.field_set().clone();
        let mut group = condition.into_group();
        dedup_groups(&mut group);
        Ok(SearchCondition::new(field_set, group))
    }
}

fn same_range(field: &FieldConfig, a: &Range, b: &Range) -> bool {
    a.inclusive_lower == b.inclusive_lower
        && a.inclusive_upper == b.inclusive_upper
        && field.is_equal(&a.lower, &b.lower)
        && field.is_equal(&a.upper, &b.upper)
}

/// Keeps the first of every set of equal elements, preserving order.
fn dedup_by<T>(values: &mut Vec<T>, mut same: impl FnMut(&T, &T) -> bool) {
    let mut kept: Vec<T> = Vec::with_capacity(values.len());
    for value in values.drain(..) {
        if !kept.iter().any(|k| same(k, &value)) {
            kept.push(value);
        }
    }
    *values = kept;
}

fn dedup_groups(group: &mut ValuesGroup) {
    for child in group.groups.iter_mut() {
        dedup_groups(child);
    }
    dedup_by(&mut group.groups, |a, b| a == b);
}
