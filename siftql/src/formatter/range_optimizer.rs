use super::{rewrite_bags, Formatter};
use crate::ast::{Range, SearchCondition};
use crate::error::FormatterError;
use crate::field::FieldConfig;
use crate::value::Value;
use std::cmp::Ordering;

/// Drops values already covered by a range of the same bag.
///
/// Single values inside a range and ranges inside another range are removed; excluded
/// values and excluded ranges are treated the same way against the excluded ranges.
/// Fields without a comparison are left untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeOptimizer;

impl Formatter for RangeOptimizer {
    fn name(&self) -> &'static str { "range-optimizer" }

    fn format(&self, condition: SearchCondition) -> Result<SearchCondition, FormatterError> {
        Ok(rewrite_bags(condition, |field, bag| {
            if field.value_comparison().is_none() {
                return;
            }
            bag.ranges = drop_contained(field, std::mem::take(&mut bag.ranges));
            bag.excluded_ranges = drop_contained(field, std::mem::take(&mut bag.excluded_ranges));

            let ranges = &bag.ranges;
            bag.simple_values.retain(|v| !ranges.iter().any(|r| covers(field, r, &v.value)));
            let excluded = &bag.excluded_ranges;
            bag.excluded_simple_values.retain(|v| !excluded.iter().any(|r| covers(field, r, &v.value)));
        }))
    }
}

fn covers(field: &FieldConfig, range: &Range, value: &Value) -> bool {
    let above_lower = match field.compare(&range.lower, value) {
        Some(Ordering::Less) => true,
        Some(Ordering::Equal) => range.inclusive_lower,
        _ => false,
    };
    let below_upper = match field.compare(value, &range.upper) {
        Some(Ordering::Less) => true,
        Some(Ordering::Equal) => range.inclusive_upper,
        _ => false,
    };
    above_lower && below_upper
}

/// True when `outer` contains every value of `inner`.
fn contains(field: &FieldConfig, outer: &Range, inner: &Range) -> bool {
    let lower = match field.compare(&outer.lower, &inner.lower) {
        Some(Ordering::Less) => true,
        Some(Ordering::Equal) => outer.inclusive_lower || !inner.inclusive_lower,
        _ => false,
    };
    let upper = match field.compare(&inner.upper, &outer.upper) {
        Some(Ordering::Less) => true,
        Some(Ordering::Equal) => outer.inclusive_upper || !inner.inclusive_upper,
        _ => false,
    };
    lower && upper
}

/// Removes ranges contained in another range; of two identical ranges the first is kept.
fn drop_contained(field: &FieldConfig, ranges: Vec<Range>) -> Vec<Range> {
    let keep: Vec<bool> = (0..ranges.len())
        .map(|i| {
            !ranges.iter().enumerate().any(|(j, other)| {
                i != j && contains(field, other, &ranges[i]) && (!contains(field, &ranges[i], other) || j < i)
            })
        })
        .collect();
    ranges.into_iter().zip(keep).filter_map(|(range, keep)| keep.then_some(range)).collect()
}
