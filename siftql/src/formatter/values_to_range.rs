use super::{rewrite_bags, Formatter};
use crate::ast::{Range, SearchCondition, SingleValue};
use crate::error::FormatterError;
use crate::field::FieldConfig;
use std::cmp::Ordering;
use tracing::{debug, trace};

/// Folds runs of consecutive single values into inclusive ranges.
///
/// Only fields accepting ranges whose comparison can increment take part, e.g. the integer
/// values `1, 2, 3, 7, 9, 10, 11` become `1-3, 7, 9-11`. Excluded values fold into
/// excluded ranges the same way. Values equal under the field's comparison collapse to
/// the first one given; values that are not part of a run keep their order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValuesToRange;

impl Formatter for ValuesToRange {
    fn name(&self) -> &'static str { "values-to-range" }

    fn format(&self, condition: SearchCondition) -> Result<SearchCondition, FormatterError> {
        if !condition.field_set().all().any(FieldConfig::supports_increments) {
            trace!("no field of {} supports increments, skipping", condition.field_set().name());
            return Ok(condition);
        }

        Ok(rewrite_bags(condition, |field, bag| {
            if !field.supports_increments() {
                return;
            }
            let (singles, ranges) = fold(field, std::mem::take(&mut bag.simple_values));
            bag.simple_values = singles;
            bag.ranges.extend(ranges);

            let (singles, ranges) = fold(field, std::mem::take(&mut bag.excluded_simple_values));
            bag.excluded_simple_values = singles;
            bag.excluded_ranges.extend(ranges);
        }))
    }
}

/// Splits `values` into the values left alone and the ranges built from runs of two or more.
fn fold(field: &FieldConfig, values: Vec<SingleValue>) -> (Vec<SingleValue>, Vec<Range>) {
    let Some(incrementer) = field.value_comparison().and_then(|c| c.incrementer()) else {
        return (values, Vec::new());
    };
    if values.len() < 2 {
        return (values, Vec::new());
    }

    // values of different kinds never compare, so kinds are kept apart before ordering
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        let (a, b) = (&values[a].value, &values[b].value);
        a.type_name().cmp(b.type_name()).then_with(|| field.compare(a, b).unwrap_or(Ordering::Equal))
    });

    // distinct values in ascending order, each with every index holding it
    let mut distinct: Vec<Vec<usize>> = Vec::new();
    for index in order {
        match distinct.last_mut() {
            Some(same) if field.is_equal(&values[same[0]].value, &values[index].value) => same.push(index),
            _ => distinct.push(vec![index]),
        }
    }

    let mut dropped = vec![false; values.len()];
    for indices in &distinct {
        for &index in &indices[1..] {
            dropped[index] = true;
        }
    }

    let mut ranges = Vec::new();
    let mut start = 0;
    while start < distinct.len() {
        let mut end = start;
        while end + 1 < distinct.len() {
            let current = &values[distinct[end][0]].value;
            let next = &values[distinct[end + 1][0]].value;
            match incrementer.increment(current) {
                Some(successor) if field.is_equal(&successor, next) => end += 1,
                _ => break,
            }
        }

        if end > start {
            let lower = &values[distinct[start][0]];
            let upper = &values[distinct[end][0]];
            trace!("folding {} value(s) of {} into {}-{}", end - start + 1, field.name(), lower.view, upper.view);
            ranges.push(Range::new(lower.value.clone(), upper.value.clone()).with_views(lower.view.clone(), upper.view.clone()));
            for indices in &distinct[start..=end] {
                for &index in indices {
                    dropped[index] = true;
                }
            }
        }
        start = end + 1;
    }

    if !ranges.is_empty() {
        debug!("{}: folded values into {} range(s)", field.name(), ranges.len());
    }
    let remaining = values.into_iter().zip(dropped).filter_map(|(value, dropped)| (!dropped).then_some(value)).collect();
    (remaining, ranges)
}
