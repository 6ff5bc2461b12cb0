//! Ready-made field configurations for the common value types.

use crate::comparison::{BirthdayComparison, DateComparison, IntegerComparison, NumberComparison, TextComparison};
use crate::field::FieldConfig;
use crate::transformer::{BirthdayTransformer, DateTransformer, IntegerTransformer, NumberToStringTransformer};
use std::sync::Arc;

impl FieldConfig {
    /// Whole numbers with ranges and comparisons; consecutive values fold into ranges.
    pub fn integer(name: impl Into<String>) -> Self {
        FieldConfig::new(name).comparison(IntegerComparison).view_transformer(IntegerTransformer::new()).accept_ranges(true).accept_compares(true)
    }

    pub fn number(name: impl Into<String>, precision: Option<u32>) -> Self {
        let transformer = match precision {
            Some(precision) => NumberToStringTransformer::new().with_precision(precision),
            None => NumberToStringTransformer::new(),
        };
        FieldConfig::new(name).comparison(NumberComparison).view_transformer(transformer).accept_ranges(true).accept_compares(true)
    }

    pub fn text(name: impl Into<String>) -> Self { FieldConfig::new(name).comparison(TextComparison).accept_pattern_matchers(true) }

    /// Dates shown in `view_format`, normalized as `%Y-%m-%d`.
    pub fn date(name: impl Into<String>, view_format: &str) -> Self {
        FieldConfig::new(name)
            .comparison(DateComparison)
            .view_transformer(DateTransformer::new(view_format))
            .norm_transformer(DateTransformer::iso())
            .accept_ranges(true)
            .accept_compares(true)
    }

    /// Birthdays given as a date (`view_format`) or as an age.
    pub fn birthday(name: impl Into<String>, view_format: &str) -> Self {
        FieldConfig::new(name)
            .comparison(BirthdayComparison)
            .view_transformer(BirthdayTransformer::new(Arc::new(DateTransformer::new(view_format))))
            .norm_transformer(BirthdayTransformer::new(Arc::new(DateTransformer::iso())))
            .accept_ranges(true)
            .accept_compares(true)
    }
}
