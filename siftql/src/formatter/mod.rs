//! Formatter passes rewrite a [`SearchCondition`] into an equivalent, usually smaller one.
//!
//! Passes are independent and composed by a [`ChainFormatter`], which applies them in order
//! and stops at the first failure. Only the [`Validator`] can fail.

mod duplicate_remover;
mod range_optimizer;
mod validator;
mod values_to_range;

pub use duplicate_remover::DuplicateRemover;
pub use range_optimizer::RangeOptimizer;
pub use validator::Validator;
pub use values_to_range::ValuesToRange;

use crate::ast::{SearchCondition, ValuesBag, ValuesGroup};
use crate::error::FormatterError;
use crate::field::{FieldConfig, FieldSet};
use std::fmt::Debug;
use tracing::trace;

pub trait Formatter: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn format(&self, condition: SearchCondition) -> Result<SearchCondition, FormatterError>;
}

/// Ordered list of formatters applied one after another.
#[derive(Debug, Default)]
pub struct ChainFormatter {
    formatters: Vec<Box<dyn Formatter>>,
}

impl ChainFormatter {
    pub fn new() -> Self { Self::default() }

    /// Validator, DuplicateRemover, ValuesToRange, RangeOptimizer.
    pub fn standard() -> Self {
        Self::new().with(Validator::default()).with(DuplicateRemover).with(ValuesToRange).with(RangeOptimizer)
    }

    pub fn with(mut self, formatter: impl Formatter + 'static) -> Self {
        self.formatters.push(Box::new(formatter));
        self
    }

    pub fn len(&self) -> usize { self.formatters.len() }

    pub fn is_empty(&self) -> bool { self.formatters.is_empty() }
}

impl Formatter for ChainFormatter {
    fn name(&self) -> &'static str { "chain" }

    fn format(&self, condition: SearchCondition) -> Result<SearchCondition, FormatterError> {
        self.formatters.iter().try_fold(condition, |condition, formatter| {
            trace!("applying formatter {}", formatter.name());
            formatter.format(condition)
        })
    }
}

/// Calls `f` for every non-empty bag of a known field, depth first.
pub(crate) fn for_each_bag(group: &mut ValuesGroup, field_set: &FieldSet, f: &mut impl FnMut(&FieldConfig, &mut ValuesBag)) {
    for (name, bag) in group.fields.iter_mut() {
        if let Some(field) = field_set.get(name) {
            if !bag.is_empty() {
                f(field, bag);
            }
        }
    }
    for child in group.groups.iter_mut() {
        for_each_bag(child, field_set, f);
    }
}

/// Applies an in-place rewrite to every bag and rebuilds the condition.
pub(crate) fn rewrite_bags(condition: SearchCondition, mut f: impl FnMut(&FieldConfig, &mut ValuesBag)) -> SearchCondition {
    let field_set = condition.field_set().clone();
    let mut group = condition.into_group();
    for_each_bag(&mut group, &field_set, &mut f);
    SearchCondition::new(field_set, group)
}
