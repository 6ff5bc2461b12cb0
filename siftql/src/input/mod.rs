//! Input processors turn an external representation into a [`SearchCondition`].
//!
//! Processing never stops at the first problem: every processor records its errors in a
//! [`ProcessingContext`] and only hands out a condition when the whole input was clean.

mod array;

pub use array::{ArrayInput, JsonInput};

use crate::ast::{ConditionValue, SearchCondition, ValuesBag, ValuesGroup};
use crate::config::ProcessorConfig;
use crate::error::{ConditionError, ConditionErrorKind, InputProcessingError, OverflowError};
use crate::field::{FieldConfig, FieldSet};
use crate::value::Value;
use std::sync::Arc;
use tracing::debug;

pub trait InputProcessor {
    type Input: ?Sized;

    fn process(&self, field_set: &Arc<FieldSet>, input: &Self::Input) -> Result<SearchCondition, InputProcessingError>;
}

/// Which string form an input carries its values in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Representation {
    View,
    Norm,
}

/// Error accumulation and limit bookkeeping shared by all input processors.
pub(crate) struct ProcessingContext<'a> {
    field_set: &'a FieldSet,
    config: &'a ProcessorConfig,
    errors: Vec<ConditionError>,
}

impl<'a> ProcessingContext<'a> {
    pub fn new(field_set: &'a FieldSet, config: &'a ProcessorConfig) -> Self { Self { field_set, config, errors: Vec::new() } }

    pub fn error(&mut self, error: ConditionError) {
        debug!("input error: {}", error);
        self.errors.push(error);
    }

    fn located(field: &str, kind: impl Into<ConditionErrorKind>, offset: Option<usize>) -> ConditionError {
        with_offset(ConditionError::for_field(field, kind), offset)
    }

    /// Resolves a field name, recording an error for unknown fields.
    pub fn field(&mut self, name: &str, offset: Option<usize>) -> Option<&'a FieldConfig> {
        let field = self.field_set.get(name);
        if field.is_none() {
            self.error(Self::located(name, ConditionErrorKind::UnknownField, offset));
        }
        field
    }

    /// Converts an input string to its model value, recording transformation failures.
    pub fn to_model(&mut self, field: &FieldConfig, input: &str, representation: Representation, offset: Option<usize>) -> Option<Value> {
        let result = match representation {
            Representation::View => field.view_to_model(input),
            Representation::Norm => field.norm_to_model(input),
        };
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.error(Self::located(field.name(), e, offset));
                None
            }
        }
    }

    /// Adds a value to the field's bag once it passed the field's checks and limits.
    ///
    /// The value that first exceeds the limit is recorded as an overflow; later ones are dropped silently.
    pub fn add_value(&mut self, field: &FieldConfig, bag: &mut ValuesBag, value: ConditionValue, offset: Option<usize>) {
        let limit = field.max_values_limit().map_or(self.config.max_values, |max| max.min(self.config.max_values));
        let count = bag.count();
        if count > limit {
            return;
        }
        if let Err(kind) = field.check_value(value.as_ref()) {
            self.error(Self::located(field.name(), kind, offset));
            return;
        }
        if count == limit {
            let overflow = OverflowError::TooManyValues { field: field.name().to_owned(), max: limit };
            self.error(Self::located(field.name(), overflow, offset));
        }
        bag.add(value);
    }

    /// Checks whether the `position`th subgroup (1-based) at nesting `level` may be built.
    pub fn enter_group(&mut self, position: usize, level: usize, offset: Option<usize>) -> bool {
        let max_groups = self.config.max_groups;
        if position > max_groups {
            if position == max_groups + 1 {
                self.error(with_offset(ConditionError::new(OverflowError::TooManyGroups { max: max_groups }), offset));
            }
            return false;
        }
        if level > self.config.max_nesting_level {
            let overflow = OverflowError::GroupsNestingTooDeep { max: self.config.max_nesting_level };
            self.error(with_offset(ConditionError::new(overflow), offset));
            return false;
        }
        true
    }

    pub fn finish(self, field_set: &Arc<FieldSet>, group: ValuesGroup) -> Result<SearchCondition, InputProcessingError> {
        if self.errors.is_empty() {
            Ok(SearchCondition::new(field_set.clone(), group))
        } else {
            debug!("input rejected with {} error(s)", self.errors.len());
            Err(InputProcessingError { errors: self.errors })
        }
    }
}

fn with_offset(error: ConditionError, offset: Option<usize>) -> ConditionError {
    match offset {
        Some(offset) => error.at(offset),
        None => error,
    }
}
