use super::Formatter;
use crate::ast::{SearchCondition, ValuesGroup};
use crate::config::ProcessorConfig;
use crate::error::{ConditionError, ConditionErrorKind, FormatterError, OverflowError, ValidationError};
use crate::field::FieldSet;
use tracing::debug;

/// Checks a condition against its field set and the processor limits.
///
/// Reports every violation, not just the first one.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ProcessorConfig,
}

impl Validator {
    pub fn new(config: ProcessorConfig) -> Self { Self { config } }

    pub fn validate(&self, condition: &SearchCondition) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        self.validate_group(condition.field_set(), condition.group(), 0, &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            debug!("condition has {} violation(s)", errors.len());
            Err(ValidationError { errors })
        }
    }

    fn validate_group(&self, field_set: &FieldSet, group: &ValuesGroup, level: usize, errors: &mut Vec<ConditionError>) {
        for (name, bag) in &group.fields {
            let Some(field) = field_set.get(name) else {
                errors.push(ConditionError::for_field(name.as_str(), ConditionErrorKind::UnknownField));
                continue;
            };
            for value in bag.iter() {
                if let Err(kind) = field.check_value(value) {
                    errors.push(ConditionError::for_field(name.as_str(), kind));
                }
            }
            let limit = field.max_values_limit().map_or(self.config.max_values, |max| max.min(self.config.max_values));
            if bag.count() > limit {
                errors.push(ConditionError::for_field(name.as_str(), OverflowError::TooManyValues { field: name.clone(), max: limit }));
            }
        }

        if group.groups.len() > self.config.max_groups {
            errors.push(ConditionError::new(OverflowError::TooManyGroups { max: self.config.max_groups }));
        }
        if !group.groups.is_empty() && level + 1 > self.config.max_nesting_level {
            errors.push(ConditionError::new(OverflowError::GroupsNestingTooDeep { max: self.config.max_nesting_level }));
            return;
        }
        for child in &group.groups {
            self.validate_group(field_set, child, level + 1, errors);
        }
    }
}

impl Formatter for Validator {
    fn name(&self) -> &'static str { "validator" }

    fn format(&self, condition: SearchCondition) -> Result<SearchCondition, FormatterError> {
        self.validate(&condition).map_err(|source| FormatterError { formatter: self.name(), source })?;
        Ok(condition)
    }
}
