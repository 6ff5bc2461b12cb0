//! Assertion helpers for testing field configurations.

use crate::field::FieldConfig;
use crate::value::Value;

/// Fluent assertions over the view/norm/model transformations of one field.
///
/// ```rust
/// use siftql::{field::FieldConfig, testing::FieldTransformationAssertion};
///
/// FieldTransformationAssertion::new(&FieldConfig::date("date", "%m-%d-%Y"))
///     .successful_transformation(chrono::NaiveDate::from_ymd_opt(2010, 3, 5).unwrap(), "03-05-2010", "2010-03-05")
///     .failed_view("13-45-2010");
/// ```
pub struct FieldTransformationAssertion<'a> {
    field: &'a FieldConfig,
}

impl<'a> FieldTransformationAssertion<'a> {
    pub fn new(field: &'a FieldConfig) -> Self { Self { field } }

    #[track_caller]
    pub fn view_to_model(self, view: &str, expected: impl Into<Value>) -> Self {
        match self.field.view_to_model(view) {
            Ok(model) => assert_eq!(model, expected.into(), "{}: view {:?} to model", self.field.name(), view),
            Err(e) => panic!("{}: view {:?} failed to transform: {}", self.field.name(), view, e),
        }
        self
    }

    #[track_caller]
    pub fn norm_to_model(self, norm: &str, expected: impl Into<Value>) -> Self {
        match self.field.norm_to_model(norm) {
            Ok(model) => assert_eq!(model, expected.into(), "{}: norm {:?} to model", self.field.name(), norm),
            Err(e) => panic!("{}: norm {:?} failed to transform: {}", self.field.name(), norm, e),
        }
        self
    }

    #[track_caller]
    pub fn model_to_view(self, model: impl Into<Value>, expected: &str) -> Self {
        let model = model.into();
        match self.field.model_to_view(&model) {
            Ok(view) => assert_eq!(view, expected, "{}: model {:?} to view", self.field.name(), model),
            Err(e) => panic!("{}: model {:?} failed to transform to view: {}", self.field.name(), model, e),
        }
        self
    }

    #[track_caller]
    pub fn model_to_norm(self, model: impl Into<Value>, expected: &str) -> Self {
        let model = model.into();
        match self.field.model_to_norm(&model) {
            Ok(norm) => assert_eq!(norm, expected, "{}: model {:?} to norm", self.field.name(), model),
            Err(e) => panic!("{}: model {:?} failed to transform to norm: {}", self.field.name(), model, e),
        }
        self
    }

    /// Checks all four directions at once.
    #[track_caller]
    pub fn successful_transformation(self, model: impl Into<Value>, view: &str, norm: &str) -> Self {
        let model = model.into();
        self.view_to_model(view, model.clone()).norm_to_model(norm, model.clone()).model_to_view(model.clone(), view).model_to_norm(model, norm)
    }

    #[track_caller]
    pub fn failed_view(self, view: &str) -> Self {
        if let Ok(model) = self.field.view_to_model(view) {
            panic!("{}: view {:?} was expected to fail but gave {:?}", self.field.name(), view, model);
        }
        self
    }

    /// Expects the view to fail with exactly `message`.
    #[track_caller]
    pub fn failed_view_with(self, view: &str, message: &str) -> Self {
        match self.field.view_to_model(view) {
            Ok(model) => panic!("{}: view {:?} was expected to fail but gave {:?}", self.field.name(), view, model),
            Err(e) => assert_eq!(e.message, message, "{}: failure message for view {:?}", self.field.name(), view),
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformer::{BirthdayTransformer, DateTransformer};
    use chrono::NaiveDate;
    use std::sync::Arc;

    #[test]
    fn test_integer_field() {
        FieldTransformationAssertion::new(&FieldConfig::integer("id")).successful_transformation(1000, "1000", "1000").failed_view("10.5");
    }

    #[test]
    fn test_birthday_age_disabled() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let field = FieldConfig::new("birthday").view_transformer(BirthdayTransformer::new(Arc::new(DateTransformer::iso())).allow_age(false).with_today(today));
        FieldTransformationAssertion::new(&field)
            .view_to_model("2000-01-01", NaiveDate::from_ymd_opt(2000, 1, 1).unwrap())
            .failed_view_with("42", "Age support is not enabled.");
    }

    #[test]
    #[should_panic(expected = "was expected to fail")]
    fn test_unexpected_success_panics() { FieldTransformationAssertion::new(&FieldConfig::text("name")).failed_view("anything"); }
}
