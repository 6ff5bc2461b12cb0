mod common;
use chrono::NaiveDate;
use siftql::{
    field::FieldConfig,
    testing::FieldTransformationAssertion,
    transformer::{BirthdayTransformer, DateTransformer, IntegerTransformer, NumberToStringTransformer, RoundingMode},
};
use std::sync::Arc;

#[test]
fn integers() {
    FieldTransformationAssertion::new(&FieldConfig::integer("id"))
        .successful_transformation(42, "42", "42")
        .successful_transformation(-7, "-7", "-7")
        .failed_view("4.2")
        .failed_view("forty-two");

    let grouped = FieldConfig::new("population").view_transformer(IntegerTransformer::new().with_grouping(true)).norm_transformer(IntegerTransformer::new());
    FieldTransformationAssertion::new(&grouped).successful_transformation(1_234_567, "1,234,567", "1234567");
}

#[test]
fn numbers() {
    FieldTransformationAssertion::new(&FieldConfig::number("price", Some(2)))
        .successful_transformation(12.5, "12.50", "12.50")
        .view_to_model("3.14159", 3.14)
        .failed_view_with("12 apples", "The number contains unrecognized characters: \"apples\"");

    let floor = FieldConfig::new("score").view_transformer(NumberToStringTransformer::new().with_precision(0).with_rounding_mode(RoundingMode::Floor));
    FieldTransformationAssertion::new(&floor).model_to_view(9.99, "9");
}

#[test]
fn dates() {
    let day = NaiveDate::from_ymd_opt(2010, 3, 5).unwrap();
    FieldTransformationAssertion::new(&FieldConfig::date("released", "%m-%d-%Y"))
        .successful_transformation(day, "03-05-2010", "2010-03-05")
        .failed_view("2010-03-05")
        .failed_view("02-30-2010");
}

#[test]
fn birthdays() {
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let field = FieldConfig::new("birthday")
        .view_transformer(BirthdayTransformer::new(Arc::new(DateTransformer::new("%m-%d-%Y"))).with_today(today))
        .norm_transformer(BirthdayTransformer::new(Arc::new(DateTransformer::iso())).with_today(today));
    FieldTransformationAssertion::new(&field)
        .successful_transformation(NaiveDate::from_ymd_opt(1990, 12, 24).unwrap(), "12-24-1990", "1990-12-24")
        .successful_transformation(33, "33", "33")
        .failed_view("01-01-2030");
}
