mod common;
use anyhow::Result;
use common::album_fields;
use siftql::parse_condition;
use siftql_sql::{
    conversion::{DateAsText, LowerCaseField},
    platform::PostgresPlatform,
    Converter, SqlGenerationError, WhereBuilder,
};

#[test]
fn converters_are_locked_after_generation() -> Result<()> {
    let condition = parse_condition("name: Bob; released: \"03-05-2010\";", &album_fields())?;
    let mut builder = WhereBuilder::new(&condition, &PostgresPlatform);
    builder.set_field("name", "a.name")?.set_field("released", "a.released")?;
    builder.set_converter("name", Converter::field(LowerCaseField))?;
    builder.set_converter("released", Converter::value(DateAsText))?;

    let generated = builder.where_clause()?.clone();
    assert_eq!(generated.sql, "(LOWER(a.name) = $1) AND (a.released = $2)");

    let err = builder.set_converter("name", Converter::value(DateAsText)).unwrap_err();
    assert!(matches!(err, SqlGenerationError::State(_)));
    assert_eq!(builder.where_clause()?, &generated);
    Ok(())
}

#[test]
fn unknown_fields_are_rejected() -> Result<()> {
    let condition = parse_condition("name: Bob;", &album_fields())?;
    let mut builder = WhereBuilder::new(&condition, &PostgresPlatform);
    let err = builder.set_converter("genre", Converter::field(LowerCaseField)).unwrap_err();
    assert_eq!(err, SqlGenerationError::UnknownField("genre".into()));
    Ok(())
}
