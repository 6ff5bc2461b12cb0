mod common;
use anyhow::Result;
use siftql::{
    ast::{CompareOperator, PatternKind},
    error::{ConditionErrorKind, OverflowError},
    field::{FieldConfig, FieldSet},
    formatter::{ChainFormatter, Formatter},
    parse_condition, Value,
};
use siftql_sql::{
    platform::{MssqlPlatform, MysqlPlatform, PostgresPlatform, QueryPlatform, SqlitePlatform},
    SqlGenerationError, WhereBuilder,
};
use std::sync::Arc;

fn fields() -> Arc<FieldSet> { FieldSet::builder("users").field(FieldConfig::integer("id")).field(FieldConfig::text("name")).build().unwrap() }

#[test]
fn parse_optimize_generate() -> Result<()> {
    let condition = parse_condition("id: 1,2,3, >10; name: ~*foo;", &fields())?;
    let id = condition.group().get_field("id").unwrap();
    assert_eq!(id.simple_values.len(), 3);
    assert_eq!(id.comparisons[0].operator, CompareOperator::Greater);
    assert_eq!(condition.group().get_field("name").unwrap().pattern_matchers[0].kind, PatternKind::Contains);

    let condition = ChainFormatter::standard().format(condition)?;
    let id = condition.group().get_field("id").unwrap();
    assert!(id.simple_values.is_empty());
    assert_eq!((id.ranges[0].lower.clone(), id.ranges[0].upper.clone()), (Value::Integer(1), Value::Integer(3)));

    let mut builder = WhereBuilder::new(&condition, &MysqlPlatform);
    builder.set_field("id", "id")?.set_field("name", "name")?;
    let clause = builder.where_clause()?;
    assert_eq!(clause.sql, "((id >= ? AND id <= ?) OR id > ?) AND (name LIKE ?)");
    assert_eq!(clause.parameters, vec![Value::Integer(1), Value::Integer(3), Value::Integer(10), Value::String("%foo%".into())]);
    Ok(())
}

#[test]
fn same_condition_on_every_platform() -> Result<()> {
    let condition = ChainFormatter::standard().format(parse_condition("id: 4, 5, !9; name: ~i>\"a_b\";", &fields())?)?;
    let expectations: [(&dyn QueryPlatform, &str, &str); 4] = [
        (&SqlitePlatform, r"((id >= ? AND id <= ?) AND id <> ?) AND (LOWER(name) LIKE LOWER(?) ESCAPE '\')", r"a\_b%"),
        (&PostgresPlatform, "((id >= $1 AND id <= $2) AND id <> $3) AND (name ILIKE $4)", r"a\_b%"),
        (&MysqlPlatform, "((id >= ? AND id <= ?) AND id <> ?) AND (LOWER(name) LIKE LOWER(?))", r"a\_b%"),
        (&MssqlPlatform, r"((id >= ? AND id <= ?) AND id <> ?) AND (LOWER(name) LIKE LOWER(?) ESCAPE '\')", r"a\_b%"),
    ];
    for (platform, sql, like) in expectations {
        let mut builder = WhereBuilder::new(&condition, platform);
        builder.set_field("id", "id")?.set_field("name", "name")?;
        let clause = builder.where_clause()?;
        assert_eq!(clause.sql, sql, "{}", platform.name());
        assert_eq!(clause.parameters.last(), Some(&Value::String(like.into())), "{}", platform.name());
    }
    Ok(())
}

#[test]
fn parser_reports_every_problem() {
    let fields = FieldSet::builder("users").field(FieldConfig::integer("id").max_values(2)).field(FieldConfig::text("name")).build().unwrap();
    let err = parse_condition("id: 1, 2, 3, x; name: 1-5; color: red;", &fields).unwrap_err();
    let kinds: Vec<&ConditionErrorKind> = err.errors.iter().map(|e| &e.kind).collect();
    assert!(kinds.iter().any(|k| matches!(k, ConditionErrorKind::Overflow(OverflowError::TooManyValues { max: 2, .. }))), "{}", err);
    assert!(kinds.iter().any(|k| matches!(k, ConditionErrorKind::InvalidVariant(_))), "{}", err);
    assert!(kinds.iter().any(|k| matches!(k, ConditionErrorKind::UnknownField)), "{}", err);
    assert!(err.errors.iter().all(|e| e.offset.is_some()));
}

#[test]
fn invalid_condition_never_reaches_sql() -> Result<()> {
    let fields = fields();
    let condition = parse_condition("id: 1, 2, 3;", &fields)?;
    let mut builder = WhereBuilder::new(&condition, &SqlitePlatform).with_config(siftql::config::ProcessorConfig::default().with_max_values(2));
    builder.set_field("id", "id")?;
    assert!(matches!(builder.where_clause(), Err(SqlGenerationError::InvalidCondition(_))));
    Ok(())
}
