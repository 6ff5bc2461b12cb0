mod common;
use anyhow::Result;
use common::album_fields;
use siftql::{
    config::ProcessorConfig,
    error::{ConditionErrorKind, ExportError, OverflowError},
    exporter::{ArrayExporter, Exporter, JsonExporter, StringExporter},
    formatter::{ChainFormatter, Formatter},
    input::{ArrayInput, InputProcessor, JsonInput},
    parse_condition, SearchCondition,
};

const QUERIES: &[&str] = &[
    "id: 1, !2, ]5-10, !20-30[, >=100;",
    "name: ~i*\"rock and roll\", ~!>live, ~?\"^[A-Z]\", \"\", \"quote \"\"this\"\"\";",
    "released: \"03-05-2010\", \"01-01-2000\"-\"12-31-2009\", <\"01-01-1990\";",
    "*; year: 1999; (name: foo; id: 3) *(year: 2001; name: bar)",
    "*(id: 1; id: 2) (year: 2020)",
    "id: 1; ()",
    "*; () *(year: 2001; ())",
    "*;",
    "",
];

fn round_trips(condition: &SearchCondition) -> Result<()> {
    let fields = condition.field_set();

    let text = StringExporter::new().export(condition)?;
    assert_eq!(&parse_condition(&text, fields)?, condition, "text: {}", text);

    let array = ArrayExporter::new().export(condition)?;
    assert_eq!(&ArrayInput::new().process(fields, &array)?, condition, "array: {:?}", array);

    let json = JsonExporter::new().export(condition)?;
    assert_eq!(&JsonInput::new().process(fields, &json)?, condition, "json: {}", json);
    Ok(())
}

#[test]
fn parsed_conditions_survive_every_export() -> Result<()> {
    let fields = album_fields();
    for query in QUERIES {
        round_trips(&parse_condition(query, &fields)?)?;
    }
    Ok(())
}

#[test]
fn formatted_conditions_survive_every_export() -> Result<()> {
    let fields = album_fields();
    let condition = ChainFormatter::standard().format(parse_condition("id: 1, 2, 3, 5, 7, 8, 40-50, 45; year: 1990, 1991;", &fields)?)?;
    round_trips(&condition)?;
    assert_eq!(StringExporter::new().export(&condition)?, "id: 5, 40-50, 1-3, 7-8; year: 1990-1991;");
    Ok(())
}

#[test]
fn invalid_conditions_are_not_exported() -> Result<()> {
    let fields = album_fields();
    let condition = parse_condition("year: 2000-2010;", &fields)?;
    let config = ProcessorConfig::default().with_max_values(1);
    assert!(StringExporter::with_config(config).export(&condition).is_ok());

    let crowded = parse_condition("year: 1990, 1995, 2000;", &fields)?;
    for err in [
        StringExporter::with_config(config).export(&crowded).unwrap_err(),
        ArrayExporter::with_config(config).export(&crowded).map(|_| ()).unwrap_err(),
        JsonExporter::new().with_config(config).export(&crowded).map(|_| ()).unwrap_err(),
    ] {
        let ExportError::InvalidCondition(invalid) = err else { panic!("unexpected export error: {:?}", err) };
        assert_eq!(invalid.errors[0].kind, ConditionErrorKind::Overflow(OverflowError::TooManyValues { field: "year".into(), max: 1 }));
    }
    Ok(())
}

#[test]
fn pretty_json_is_accepted() -> Result<()> {
    let fields = album_fields();
    let condition = parse_condition("year: 1990-1999; name: ~*x", &fields)?;
    let json = JsonExporter::pretty().export(&condition)?;
    assert!(json.contains('\n'));
    let value: serde_json::Value = serde_json::from_str(&json)?;
    assert_eq!(value["fields"]["year"]["ranges"][0]["lower"], "1990");
    assert_eq!(JsonInput::new().process(&fields, &json)?, condition);
    Ok(())
}
