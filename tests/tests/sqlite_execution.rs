#![cfg(feature = "sqlite")]
mod common;
use anyhow::Result;
use common::album_fields;
use rusqlite::{functions::FunctionFlags, params_from_iter, Connection};
use siftql::{
    formatter::{ChainFormatter, Formatter},
    parse_condition,
};
use siftql_sql::{conversion::DateAsText, platform::SqlitePlatform, sqlite::to_sqlite_params, Converter, WhereBuilder};

fn albums() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.create_scalar_function("regexp", 2, FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC, |ctx| {
        let pattern: String = ctx.get(0)?;
        let text: String = ctx.get(1)?;
        let regex = regex::Regex::new(&pattern).map_err(|e| rusqlite::Error::UserFunctionError(Box::new(e)))?;
        Ok(regex.is_match(&text))
    })?;
    conn.execute_batch(
        r#"CREATE TABLE albums (id INTEGER PRIMARY KEY, name TEXT, year INTEGER, released TEXT);
        INSERT INTO albums VALUES
            (1, 'Walking on a Dream', 2008, '2008-04-11'),
            (2, 'Ice on the Dune', 2013, '2013-06-14'),
            (3, 'Two Vines', 2016, '2016-10-28'),
            (4, 'Ask That God', 2024, '2024-08-16'),
            (5, '100% Pure_Love', 1994, '1994-06-07');"#,
    )?;
    Ok(conn)
}

fn search(conn: &Connection, query: &str) -> Result<Vec<i64>> {
    let fields = album_fields();
    let condition = ChainFormatter::standard().format(parse_condition(query, &fields)?)?;
    let mut builder = WhereBuilder::new(&condition, &SqlitePlatform);
    for field in ["id", "name", "year", "released"] {
        builder.set_quoted_field(field, field)?;
    }
    builder.set_converter("released", Converter::value(DateAsText))?;
    let clause = builder.where_clause()?;

    let sql = if clause.is_empty() {
        "SELECT id FROM albums ORDER BY id".to_owned()
    } else {
        format!("SELECT id FROM albums WHERE {} ORDER BY id", clause.sql)
    };
    let mut stmt = conn.prepare(&sql)?;
    let ids = stmt.query_map(params_from_iter(to_sqlite_params(&clause.parameters)), |row| row.get(0))?.collect::<Result<Vec<i64>, _>>()?;
    Ok(ids)
}

#[test]
fn values_ranges_and_comparisons() -> Result<()> {
    let conn = albums()?;
    assert_eq!(search(&conn, "year: 2008-2016;")?, vec![1, 2, 3]);
    assert_eq!(search(&conn, "year: >2010, !2016;")?, vec![2, 4]);
    assert_eq!(search(&conn, "id: 1, 2, 3, !2;")?, vec![1, 3]);
    assert_eq!(search(&conn, "year: !2000-2020;")?, vec![4, 5]);
    assert_eq!(search(&conn, "")?, vec![1, 2, 3, 4, 5]);
    Ok(())
}

#[test]
fn converted_dates() -> Result<()> {
    let conn = albums()?;
    assert_eq!(search(&conn, "released: \"01-01-2010\"-\"12-31-2020\";")?, vec![2, 3]);
    assert_eq!(search(&conn, "released: \"06-07-1994\";")?, vec![5]);
    Ok(())
}

#[test]
fn like_wildcards_are_escaped() -> Result<()> {
    let conn = albums()?;
    assert_eq!(search(&conn, "name: ~i*dream, ~>Two;")?, vec![1, 3]);
    assert_eq!(search(&conn, "name: ~*\"%\";")?, vec![5]);
    assert_eq!(search(&conn, "name: ~*_;")?, vec![5]);
    assert_eq!(search(&conn, "name: ~!*on;")?, vec![3, 4, 5]);
    Ok(())
}

#[test]
fn regular_expressions() -> Result<()> {
    let conn = albums()?;
    assert_eq!(search(&conn, "name: ~?\"^[A-Z][a-z]+ on\";")?, vec![1, 2]);
    assert_eq!(search(&conn, "name: ~i?\"^ASK\";")?, vec![4]);
    Ok(())
}

#[test]
fn groups() -> Result<()> {
    let conn = albums()?;
    assert_eq!(search(&conn, "*; year: 1994; (name: ~*Dune)")?, vec![2, 5]);
    assert_eq!(search(&conn, "year: >2000; *(name: ~>Two; id: 4)")?, vec![3, 4]);
    Ok(())
}
