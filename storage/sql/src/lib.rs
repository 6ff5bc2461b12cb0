//! SQL WHERE-clause generation for siftql conditions
//!
//! A [`WhereBuilder`] maps the fields of a [`siftql::SearchCondition`] to columns and
//! lowers the condition into SQL with every value bound as a parameter. Generated SQL
//! is the same for every database except for placeholders, LIKE escaping, identifier
//! quoting and regular expressions, which a [`platform::QueryPlatform`] supplies.
//!
//! Storage-side conversions ([`conversion`]) let a field bind a different representation
//! than its model value, wrap its column in SQL, or choose between both per value.
//!
//! With the `sqlite` feature, [`sqlite::to_sqlite_params`] maps parameters for rusqlite.

pub mod conversion;
pub mod error;
pub mod platform;
pub mod query_generator;
pub mod sql_builder;
#[cfg(feature = "sqlite")]
pub mod sqlite;
mod where_builder;

pub use conversion::Converter;
pub use error::SqlGenerationError;
pub use query_generator::{generate, WhereClause};
pub use where_builder::WhereBuilder;
