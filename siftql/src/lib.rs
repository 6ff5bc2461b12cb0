//! Sift Query Language
//!
//! Filter conditions checked against a declared schema of searchable fields.
//!
//! A condition is a tree of [`ast::ValuesGroup`]s holding, per field, a bag of values of six
//! kinds: single values, excluded values, ranges, excluded ranges, comparisons and pattern
//! matchers. Conditions come from the text grammar ([`parse_condition`]) or from the
//! exported array/JSON forms, can be simplified by a [`formatter::ChainFormatter`] and are
//! written back by the [`exporter`]s. SQL generation lives in the `siftql-sql` crate.
//!
//! ```rust
//! use siftql::{field::{FieldConfig, FieldSet}, formatter::{ChainFormatter, Formatter}, parse_condition};
//!
//! let fields = FieldSet::builder("users").field(FieldConfig::integer("id")).field(FieldConfig::text("name")).build().unwrap();
//! let condition = parse_condition("id: 1, 2, 3, >10; name: ~*foo;", &fields).unwrap();
//! let condition = ChainFormatter::standard().format(condition).unwrap();
//! assert_eq!(condition.group().get_field("id").unwrap().ranges.len(), 1);
//! ```

pub mod ast;
pub mod comparison;
pub mod config;
mod conversion;
pub mod error;
pub mod exporter;
pub mod field;
pub mod formatter;
pub mod grammar;
pub mod input;
pub mod parser;
#[cfg(feature = "testing")]
pub mod testing;
pub mod transformer;
mod types;
pub mod value;

pub use ast::{SearchCondition, ValuesBag, ValuesGroup};
pub use conversion::ValueTypeMismatch;
pub use parser::{parse_condition, StringQueryInput};
pub use value::Value;
