//! Conversion between the three representations of a value.
//!
//! * view  - presentation formatted, e.g. `03-05-2010`
//! * norm  - canonical machine string, e.g. `2010-03-05`
//! * model - the native [`Value`], e.g. a date
//!
//! A field declares a view transformer and optionally a separate norm
//! transformer; without a norm transformer the view transformer is used for both.

mod birthday;
mod date;
mod number;

pub use birthday::BirthdayTransformer;
pub use date::DateTransformer;
pub use number::{IntegerTransformer, NumberToStringTransformer, RoundingMode};

use crate::error::TransformationFailed;
use crate::value::Value;
use std::fmt::Debug;

pub trait DataTransformer: Debug + Send + Sync {
    /// model -> string
    fn transform(&self, value: &Value) -> Result<String, TransformationFailed>;

    /// string -> model
    fn reverse_transform(&self, value: &str) -> Result<Value, TransformationFailed>;
}
