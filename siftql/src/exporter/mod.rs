//! Exporters turn a [`SearchCondition`] back into an external representation.
//!
//! Every exporter is the dual of an input processor: `ArrayExporter` of `ArrayInput`,
//! `JsonExporter` of `JsonInput` and `StringExporter` of the text parser.

mod array;
mod json;
mod string;

pub use array::{ArrayExporter, ExportedComparison, ExportedGroup, ExportedPattern, ExportedRange, ExportedValues};
pub use json::JsonExporter;
pub use string::StringExporter;

use crate::ast::SearchCondition;
use crate::error::ExportError;
use crate::formatter::Validator;
use tracing::debug;

pub trait Exporter {
    type Output;

    /// The validator a condition must pass before it is exported.
    fn validator(&self) -> &Validator;

    /// Renders a condition that already passed validation.
    fn write(&self, condition: &SearchCondition) -> Result<Self::Output, ExportError>;

    /// Validates `condition` and exports it; an invalid condition is never rendered.
    fn export(&self, condition: &SearchCondition) -> Result<Self::Output, ExportError> {
        if let Err(e) = self.validator().validate(condition) {
            debug!("refusing to export {} condition: {}", condition.field_set().name(), e);
            return Err(e.into());
        }
        self.write(condition)
    }
}
