use super::{ArrayExporter, Exporter};
use crate::ast::SearchCondition;
use crate::config::ProcessorConfig;
use crate::error::ExportError;
use crate::formatter::Validator;

/// Serializes the [`ArrayExporter`] output as JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonExporter {
    array: ArrayExporter,
    pretty: bool,
}

impl JsonExporter {
    pub fn new() -> Self { Self::default() }

    pub fn pretty() -> Self { Self { pretty: true, ..Self::default() } }

    pub fn with_config(mut self, config: ProcessorConfig) -> Self {
        self.array = ArrayExporter::with_config(config);
        self
    }
}

impl Exporter for JsonExporter {
    type Output = String;

    fn validator(&self) -> &Validator { self.array.validator() }

    fn write(&self, condition: &SearchCondition) -> Result<String, ExportError> {
        let exported = self.array.write(condition)?;
        let json = if self.pretty { serde_json::to_string_pretty(&exported) } else { serde_json::to_string(&exported) };
        json.map_err(|e| ExportError::Json(e.to_string()))
    }
}
