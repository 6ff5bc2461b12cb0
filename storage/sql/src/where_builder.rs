use crate::conversion::{Converter, FieldConverters};
use crate::error::SqlGenerationError;
use crate::platform::QueryPlatform;
use crate::query_generator::{generate, WhereClause};
use indexmap::IndexMap;
use siftql::ast::SearchCondition;
use siftql::config::ProcessorConfig;
use siftql::formatter::Validator;
use std::collections::HashMap;
use tracing::debug;

/// Generates the WHERE clause of one condition.
///
/// Columns and converters are configured first; the clause is generated on the first
/// call to [`WhereBuilder::where_clause`] and cached. Configuration afterwards fails
/// with [`SqlGenerationError::State`] and leaves the clause untouched.
///
/// ```rust
/// use siftql::{field::{FieldConfig, FieldSet}, parse_condition};
/// use siftql_sql::{platform::PostgresPlatform, WhereBuilder};
///
/// let fields = FieldSet::builder("users").field(FieldConfig::integer("id")).build().unwrap();
/// let condition = parse_condition("id: 1, >10;", &fields).unwrap();
/// let mut builder = WhereBuilder::new(&condition, &PostgresPlatform);
/// builder.set_field("id", "u.id").unwrap();
/// assert_eq!(builder.where_clause().unwrap().sql, "(u.id = $1 OR u.id > $2)");
/// ```
#[derive(Debug)]
pub struct WhereBuilder<'a> {
    condition: &'a SearchCondition,
    platform: &'a dyn QueryPlatform,
    validator: Validator,
    columns: IndexMap<String, String>,
    converters: HashMap<String, FieldConverters>,
    clause: Option<WhereClause>,
}

impl<'a> WhereBuilder<'a> {
    pub fn new(condition: &'a SearchCondition, platform: &'a dyn QueryPlatform) -> Self {
        Self {
            condition,
            platform,
            validator: Validator::default(),
            columns: IndexMap::new(),
            converters: HashMap::new(),
            clause: None,
        }
    }

    /// Limits the condition is validated against before generation.
    pub fn with_config(mut self, config: ProcessorConfig) -> Self {
        self.validator = Validator::new(config);
        self
    }

    /// Maps `field` to a column expression, used as given.
    pub fn set_field(&mut self, field: &str, column: impl Into<String>) -> Result<&mut Self, SqlGenerationError> {
        self.check_configurable(field)?;
        self.columns.insert(field.to_owned(), column.into());
        Ok(self)
    }

    /// Maps `field` to `column`, quoted for the platform.
    pub fn set_quoted_field(&mut self, field: &str, column: &str) -> Result<&mut Self, SqlGenerationError> {
        let quoted = self.platform.quote_identifier(column);
        self.set_field(field, quoted)
    }

    pub fn set_converter(&mut self, field: &str, converter: Converter) -> Result<&mut Self, SqlGenerationError> {
        self.check_configurable(field)?;
        self.converters.entry(field.to_owned()).or_default().set(converter);
        Ok(self)
    }

    pub fn is_generated(&self) -> bool { self.clause.is_some() }

    pub fn where_clause(&mut self) -> Result<&WhereClause, SqlGenerationError> {
        if self.clause.is_none() {
            let clause = generate(self.condition, &self.validator, &self.columns, &self.converters, self.platform)?;
            debug!("generated {} WHERE clause with {} parameter(s): {}", self.platform.name(), clause.parameters.len(), clause.sql);
            self.clause = Some(clause);
        }
        self.clause.as_ref().ok_or(SqlGenerationError::State("WHERE clause was not generated"))
    }

    fn check_configurable(&self, field: &str) -> Result<(), SqlGenerationError> {
        if self.clause.is_some() {
            return Err(SqlGenerationError::State("WHERE clause was already generated, configuration is locked"));
        }
        if !self.condition.field_set().has(field) {
            return Err(SqlGenerationError::UnknownField(field.to_owned()));
        }
        Ok(())
    }
}
