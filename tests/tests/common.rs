use siftql::field::{FieldConfig, FieldSet};
use std::sync::Arc;
use tracing::Level;

// Initialize tracing for tests; LOG_LEVEL overrides the default of INFO
#[ctor::ctor]
fn init_tracing() {
    let level = std::env::var("LOG_LEVEL").ok().and_then(|l| l.parse::<Level>().ok()).unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).with_test_writer().init();
}

/// The album catalog most tests search through.
#[allow(unused)]
pub fn album_fields() -> Arc<FieldSet> {
    FieldSet::builder("albums")
        .field(FieldConfig::integer("id"))
        .field(FieldConfig::text("name"))
        .field(FieldConfig::integer("year"))
        .field(FieldConfig::date("released", "%m-%d-%Y"))
        .build()
        .expect("album fields are unique")
}
