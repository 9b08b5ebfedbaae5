//! Document parsing for domain configuration files

pub mod document;

pub use document::{DocumentParser, FieldValue, ParsedDocument, DEFAULT_SIMPLE_FIELDS};
