//! Document orchestration
//!
//! Reads a YAML document describing domains and, field by field, decides
//! whether a value passes through as an opaque scalar or goes through the
//! normalization engine. Only the top-level read can fail; a bad domain or
//! field is logged and skipped.

use chrono::{DateTime, NaiveDate};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_yaml::Value;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::services::directory::ProviderDirectory;
use crate::services::normalizer;
use crate::types::{DomainstackError, Result, Service};

/// Fields that are never treated as services.
pub const DEFAULT_SIMPLE_FIELDS: &[&str] = &["project", "role", "environment", "bought_at"];

/// One field's parsed value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Ordered list of service trees produced by the engine.
    Services(Vec<Service>),
    /// A date-suffixed field whose value parsed as a date.
    Date(NaiveDate),
    /// Raw passthrough for simple fields (and unparsable dates).
    Scalar(Value),
}

/// A named field inside one domain, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRecord {
    pub name: String,
    pub value: FieldValue,
}

/// All parsed fields of one domain.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainRecord {
    pub name: String,
    fields: Vec<FieldRecord>,
}

impl DomainRecord {
    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldRecord] {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|f| f.name == field)
            .map(|f| &f.value)
    }

    /// The service list under `field`, if that field produced services.
    pub fn services(&self, field: &str) -> Option<&[Service]> {
        match self.get(field) {
            Some(FieldValue::Services(services)) => Some(services),
            _ => None,
        }
    }
}

/// The parsed document: domains in declaration order, each mapping field
/// names to raw scalars or ordered service lists.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedDocument {
    domains: Vec<DomainRecord>,
}

impl ParsedDocument {
    pub fn domains(&self) -> &[DomainRecord] {
        &self.domains
    }

    pub fn domain(&self, name: &str) -> Option<&DomainRecord> {
        self.domains.iter().find(|d| d.name == name)
    }

    pub fn domain_names(&self) -> Vec<&str> {
        self.domains.iter().map(|d| d.name.as_str()).collect()
    }

    /// All services of one field type across every domain.
    pub fn services_by_type(&self, field: &str) -> Vec<&Service> {
        self.domains
            .iter()
            .filter_map(|d| d.services(field))
            .flatten()
            .collect()
    }

    /// Domains whose simple field `field` equals `value`.
    pub fn domains_by_field_value(&self, field: &str, value: &str) -> Vec<&str> {
        self.domains
            .iter()
            .filter(|d| match d.get(field) {
                Some(FieldValue::Scalar(Value::String(s))) => s == value,
                Some(FieldValue::Date(date)) => date.format("%Y-%m-%d").to_string() == value,
                _ => false,
            })
            .map(|d| d.name.as_str())
            .collect()
    }
}

impl Serialize for ParsedDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.domains.len()))?;
        for domain in &self.domains {
            map.serialize_entry(&domain.name, domain)?;
        }
        map.end()
    }
}

impl Serialize for DomainRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            map.serialize_entry(&field.name, &field.value)?;
        }
        map.end()
    }
}

/// Parser for domain configuration documents.
pub struct DocumentParser<'a> {
    directory: &'a ProviderDirectory,
    simple_fields: Vec<String>,
}

impl<'a> DocumentParser<'a> {
    pub fn new(directory: &'a ProviderDirectory) -> Self {
        Self {
            directory,
            simple_fields: DEFAULT_SIMPLE_FIELDS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the simple-field allow-list. Date-suffixed fields stay simple
    /// regardless.
    pub fn with_simple_fields(mut self, fields: Vec<String>) -> Self {
        self.simple_fields = fields;
        self
    }

    /// Parse a YAML file. Read or top-level parse failure is the only fatal
    /// error in the pipeline.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<ParsedDocument> {
        let source = fs::read_to_string(path)?;
        self.parse_str(&source)
    }

    /// Parse YAML source.
    pub fn parse_str(&self, source: &str) -> Result<ParsedDocument> {
        let root: Value = serde_yaml::from_str(source)
            .map_err(|e| DomainstackError::Document(e.to_string()))?;
        self.parse_value(&root)
    }

    /// Parse an already-loaded YAML value.
    pub fn parse_value(&self, root: &Value) -> Result<ParsedDocument> {
        let Value::Mapping(root) = root else {
            return Err(DomainstackError::Document(
                "top level must be a mapping of domains".into(),
            ));
        };

        let mut domains = Vec::with_capacity(root.len());
        for (domain_key, fields_value) in root {
            let Some(domain) = normalizer::value_to_string(domain_key) else {
                warn!(key = ?domain_key, "skipping domain with non-scalar name");
                continue;
            };
            let Value::Mapping(field_map) = fields_value else {
                warn!(domain = %domain, "skipping domain whose value is not a mapping");
                continue;
            };

            let mut fields = Vec::with_capacity(field_map.len());
            for (field_key, node) in field_map {
                let Some(field) = normalizer::value_to_string(field_key) else {
                    warn!(domain = %domain, key = ?field_key, "skipping field with non-scalar name");
                    continue;
                };

                if self.is_simple_field(&field) {
                    let value = if is_date_field(&field) {
                        best_effort_date(node)
                    } else {
                        FieldValue::Scalar(node.clone())
                    };
                    fields.push(FieldRecord { name: field, value });
                } else if let Some(service) =
                    normalizer::normalize(node, Some(&field), self.directory)
                {
                    fields.push(FieldRecord {
                        name: field,
                        value: FieldValue::Services(vec![service]),
                    });
                }
                // None from the engine means skip the field, never abort
            }

            domains.push(DomainRecord {
                name: domain,
                fields,
            });
        }

        Ok(ParsedDocument { domains })
    }

    fn is_simple_field(&self, field: &str) -> bool {
        self.simple_fields.iter().any(|f| f == field) || is_date_field(field)
    }
}

/// Date/time-suffix naming convention for passthrough fields.
fn is_date_field(name: &str) -> bool {
    name.ends_with("_at") || name.ends_with("_on")
}

/// Try RFC 3339 and plain `%Y-%m-%d`; fall back to the raw value.
fn best_effort_date(node: &Value) -> FieldValue {
    if let Value::String(s) = node {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return FieldValue::Date(date);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return FieldValue::Date(dt.date_naive());
        }
    }
    FieldValue::Scalar(node.clone())
}
