//! Service tree node — the canonical output of normalization

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use super::{DomainstackError, Result};

/// A normalized service record.
///
/// A node is one of three things, chosen by the construction path:
/// a provider reference (`url`/`image_url`), a group (`children`), or an
/// attribute holder (`properties` or `value`). The only hard invariant is a
/// non-empty name; everything else is optional.
///
/// Nodes are built once by the normalization engine and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Service {
    /// Display name. Serialized as `service` so a round-tripped node hits
    /// the `{service, url}` shape on re-normalization.
    #[serde(rename = "service")]
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Service>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Ordered attribute bag for mappings that carry mixed data rather than
    /// a provider identity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Mapping>,

    /// Raw scalar carried by a list element with no inferable identity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Service {
    /// Create a leaf service. Fails if `name` is empty.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(DomainstackError::EmptyServiceName);
        }
        Ok(Self {
            name,
            url: None,
            children: Vec::new(),
            image_url: None,
            properties: None,
            value: None,
        })
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url;
        self
    }

    pub fn with_children(mut self, children: Vec<Service>) -> Self {
        self.children = children;
        self
    }

    pub fn with_properties(mut self, properties: Mapping) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// True for nodes with neither children nor attributes — a bare provider
    /// reference.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty() && self.properties.is_none() && self.value.is_none()
    }
}
