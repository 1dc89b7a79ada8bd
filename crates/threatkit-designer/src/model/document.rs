//! Persisted document schema.
//!
//! This is the shape handed to and received from the document store. The
//! live, editable counterpart lives in [`crate::graph`]; the
//! [`GraphMapper`](crate::serialization::GraphMapper) translates between
//! the two.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use threatkit_core::{ModelKind, SessionError};

use super::properties::PropertyBag;

/// Opaque persisted document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A persisted diagram element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    /// Stencil category, e.g. `"server"` or `"boundary"`.
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(default)]
    pub properties: PropertyBag,
}

impl Component {
    pub fn new(id: impl Into<String>, type_tag: impl Into<String>, properties: PropertyBag) -> Self {
        Self {
            id: id.into(),
            type_tag: type_tag.into(),
            properties,
        }
    }
}

/// A persisted directed link between two components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub properties: PropertyBag,
}

impl Connection {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
            label: String::new(),
            properties: PropertyBag::new(),
        }
    }
}

/// Camera state saved with a document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

/// An assistant-generated report, stored verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub created: DateTime<Utc>,
    pub content: String,
}

impl Report {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created: Utc::now(),
            content: content.into(),
        }
    }
}

/// Complete persisted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Absent until the first successful save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    pub name: String,
    /// Missing kinds default to infrastructure.
    #[serde(default, alias = "type")]
    pub kind: ModelKind,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub viewport: ViewportState,
    #[serde(default)]
    pub reports: Vec<Report>,
}

impl Document {
    /// Creates an empty, unsaved document.
    pub fn new(name: impl Into<String>, kind: ModelKind) -> Self {
        Self {
            id: None,
            name: name.into(),
            kind,
            components: Vec::new(),
            connections: Vec::new(),
            viewport: ViewportState::default(),
            reports: Vec::new(),
        }
    }

    /// Parses a document, defaulting what is safe to default.
    ///
    /// A missing `name` or a structurally invalid payload is reported as
    /// [`SessionError::Malformed`].
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        serde_json::from_str(json).map_err(|e| SessionError::Malformed {
            message: e.to_string(),
        })
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// One row of a document listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: DocumentId,
    pub name: String,
    pub kind: ModelKind,
    pub modified: DateTime<Utc>,
    pub component_count: usize,
}

/// Flattened view of the open document handed to the assistant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub name: String,
    pub kind: ModelKind,
    pub components: Vec<Component>,
    pub connections: Vec<Connection>,
    pub viewport: ViewportState,
}
