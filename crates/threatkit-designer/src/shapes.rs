//! Shape kinds and the stencil catalog.
//!
//! Type tags arrive as free strings from documents and stencils. They are
//! resolved once, through [`ShapeCatalog`], into the closed [`ShapeKind`]
//! set; unknown tags fall back to [`ShapeKind::Generic`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::PropertyBag;

/// Every kind of diagram shape the engine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Server,
    Database,
    Client,
    Service,
    Network,
    Process,
    DataStore,
    ExternalEntity,
    /// Trust boundary. The only container kind.
    Boundary,
    /// Fallback for tags the catalog does not know.
    Generic,
}

impl ShapeKind {
    /// Containers group other nodes, render behind them, and cannot be
    /// connected or nested.
    pub fn is_container(&self) -> bool {
        matches!(self, ShapeKind::Boundary)
    }

    pub fn is_connectable(&self) -> bool {
        !self.is_container()
    }

    /// Human-readable name used when a node has no display name.
    pub fn label(&self) -> &'static str {
        match self {
            ShapeKind::Server => "Server",
            ShapeKind::Database => "Database",
            ShapeKind::Client => "Client",
            ShapeKind::Service => "Service",
            ShapeKind::Network => "Network",
            ShapeKind::Process => "Process",
            ShapeKind::DataStore => "Data Store",
            ShapeKind::ExternalEntity => "External Entity",
            ShapeKind::Boundary => "Trust Boundary",
            ShapeKind::Generic => "Component",
        }
    }
}

/// A stencil catalog record, consumed as-is when a node is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stencil {
    pub type_tag: String,
    #[serde(default)]
    pub defaults: PropertyBag,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub container: bool,
}

impl Stencil {
    pub fn new(type_tag: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            defaults: PropertyBag::new(),
            icon: String::new(),
            color: String::new(),
            container: false,
        }
    }

    pub fn container(mut self) -> Self {
        self.container = true;
        self
    }

    pub fn with_defaults(mut self, defaults: PropertyBag) -> Self {
        self.defaults = defaults;
        self
    }
}

const BUILTIN_TAGS: &[(&str, ShapeKind)] = &[
    ("server", ShapeKind::Server),
    ("host", ShapeKind::Server),
    ("database", ShapeKind::Database),
    ("db", ShapeKind::Database),
    ("client", ShapeKind::Client),
    ("browser", ShapeKind::Client),
    ("user", ShapeKind::Client),
    ("service", ShapeKind::Service),
    ("api", ShapeKind::Service),
    ("network", ShapeKind::Network),
    ("router", ShapeKind::Network),
    ("firewall", ShapeKind::Network),
    ("process", ShapeKind::Process),
    ("datastore", ShapeKind::DataStore),
    ("data_store", ShapeKind::DataStore),
    ("external", ShapeKind::ExternalEntity),
    ("external_entity", ShapeKind::ExternalEntity),
    ("boundary", ShapeKind::Boundary),
    ("trust_boundary", ShapeKind::Boundary),
    ("zone", ShapeKind::Boundary),
];

/// Lookup table from type tag to [`ShapeKind`].
#[derive(Debug, Clone)]
pub struct ShapeCatalog {
    table: HashMap<String, ShapeKind>,
}

impl ShapeCatalog {
    /// Catalog with no known tags. Everything resolves to `Generic`.
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Catalog pre-populated with the built-in tags.
    pub fn builtin() -> Self {
        let table = BUILTIN_TAGS
            .iter()
            .map(|(tag, kind)| (tag.to_string(), *kind))
            .collect();
        Self { table }
    }

    /// Built-in catalog with `stencils` registered on top.
    pub fn with_stencils<'a>(stencils: impl IntoIterator<Item = &'a Stencil>) -> Self {
        let mut catalog = Self::builtin();
        for stencil in stencils {
            catalog.register(stencil);
        }
        catalog
    }

    /// Registers a tag explicitly.
    pub fn insert(&mut self, type_tag: &str, kind: ShapeKind) {
        self.table.insert(normalize(type_tag), kind);
    }

    /// Registers a stencil's tag.
    ///
    /// Container stencils always register as [`ShapeKind::Boundary`]. Other
    /// stencils keep an existing mapping, or become `Generic`.
    pub fn register(&mut self, stencil: &Stencil) {
        let tag = normalize(&stencil.type_tag);
        if stencil.container {
            self.table.insert(tag, ShapeKind::Boundary);
        } else {
            let kind = self.table.entry(tag).or_insert(ShapeKind::Generic);
            if kind.is_container() {
                *kind = ShapeKind::Generic;
            }
        }
    }

    /// Resolves a tag, falling back to `Generic`.
    pub fn classify(&self, type_tag: &str) -> ShapeKind {
        self.table
            .get(&normalize(type_tag))
            .copied()
            .unwrap_or(ShapeKind::Generic)
    }

    pub fn is_container(&self, type_tag: &str) -> bool {
        self.classify(type_tag).is_container()
    }
}

impl Default for ShapeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize(tag: &str) -> String {
    tag.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_classification() {
        let catalog = ShapeCatalog::builtin();
        assert_eq!(catalog.classify("server"), ShapeKind::Server);
        assert_eq!(catalog.classify("DB"), ShapeKind::Database);
        assert_eq!(catalog.classify(" Boundary "), ShapeKind::Boundary);
        assert!(catalog.is_container("zone"));
        assert!(!catalog.is_container("server"));
    }

    #[test]
    fn test_unknown_tag_falls_back() {
        let catalog = ShapeCatalog::builtin();
        assert_eq!(catalog.classify("quantum-relay"), ShapeKind::Generic);
        assert!(ShapeKind::Generic.is_connectable());
    }

    #[test]
    fn test_register_container_stencil() {
        let mut catalog = ShapeCatalog::builtin();
        catalog.register(&Stencil::new("vpc").container());
        assert!(catalog.is_container("vpc"));

        catalog.register(&Stencil::new("queue"));
        assert_eq!(catalog.classify("queue"), ShapeKind::Generic);

        catalog.register(&Stencil::new("server"));
        assert_eq!(catalog.classify("server"), ShapeKind::Server);
    }

    #[test]
    fn test_non_container_stencil_demotes_container_tag() {
        let mut catalog = ShapeCatalog::builtin();
        catalog.register(&Stencil::new("zone"));
        assert!(!catalog.is_container("zone"));
    }
}
