//! Live graph elements.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::{Bounds, Point};
use crate::model::PropertyBag;
use crate::shapes::ShapeKind;

/// Reference to a node or an edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementRef {
    Node(String),
    Edge(String),
}

impl ElementRef {
    pub fn node(id: impl Into<String>) -> Self {
        ElementRef::Node(id.into())
    }

    pub fn edge(id: impl Into<String>) -> Self {
        ElementRef::Edge(id.into())
    }

    pub fn id(&self) -> &str {
        match self {
            ElementRef::Node(id) | ElementRef::Edge(id) => id,
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, ElementRef::Node(_))
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementRef::Node(id) => write!(f, "node {}", id),
            ElementRef::Edge(id) => write!(f, "edge {}", id),
        }
    }
}

/// Optional anchor (handle) ids on each end of an edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Anchors {
    pub source: Option<String>,
    pub target: Option<String>,
}

/// Renderer metadata. Derived on creation, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderHints {
    pub label: String,
    pub resizable: bool,
    pub min_width: f64,
    pub min_height: f64,
}

/// A node in the view-model.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub type_tag: String,
    pub kind: ShapeKind,
    /// Top-left corner; relative to the parent when `parent_id` is set.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub parent_id: Option<String>,
    pub selected: bool,
    /// Full property bag, carried verbatim from the component.
    pub data: PropertyBag,
    pub hints: RenderHints,
}

impl GraphNode {
    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    /// Bounds of this node with its top-left corner at `origin`.
    pub fn bounds_at(&self, origin: Point) -> Bounds {
        Bounds::from_origin(origin, self.width, self.height)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn label(&self) -> &str {
        &self.hints.label
    }
}

/// An edge in the view-model.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub anchors: Anchors,
    pub label: String,
    pub selected: bool,
    pub data: PropertyBag,
}

impl GraphEdge {
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// Anything that can be added to the graph.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphElement {
    Node(GraphNode),
    Edge(GraphEdge),
}

impl GraphElement {
    pub fn id(&self) -> &str {
        match self {
            GraphElement::Node(node) => &node.id,
            GraphElement::Edge(edge) => &edge.id,
        }
    }
}
