//! Translation between persisted documents and the live graph.
//!
//! [`GraphMapper`] converts components and connections into graph nodes
//! and edges and back. For any component `c`,
//! `node_to_component(&component_to_node(&c))` equals `c` apart from the
//! renderer-only keys listed in [`keys::TRANSIENT`]. Geometry is always
//! written back from the node's live fields.

use std::collections::HashSet;

use rand::Rng;
use threatkit_core::SessionError;
use threatkit_settings::GeometrySettings;

use crate::geometry::Point;
use crate::graph::{Anchors, GraphEdge, GraphModel, GraphNode, RenderHints};
use crate::model::properties::{self, keys, PropertyBag};
use crate::model::{Component, Connection, Document};
use crate::shapes::{ShapeCatalog, ShapeKind, Stencil};

/// Result of hydrating a document.
#[derive(Debug, Clone, Default)]
pub struct Hydrated {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// Dangling connections that were dropped.
    pub issues: Vec<SessionError>,
}

/// Bidirectional component/node and connection/edge mapper.
#[derive(Debug, Clone)]
pub struct GraphMapper {
    catalog: ShapeCatalog,
    geometry: GeometrySettings,
}

impl GraphMapper {
    pub fn new(catalog: ShapeCatalog, geometry: GeometrySettings) -> Self {
        Self { catalog, geometry }
    }

    pub fn catalog(&self) -> &ShapeCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut ShapeCatalog {
        &mut self.catalog
    }

    pub fn geometry(&self) -> &GeometrySettings {
        &self.geometry
    }

    /// Builds a node from a component.
    ///
    /// Missing position is placed at random inside the placement extent;
    /// missing size takes the per-kind default. Containers never keep a
    /// parent reference.
    pub fn component_to_node(&self, component: &Component) -> GraphNode {
        let bag = &component.properties;
        let kind = self.classify(&component.type_tag, bag);

        let position = properties::read_point(bag, keys::POSITION)
            .unwrap_or_else(|| self.random_position());
        let (default_w, default_h) = self.default_size(kind);
        let width = properties::read_f64(bag, keys::WIDTH).unwrap_or(default_w);
        let height = properties::read_f64(bag, keys::HEIGHT).unwrap_or(default_h);

        let parent_id = if kind.is_container() {
            None
        } else {
            properties::read_str(bag, keys::PARENT).map(str::to_string)
        };

        GraphNode {
            id: component.id.clone(),
            type_tag: component.type_tag.clone(),
            kind,
            position,
            width,
            height,
            parent_id,
            selected: properties::read_bool(bag, keys::SELECTED).unwrap_or(false),
            data: bag.clone(),
            hints: self.render_hints(kind, bag),
        }
    }

    /// Builds a component from a node's current state.
    pub fn node_to_component(&self, node: &GraphNode) -> Component {
        let mut bag = node.data.clone();
        properties::strip_transient(&mut bag);

        properties::write_point(&mut bag, keys::POSITION, node.position);
        properties::write_f64(&mut bag, keys::WIDTH, node.width);
        properties::write_f64(&mut bag, keys::HEIGHT, node.height);

        match (&node.parent_id, node.is_container()) {
            (Some(parent), false) => {
                bag.insert(keys::PARENT.to_string(), parent.clone().into());
            }
            _ => {
                bag.remove(keys::PARENT);
            }
        }

        if node.selected || bag.contains_key(keys::SELECTED) {
            bag.insert(keys::SELECTED.to_string(), node.selected.into());
        }

        Component {
            id: node.id.clone(),
            type_tag: node.type_tag.clone(),
            properties: bag,
        }
    }

    /// Builds an edge from a connection.
    ///
    /// The label comes from the top-level field, falling back to the
    /// bag's `name`.
    pub fn connection_to_edge(&self, connection: &Connection) -> GraphEdge {
        let label = if connection.label.is_empty() {
            properties::read_str(&connection.properties, keys::NAME)
                .unwrap_or_default()
                .to_string()
        } else {
            connection.label.clone()
        };

        GraphEdge {
            id: connection.id.clone(),
            source: connection.source.clone(),
            target: connection.target.clone(),
            anchors: Anchors {
                source: connection.source_handle.clone(),
                target: connection.target_handle.clone(),
            },
            label,
            selected: false,
            data: connection.properties.clone(),
        }
    }

    /// Builds a connection from an edge, mirroring the label into the
    /// bag's `name`.
    pub fn edge_to_connection(&self, edge: &GraphEdge) -> Connection {
        let mut bag = edge.data.clone();
        properties::strip_transient(&mut bag);
        if !edge.label.is_empty() || bag.contains_key(keys::NAME) {
            bag.insert(keys::NAME.to_string(), edge.label.clone().into());
        }

        Connection {
            id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            source_handle: edge.anchors.source.clone(),
            target_handle: edge.anchors.target.clone(),
            label: edge.label.clone(),
            properties: bag,
        }
    }

    /// Converts a whole document into graph elements.
    ///
    /// Connections that reference a missing component are dropped and
    /// reported. Duplicate component ids keep the first occurrence.
    pub fn hydrate(&self, document: &Document) -> Hydrated {
        let mut seen = HashSet::new();
        let mut nodes = Vec::with_capacity(document.components.len());
        for component in &document.components {
            if !seen.insert(component.id.as_str()) {
                tracing::warn!(component = %component.id, "Duplicate component id, keeping first");
                continue;
            }
            nodes.push(self.component_to_node(component));
        }

        for node in nodes.iter_mut() {
            if let Some(parent) = node.parent_id.as_deref() {
                if !seen.contains(parent) {
                    tracing::warn!(node = %node.id, parent = %parent, "Parent missing, detaching");
                    node.parent_id = None;
                }
            }
        }

        let mut edges = Vec::with_capacity(document.connections.len());
        let mut issues = Vec::new();
        for connection in &document.connections {
            let missing = [&connection.source, &connection.target]
                .into_iter()
                .find(|end| !seen.contains(end.as_str()));
            if let Some(missing) = missing {
                tracing::warn!(
                    connection = %connection.id,
                    missing = %missing,
                    "Dropping connection with dangling endpoint"
                );
                issues.push(SessionError::Integrity {
                    connection: connection.id.clone(),
                    missing: missing.clone(),
                });
                continue;
            }
            edges.push(self.connection_to_edge(connection));
        }

        Hydrated {
            nodes,
            edges,
            issues,
        }
    }

    /// Converts the live graph into persisted components and connections.
    pub fn dehydrate(&self, graph: &GraphModel) -> (Vec<Component>, Vec<Connection>) {
        let components = graph
            .nodes()
            .iter()
            .map(|n| self.node_to_component(n))
            .collect();
        let connections = graph
            .edges()
            .iter()
            .map(|e| self.edge_to_connection(e))
            .collect();
        (components, connections)
    }

    /// Resolves a component's kind. The persisted container marker wins
    /// over the catalog.
    pub fn classify(&self, type_tag: &str, bag: &PropertyBag) -> ShapeKind {
        if properties::read_bool(bag, keys::CONTAINER) == Some(true) {
            ShapeKind::Boundary
        } else {
            self.catalog.classify(type_tag)
        }
    }

    /// Instantiates a node from a stencil record with a fresh id.
    ///
    /// `position` is absolute; callers nesting the node convert it.
    /// Container stencils stamp the container marker into the bag.
    pub fn node_from_stencil(&self, stencil: &Stencil, position: Point) -> GraphNode {
        let mut bag = stencil.defaults.clone();
        let kind = if stencil.container {
            bag.insert(keys::CONTAINER.to_string(), true.into());
            ShapeKind::Boundary
        } else {
            self.catalog.classify(&stencil.type_tag)
        };
        let (default_w, default_h) = self.default_size(kind);

        GraphNode {
            id: uuid::Uuid::new_v4().to_string(),
            type_tag: stencil.type_tag.clone(),
            kind,
            position,
            width: properties::read_f64(&bag, keys::WIDTH).unwrap_or(default_w),
            height: properties::read_f64(&bag, keys::HEIGHT).unwrap_or(default_h),
            parent_id: None,
            selected: false,
            hints: self.render_hints(kind, &bag),
            data: bag,
        }
    }

    /// Renderer metadata for a node of `kind`.
    pub fn render_hints(&self, kind: ShapeKind, bag: &PropertyBag) -> RenderHints {
        let min = if kind.is_container() {
            self.geometry.container_min
        } else {
            self.geometry.regular_min
        };
        let label = properties::read_str(bag, keys::NAME)
            .filter(|name| !name.is_empty())
            .unwrap_or(kind.label())
            .to_string();

        RenderHints {
            label,
            resizable: true,
            min_width: min.width,
            min_height: min.height,
        }
    }

    fn default_size(&self, kind: ShapeKind) -> (f64, f64) {
        let size = if kind.is_container() {
            self.geometry.container_default
        } else {
            self.geometry.regular_default
        };
        (size.width, size.height)
    }

    fn random_position(&self) -> Point {
        let extent = self.geometry.placement_extent;
        let mut rng = rand::thread_rng();
        Point::new(rng.gen::<f64>() * extent, rng.gen::<f64>() * extent)
    }
}

impl Default for GraphMapper {
    fn default() -> Self {
        Self::new(ShapeCatalog::builtin(), GeometrySettings::default())
    }
}
