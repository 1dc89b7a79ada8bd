//! Graph mutations.
//!
//! Each mutation is applied immediately to the in-memory graph and returns
//! the resulting snapshot. Nothing here touches persistence.

use std::sync::Arc;

use serde_json::Value;
use threatkit_core::{GraphError, GraphResult, ValidationError};

use super::{
    Anchors, ElementRef, GraphEdge, GraphElement, GraphModel, GraphNode, GraphSnapshot, NodeIndex,
};
use crate::geometry::Point;
use crate::model::properties::{self, keys, PropertyBag};
use crate::selection_manager::SelectionManager;

impl GraphModel {
    /// Adds a node or an edge.
    ///
    /// Container nodes lose any parent reference. Edges must join two
    /// distinct, existing, connectable nodes.
    pub fn add_element(&mut self, element: GraphElement) -> GraphResult<GraphSnapshot> {
        if self.contains(element.id()) {
            return Err(GraphError::DuplicateId {
                id: element.id().to_string(),
            });
        }

        match element {
            GraphElement::Node(mut node) => {
                if node.is_container() {
                    node.parent_id = None;
                }
                if let Some(parent) = &node.parent_id {
                    if self.node(parent).is_none() {
                        return Err(GraphError::UnknownElement { id: parent.clone() });
                    }
                }
                tracing::debug!(node = %node.id, kind = ?node.kind, "Node added");
                Arc::make_mut(&mut self.nodes).push(node);
            }
            GraphElement::Edge(edge) => {
                self.check_endpoints(&edge.source, &edge.target)?;
                tracing::debug!(
                    edge = %edge.id,
                    source = %edge.source,
                    target = %edge.target,
                    "Edge added"
                );
                Arc::make_mut(&mut self.edges).push(edge);
            }
        }

        Ok(self.bump())
    }

    /// Creates an edge between two nodes with a fresh id.
    pub fn connect(
        &mut self,
        source: &str,
        target: &str,
        anchors: Anchors,
    ) -> GraphResult<GraphSnapshot> {
        self.check_endpoints(source, target)?;
        let edge = GraphEdge {
            id: uuid::Uuid::new_v4().to_string(),
            source: source.to_string(),
            target: target.to_string(),
            anchors,
            label: String::new(),
            selected: false,
            data: PropertyBag::new(),
        };
        self.add_element(GraphElement::Edge(edge))
    }

    /// Merges `patch` into an element's property bag.
    ///
    /// Patch keys overwrite, absent keys are kept. A `name` key re-derives
    /// the visible label in the same call. Geometry keys on a node also move
    /// or resize it, and `parent_id` re-parents it (`null` detaches).
    /// Nothing changes when the patch is rejected.
    pub fn update_properties(
        &mut self,
        id: &str,
        mut patch: PropertyBag,
    ) -> GraphResult<GraphSnapshot> {
        if let Some(index) = self.nodes.iter().position(|n| n.id == id) {
            let reparent = self.parent_change(&self.nodes[index], &patch)?;
            check_geometry(id, &patch)?;

            let node = &mut Arc::make_mut(&mut self.nodes)[index];
            if node.is_container() {
                patch.remove(keys::PARENT);
            }
            if let Some(parent) = reparent {
                tracing::debug!(node = %node.id, parent = ?parent, "Node re-parented");
                node.parent_id = parent;
            }
            if let Some(position) = properties::read_point(&patch, keys::POSITION) {
                node.position = position;
            }
            if let Some(width) = properties::read_f64(&patch, keys::WIDTH) {
                node.width = width.max(node.hints.min_width);
            }
            if let Some(height) = properties::read_f64(&patch, keys::HEIGHT) {
                node.height = height.max(node.hints.min_height);
            }
            if let Some(name) = patch.get(keys::NAME) {
                let fallback = node.kind.label();
                node.hints.label = label_from(name).unwrap_or_else(|| fallback.to_string());
            }
            properties::merge_patch(&mut node.data, patch);
        } else if let Some(index) = self.edges.iter().position(|e| e.id == id) {
            let edge = &mut Arc::make_mut(&mut self.edges)[index];
            if let Some(name) = patch.get(keys::NAME) {
                edge.label = label_from(name).unwrap_or_default();
            }
            properties::merge_patch(&mut edge.data, patch);
        } else {
            return Err(GraphError::UnknownElement { id: id.to_string() });
        }

        Ok(self.bump())
    }

    /// Checks a property patch without applying it.
    pub fn check_patch(&self, id: &str, patch: &PropertyBag) -> GraphResult<()> {
        if let Some(node) = self.node(id) {
            self.parent_change(node, patch)?;
            check_geometry(id, patch)?;
            Ok(())
        } else if self.edge(id).is_some() {
            Ok(())
        } else {
            Err(GraphError::UnknownElement { id: id.to_string() })
        }
    }

    /// Reads a `parent_id` change from a node patch.
    ///
    /// `Some(None)` detaches. Containers never take a parent, so for them
    /// the key is ignored. A parent must be an existing container.
    fn parent_change(
        &self,
        node: &GraphNode,
        patch: &PropertyBag,
    ) -> GraphResult<Option<Option<String>>> {
        let Some(value) = patch.get(keys::PARENT) else {
            return Ok(None);
        };
        if node.is_container() {
            return Ok(None);
        }

        let invalid = |reason: String| {
            GraphError::from(ValidationError::InvalidGeometry {
                element: node.id.clone(),
                reason,
            })
        };
        match value {
            Value::Null => Ok(Some(None)),
            Value::String(parent) if *parent == node.id => {
                Err(invalid("a node cannot be its own parent".to_string()))
            }
            Value::String(parent) => match self.node(parent) {
                None => Err(GraphError::UnknownElement { id: parent.clone() }),
                Some(p) if !p.is_container() => {
                    Err(invalid(format!("parent '{}' is not a container", parent)))
                }
                Some(_) => Ok(Some(Some(parent.clone()))),
            },
            other => Err(invalid(format!("parent_id must be a string or null, got {}", other))),
        }
    }

    /// Removes a node or an edge.
    ///
    /// Removing a node also removes every edge touching it, and its children
    /// are detached at their current absolute position. The selection is
    /// cleared if it pointed at anything removed.
    pub fn remove_element(
        &mut self,
        id: &str,
        selection: &mut SelectionManager,
    ) -> GraphResult<GraphSnapshot> {
        let mut removed = Vec::new();

        if let Some(index) = self.nodes.iter().position(|n| n.id == id) {
            let detached: Vec<(usize, Point)> = {
                let index_by_id = NodeIndex::new(&self.nodes);
                self.nodes
                    .iter()
                    .enumerate()
                    .filter(|(_, n)| n.parent_id.as_deref() == Some(id))
                    .map(|(i, n)| (i, index_by_id.absolute_origin(n)))
                    .collect()
            };

            let nodes = Arc::make_mut(&mut self.nodes);
            for (i, origin) in detached {
                nodes[i].parent_id = None;
                nodes[i].position = origin;
            }
            nodes.remove(index);
            removed.push(ElementRef::node(id));

            if self.edges.iter().any(|e| e.touches(id)) {
                let edges = Arc::make_mut(&mut self.edges);
                edges.retain(|e| {
                    if e.touches(id) {
                        removed.push(ElementRef::edge(e.id.clone()));
                        false
                    } else {
                        true
                    }
                });
            }
        } else if let Some(index) = self.edges.iter().position(|e| e.id == id) {
            Arc::make_mut(&mut self.edges).remove(index);
            removed.push(ElementRef::edge(id));
        } else {
            return Err(GraphError::UnknownElement { id: id.to_string() });
        }

        tracing::debug!(element = %id, removed = removed.len(), "Element removed");
        selection.forget(&removed);
        Ok(self.bump())
    }

    /// Moves a node so its top-left corner lands on `absolute` canvas
    /// coordinates. Nested nodes keep their parent and store the offset.
    pub fn move_node(&mut self, id: &str, absolute: Point) -> GraphResult<GraphSnapshot> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| GraphError::UnknownElement { id: id.to_string() })?;

        let parent_origin = {
            let lookup = NodeIndex::new(&self.nodes);
            self.nodes[index]
                .parent_id
                .as_deref()
                .and_then(|p| lookup.get(p))
                .map(|p| lookup.absolute_origin(p))
        };

        let node = &mut Arc::make_mut(&mut self.nodes)[index];
        node.position = match parent_origin {
            Some(origin) => Point::new(absolute.x - origin.x, absolute.y - origin.y),
            None => absolute,
        };
        Ok(self.bump())
    }

    /// Resizes a node, clamped to its minimum size.
    ///
    /// Nodes that are not resizable are left unchanged.
    pub fn resize_node(&mut self, id: &str, width: f64, height: f64) -> GraphResult<GraphSnapshot> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| GraphError::UnknownElement { id: id.to_string() })?;

        if !self.nodes[index].hints.resizable {
            return Ok(self.snapshot());
        }

        let node = &mut Arc::make_mut(&mut self.nodes)[index];
        node.width = clamp_size(width, node.hints.min_width);
        node.height = clamp_size(height, node.hints.min_height);
        Ok(self.bump())
    }

    fn check_endpoints(&self, source: &str, target: &str) -> GraphResult<()> {
        if source == target {
            return Err(GraphError::SelfConnection {
                id: source.to_string(),
            });
        }
        for end in [source, target] {
            let node = self
                .node(end)
                .ok_or_else(|| GraphError::UnknownEndpoint { id: end.to_string() })?;
            if !node.kind.is_connectable() {
                return Err(GraphError::NotConnectable { id: end.to_string() });
            }
        }
        Ok(())
    }
}

fn label_from(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Null | Value::String(_) => None,
        other => Some(other.to_string()),
    }
}

fn clamp_size(value: f64, min: f64) -> f64 {
    if value.is_finite() {
        value.max(min)
    } else {
        min
    }
}

/// Rejects geometry keys a node cannot take.
///
/// Geometry is required on every node, so `null` counts as removing it.
fn check_geometry(id: &str, patch: &PropertyBag) -> Result<(), ValidationError> {
    for key in [keys::POSITION, keys::WIDTH, keys::HEIGHT] {
        let Some(value) = patch.get(key) else {
            continue;
        };
        if value.is_null() {
            return Err(ValidationError::MissingProperty {
                element: id.to_string(),
                key: key.to_string(),
            });
        }
        let usable = if key == keys::POSITION {
            properties::read_point(patch, key).is_some()
        } else {
            properties::read_f64(patch, key).is_some_and(|v| v > 0.0)
        };
        if !usable {
            return Err(ValidationError::InvalidGeometry {
                element: id.to_string(),
                reason: format!("unusable {}: {}", key, value),
            });
        }
    }
    Ok(())
}
