//! Graph view-model.
//!
//! [`GraphModel`] owns the live nodes and edges. Node and edge lists sit
//! behind `Arc`s so every mutation can hand back a cheap [`GraphSnapshot`]
//! for listeners; the lists are copied only when a snapshot is still alive
//! at the next write.
//!
//! Mutations live in `operations.rs`.

mod element;
mod operations;

pub use element::{Anchors, ElementRef, GraphEdge, GraphElement, GraphNode, RenderHints};

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use crate::geometry::{Bounds, Point};

/// Immutable view of the graph after a mutation.
#[derive(Debug, Clone, Default)]
pub struct GraphSnapshot {
    pub nodes: Arc<Vec<GraphNode>>,
    pub edges: Arc<Vec<GraphEdge>>,
    /// Incremented on every applied mutation.
    pub revision: u64,
}

/// The authoritative in-memory graph.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    nodes: Arc<Vec<GraphNode>>,
    edges: Arc<Vec<GraphEdge>>,
    revision: u64,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: Arc::clone(&self.nodes),
            edges: Arc::clone(&self.edges),
            revision: self.revision,
        }
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&GraphEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Whether `id` names a node or an edge.
    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some() || self.edge(id).is_some()
    }

    /// Resolves an id to a typed reference.
    pub fn element_ref(&self, id: &str) -> Option<ElementRef> {
        if self.node(id).is_some() {
            Some(ElementRef::node(id))
        } else if self.edge(id).is_some() {
            Some(ElementRef::edge(id))
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replaces the whole graph in one step.
    pub fn replace_all(&mut self, nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> GraphSnapshot {
        self.nodes = Arc::new(nodes);
        self.edges = Arc::new(edges);
        self.bump()
    }

    pub fn clear(&mut self) -> GraphSnapshot {
        self.replace_all(Vec::new(), Vec::new())
    }

    /// Absolute canvas position of a node's top-left corner.
    pub fn absolute_position(&self, id: &str) -> Option<Point> {
        let index = NodeIndex::new(&self.nodes);
        index.get(id).map(|node| index.absolute_origin(node))
    }

    /// Absolute canvas bounds of a node.
    pub fn absolute_bounds(&self, id: &str) -> Option<Bounds> {
        let index = NodeIndex::new(&self.nodes);
        index.get(id).map(|node| index.absolute_bounds(node))
    }

    /// Node ids ordered back-to-front for rendering.
    ///
    /// Uses the same ranking as hit-testing, reversed: lower effective
    /// stacking rank first, then larger area, then insertion order.
    pub fn stacking_order(&self, selected: Option<&ElementRef>) -> Vec<String> {
        let mut order: Vec<(usize, &GraphNode)> = self.nodes.iter().enumerate().collect();
        order.sort_by(|(ia, a), (ib, b)| {
            stacking_rank(a, selected)
                .cmp(&stacking_rank(b, selected))
                .then_with(|| b.area().total_cmp(&a.area()))
                .then_with(|| ia.cmp(ib))
        });
        order.into_iter().map(|(_, node)| node.id.clone()).collect()
    }

    /// Re-derives every element's `selected` flag from `selected`.
    ///
    /// Returns true if any flag changed.
    pub fn set_selection_flags(&mut self, selected: Option<&ElementRef>) -> bool {
        let node_selected =
            |n: &GraphNode| matches!(selected, Some(ElementRef::Node(id)) if *id == n.id);
        let edge_selected =
            |e: &GraphEdge| matches!(selected, Some(ElementRef::Edge(id)) if *id == e.id);

        let nodes_stale = self.nodes.iter().any(|n| n.selected != node_selected(n));
        let edges_stale = self.edges.iter().any(|e| e.selected != edge_selected(e));

        if nodes_stale {
            for node in Arc::make_mut(&mut self.nodes) {
                let flag = node_selected(&*node);
                node.selected = flag;
            }
        }
        if edges_stale {
            for edge in Arc::make_mut(&mut self.edges) {
                let flag = edge_selected(&*edge);
                edge.selected = flag;
            }
        }

        if nodes_stale || edges_stale {
            self.revision += 1;
            true
        } else {
            false
        }
    }

    fn bump(&mut self) -> GraphSnapshot {
        self.revision += 1;
        self.snapshot()
    }
}

/// Effective stacking rank of a node, higher is closer to the viewer.
///
/// Containers sit below every regular node. Selecting a container lifts it
/// above other containers only; selecting a regular node lifts it above
/// the other regular nodes.
pub fn stacking_rank(node: &GraphNode, selected: Option<&ElementRef>) -> u8 {
    let is_selected = matches!(selected, Some(ElementRef::Node(id)) if *id == node.id);
    match (node.is_container(), is_selected) {
        (true, false) => 0,
        (true, true) => 1,
        (false, false) => 2,
        (false, true) => 3,
    }
}

/// Compares two hit candidates; `Ordering::Less` means `a` wins.
pub(crate) fn hit_priority(
    a: (usize, &GraphNode),
    b: (usize, &GraphNode),
    selected: Option<&ElementRef>,
) -> Ordering {
    stacking_rank(b.1, selected)
        .cmp(&stacking_rank(a.1, selected))
        .then_with(|| a.1.area().total_cmp(&b.1.area()))
        .then_with(|| b.0.cmp(&a.0))
}

/// Id lookup over a node slice, used to resolve parent chains.
pub struct NodeIndex<'a> {
    by_id: HashMap<&'a str, &'a GraphNode>,
}

impl<'a> NodeIndex<'a> {
    pub fn new(nodes: &'a [GraphNode]) -> Self {
        Self {
            by_id: nodes.iter().map(|n| (n.id.as_str(), n)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&'a GraphNode> {
        self.by_id.get(id).copied()
    }

    /// Sums relative positions up the parent chain.
    ///
    /// Missing parents end the walk. The walk is bounded by the node count,
    /// so a parent cycle cannot loop forever.
    pub fn absolute_origin(&self, node: &GraphNode) -> Point {
        let mut origin = node.position;
        let mut parent = node.parent_id.as_deref();
        let mut steps = 0;
        while let Some(parent_id) = parent {
            if steps >= self.by_id.len() {
                tracing::warn!(node = %node.id, "Parent chain cycle, stopping walk");
                break;
            }
            let Some(p) = self.get(parent_id) else { break };
            origin = origin.offset(p.position.x, p.position.y);
            parent = p.parent_id.as_deref();
            steps += 1;
        }
        origin
    }

    pub fn absolute_bounds(&self, node: &GraphNode) -> Bounds {
        node.bounds_at(self.absolute_origin(node))
    }

    pub fn absolute_center(&self, id: &str) -> Option<Point> {
        self.get(id).map(|node| self.absolute_bounds(node).center())
    }
}
