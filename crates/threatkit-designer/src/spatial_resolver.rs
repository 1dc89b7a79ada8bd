//! Pointer hit-testing.
//!
//! Resolves a canvas point to at most one element. Regular nodes always win
//! over edges, and edges over containers; within a category the best
//! effective stacking rank wins, then the smaller area.
//!
//! Containers and edges are never ranked against each other: an edge under
//! the pointer is returned even when it runs across a selected container.

use crate::geometry::{Bounds, Point};
use crate::graph::{hit_priority, ElementRef, GraphEdge, GraphNode, NodeIndex};

/// Hit-tests nodes and edges.
#[derive(Debug, Clone, Copy)]
pub struct SpatialResolver {
    edge_tolerance: f64,
}

impl SpatialResolver {
    /// `edge_tolerance` is the maximum pointer distance, in canvas units,
    /// at which an edge counts as hit.
    pub fn new(edge_tolerance: f64) -> Self {
        Self { edge_tolerance }
    }

    pub fn edge_tolerance(&self) -> f64 {
        self.edge_tolerance
    }

    /// Returns the topmost interactive element at `pointer`.
    ///
    /// `pointer` must already be in canvas coordinates. `None` means empty
    /// canvas.
    pub fn resolve(
        &self,
        pointer: Point,
        nodes: &[GraphNode],
        edges: &[GraphEdge],
        selected: Option<&ElementRef>,
    ) -> Option<ElementRef> {
        let index = NodeIndex::new(nodes);

        let (containers, regular): (Vec<_>, Vec<_>) = nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| index.absolute_bounds(node).contains(pointer))
            .partition(|(_, node)| node.is_container());

        if let Some((_, node)) = best(regular, selected) {
            return Some(ElementRef::node(&node.id));
        }

        if let Some(edge) = self.edge_at(pointer, &index, edges) {
            return Some(ElementRef::edge(&edge.id));
        }

        best(containers, selected).map(|(_, node)| ElementRef::node(&node.id))
    }

    /// First edge whose center-to-center segment passes within tolerance.
    fn edge_at<'e>(
        &self,
        pointer: Point,
        index: &NodeIndex<'_>,
        edges: &'e [GraphEdge],
    ) -> Option<&'e GraphEdge> {
        edges.iter().find(|edge| {
            let (Some(a), Some(b)) = (
                index.absolute_center(&edge.source),
                index.absolute_center(&edge.target),
            ) else {
                return false;
            };
            Bounds::from_segment(a, b)
                .expand(self.edge_tolerance)
                .contains(pointer)
                && pointer.is_near_segment(a, b, self.edge_tolerance)
        })
    }

    /// Innermost container whose bounds contain `pointer`.
    ///
    /// Used to pick a parent when dropping a regular node.
    pub fn container_at<'n>(
        &self,
        pointer: Point,
        nodes: &'n [GraphNode],
    ) -> Option<&'n GraphNode> {
        let index = NodeIndex::new(nodes);
        let candidates = nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| {
                node.is_container() && index.absolute_bounds(node).contains(pointer)
            })
            .collect();
        best(candidates, None).map(|(_, node)| node)
    }
}

fn best<'n>(
    mut candidates: Vec<(usize, &'n GraphNode)>,
    selected: Option<&ElementRef>,
) -> Option<(usize, &'n GraphNode)> {
    candidates.sort_by(|a, b| hit_priority(*a, *b, selected));
    candidates.into_iter().next()
}
