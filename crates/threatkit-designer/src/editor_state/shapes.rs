//! Node and edge gestures for the editor state.

use threatkit_core::GraphResult;

use super::EditorState;
use crate::geometry::Point;
use crate::graph::{Anchors, GraphElement};
use crate::shapes::Stencil;

impl EditorState {
    /// Instantiates `stencil` with its top-left corner at `at` (canvas
    /// coordinates) and returns the new node id.
    ///
    /// A regular node dropped inside a container becomes its child, stored
    /// relative to the innermost container under the drop point. Container
    /// stencils are never nested.
    pub fn drop_stencil(&mut self, stencil: &Stencil, at: Point) -> GraphResult<String> {
        self.mapper.catalog_mut().register(stencil);
        let mut node = self.mapper.node_from_stencil(stencil, at);

        if !node.is_container() {
            let parent = self
                .resolver
                .container_at(at, self.graph.nodes())
                .map(|container| container.id.clone());
            if let Some(parent_id) = parent {
                if let Some(origin) = self.graph.absolute_position(&parent_id) {
                    node.position = Point::new(at.x - origin.x, at.y - origin.y);
                    node.parent_id = Some(parent_id);
                }
            }
        }

        let id = node.id.clone();
        tracing::info!(
            node = %id,
            type_tag = %stencil.type_tag,
            parent = ?node.parent_id,
            "Stencil dropped"
        );
        self.graph.add_element(GraphElement::Node(node))?;
        self.graph_changed(true);
        Ok(id)
    }

    /// Connects two nodes and returns the new edge id.
    pub fn connect(&mut self, source: &str, target: &str, anchors: Anchors) -> GraphResult<String> {
        let snapshot = self.graph.connect(source, target, anchors)?;
        let id = snapshot
            .edges
            .last()
            .map(|edge| edge.id.clone())
            .unwrap_or_default();
        self.graph_changed(true);
        Ok(id)
    }

    /// Deletes a node (with its edges) or an edge.
    pub fn delete(&mut self, id: &str) -> GraphResult<()> {
        let selected_before = self.selection.selected().cloned();
        self.graph.remove_element(id, &mut self.selection)?;

        if let Some(key) = self.edits.pending_key() {
            if !self.graph.contains(key) {
                tracing::debug!(element = %key, "Pending edit dropped with its element");
                self.edits.cancel();
            }
        }

        self.graph_changed(true);
        if self.selection.selected() != selected_before.as_ref() {
            self.publish_selection();
        }
        Ok(())
    }

    /// Deletes the selected element. Returns false if nothing was selected.
    pub fn delete_selected(&mut self) -> GraphResult<bool> {
        let Some(id) = self.selection.selected_id().map(str::to_string) else {
            return Ok(false);
        };
        self.delete(&id)?;
        Ok(true)
    }

    /// Drags a node so its top-left corner lands on `to` (canvas
    /// coordinates).
    pub fn move_node(&mut self, id: &str, to: Point) -> GraphResult<()> {
        self.graph.move_node(id, to)?;
        self.graph_changed(false);
        Ok(())
    }

    /// Resizes a node, clamped to its minimum size.
    pub fn resize_node(&mut self, id: &str, width: f64, height: f64) -> GraphResult<()> {
        self.graph.resize_node(id, width, height)?;
        self.graph_changed(false);
        Ok(())
    }
}
