//! Selection and camera operations for the editor state.

use super::EditorState;
use crate::geometry::Point;
use crate::graph::ElementRef;

impl EditorState {
    /// Handles a click at a screen position.
    ///
    /// The point is projected through the cached camera before
    /// hit-testing. Clicking empty canvas clears the selection.
    pub fn click(&mut self, screen_x: f64, screen_y: f64) -> Option<ElementRef> {
        let point = self.viewport.screen_to_canvas(screen_x, screen_y);
        self.click_canvas(point)
    }

    /// Handles a click at a canvas position.
    pub fn click_canvas(&mut self, point: Point) -> Option<ElementRef> {
        let before = self.selection.selected().cloned();
        let hit = self
            .selection
            .select_at(&self.resolver, point, &mut self.graph);
        if self.selection.selected() != before.as_ref() {
            self.publish_selection();
        }
        hit
    }

    /// Selects an element directly (for example from an outline list).
    ///
    /// Returns true if the selection changed.
    pub fn select(&mut self, target: Option<ElementRef>) -> bool {
        let changed = self.selection.select(target, &mut self.graph);
        if changed {
            self.publish_selection();
        }
        changed
    }

    /// Caches a camera move reported by the renderer.
    pub fn camera_moved(&mut self, x: f64, y: f64, zoom: f64) {
        self.viewport.camera_moved(x, y, zoom);
    }

    /// Node ids back-to-front for the current selection.
    pub fn stacking_order(&self) -> Vec<String> {
        self.graph.stacking_order(self.selection.selected())
    }
}
