use crate::geometry::Point;
use crate::graph::{ElementRef, GraphModel};
use crate::spatial_resolver::SpatialResolver;

/// Owns the single selected element reference.
///
/// `SelectionManager` is the only writer of selection state:
/// - It holds one nullable [`ElementRef`], the source of truth
/// - Every change re-derives the per-element `selected` flags on the graph
///   by equality with that reference
/// - Flags set by anything else are overwritten on the next sync
///
/// # Examples
///
/// ```
/// use threatkit_designer::selection_manager::SelectionManager;
///
/// let manager = SelectionManager::new();
/// assert_eq!(manager.selected_id(), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    selected: Option<ElementRef>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self { selected: None }
    }

    /// Returns the selected element, if any.
    pub fn selected(&self) -> Option<&ElementRef> {
        self.selected.as_ref()
    }

    /// Returns the selected element's id, if any.
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_ref().map(ElementRef::id)
    }

    pub fn is_selected(&self, element: &ElementRef) -> bool {
        self.selected.as_ref() == Some(element)
    }

    /// Sets the selection and re-derives flags on `graph`.
    ///
    /// A reference to an element the graph does not hold clears the
    /// selection instead. Returns true if the selected reference changed.
    pub fn select(&mut self, target: Option<ElementRef>, graph: &mut GraphModel) -> bool {
        let target = target.filter(|t| match t {
            ElementRef::Node(id) => graph.node(id).is_some(),
            ElementRef::Edge(id) => graph.edge(id).is_some(),
        });
        let changed = self.selected != target;
        if changed {
            tracing::debug!(
                from = ?self.selected.as_ref().map(ElementRef::id),
                to = ?target.as_ref().map(ElementRef::id),
                "Selection changed"
            );
            self.selected = target;
        }
        self.sync(graph);
        changed
    }

    /// Clears the selection. Returns true if something was selected.
    pub fn clear(&mut self, graph: &mut GraphModel) -> bool {
        self.select(None, graph)
    }

    /// Resolves the element under `point` (canvas coordinates) and selects
    /// it, or clears the selection on empty canvas.
    pub fn select_at(
        &mut self,
        resolver: &SpatialResolver,
        point: Point,
        graph: &mut GraphModel,
    ) -> Option<ElementRef> {
        let hit = resolver.resolve(point, graph.nodes(), graph.edges(), self.selected.as_ref());
        self.select(hit.clone(), graph);
        hit
    }

    /// Re-derives every element's flag from the held reference.
    pub fn sync(&self, graph: &mut GraphModel) -> bool {
        graph.set_selection_flags(self.selected.as_ref())
    }

    /// Drops the selection if it refers to any of `removed`.
    ///
    /// Returns true if the selection was cleared.
    pub fn forget(&mut self, removed: &[ElementRef]) -> bool {
        match &self.selected {
            Some(current) if removed.contains(current) => {
                tracing::debug!(element = %current, "Selected element removed");
                self.selected = None;
                true
            }
            _ => false,
        }
    }
}
