//! Editor state aggregate.
//!
//! [`EditorState`] owns everything one open editor holds and is the only
//! place that publishes graph and session events. Synchronous operations
//! are split into submodules:
//! - `session_io`: new, load and save transitions driven by the controller
//! - `shapes`: drop, connect, delete, drag and resize
//! - `selection`: clicks, explicit selection and camera moves
//! - `properties`: property edits, document metadata, assistant results
//!
//! The async side (store and assistant calls) lives in
//! [`crate::editor_session::EditorSession`].

mod properties;
mod selection;
mod session_io;
mod shapes;

pub use session_io::SaveOutcome;

use std::sync::Arc;
use std::time::Duration;

use threatkit_core::{AppEvent, EventBus, GraphEvent, ModelKind, SessionEvent, SharedClock, SystemClock};
use threatkit_settings::{Config, SessionSettings};

use crate::coalescer::Coalescer;
use crate::graph::GraphModel;
use crate::model::{DocumentSnapshot, PropertyBag, Report};
use crate::selection_manager::SelectionManager;
use crate::serialization::GraphMapper;
use crate::shapes::ShapeCatalog;
use crate::session::{Notifier, SessionController, SessionState};
use crate::spatial_resolver::SpatialResolver;
use crate::viewport::Viewport;

/// State of one open diagram editor.
pub struct EditorState {
    pub(crate) graph: GraphModel,
    pub(crate) selection: SelectionManager,
    pub(crate) viewport: Viewport,
    pub(crate) session: SessionController,
    pub(crate) mapper: GraphMapper,
    pub(crate) resolver: SpatialResolver,
    pub(crate) edits: Coalescer<String, PropertyBag>,
    pub(crate) notifier: Notifier,
    pub(crate) bus: Arc<EventBus>,
    pub(crate) clock: SharedClock,
    pub(crate) defaults: SessionSettings,
    snapshot: DocumentSnapshot,
    published_state: String,
    pub document_name: String,
    pub kind: ModelKind,
    pub reports: Vec<Report>,
    /// True when the graph differs from the last loaded, saved or new state.
    pub is_modified: bool,
}

impl EditorState {
    pub fn new(config: &Config, bus: Arc<EventBus>, clock: SharedClock) -> Self {
        Self::with_catalog(config, bus, clock, ShapeCatalog::builtin())
    }

    /// Builds an editor whose stencil catalog is known before any
    /// document is loaded, so custom tags classify the same on every load.
    pub fn with_catalog(
        config: &Config,
        bus: Arc<EventBus>,
        clock: SharedClock,
        catalog: ShapeCatalog,
    ) -> Self {
        let interaction = &config.interaction;
        let notifier = Notifier::new(
            bus.clone(),
            clock.clone(),
            Duration::from_millis(interaction.confirmation_interval_ms),
        );

        Self {
            graph: GraphModel::new(),
            selection: SelectionManager::new(),
            viewport: Viewport::default(),
            session: SessionController::new(),
            mapper: GraphMapper::new(catalog, config.geometry.clone()),
            resolver: SpatialResolver::new(interaction.edge_hit_tolerance),
            edits: Coalescer::new(Duration::from_millis(interaction.property_debounce_ms)),
            notifier,
            bus,
            clock,
            defaults: config.session.clone(),
            snapshot: DocumentSnapshot::default(),
            published_state: SessionState::Uninitialized.label(),
            document_name: config.session.default_name.clone(),
            kind: config.session.default_kind,
            reports: Vec::new(),
            is_modified: false,
        }
    }

    pub fn graph(&self) -> &GraphModel {
        &self.graph
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    pub fn session_state(&self) -> &SessionState {
        self.session.state()
    }

    pub fn mapper(&self) -> &GraphMapper {
        &self.mapper
    }

    pub fn resolver(&self) -> &SpatialResolver {
        &self.resolver
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn defaults(&self) -> &SessionSettings {
        &self.defaults
    }

    /// Whether a property edit is waiting to be committed.
    pub fn has_pending_edit(&self) -> bool {
        self.edits.is_pending()
    }

    /// Flattened copy of the open document for the assistant.
    ///
    /// Graph content is cached and refreshed after every committed
    /// mutation; the viewport is always the live camera.
    pub fn document_snapshot(&self) -> DocumentSnapshot {
        let mut snapshot = self.snapshot.clone();
        snapshot.viewport = self.viewport.state();
        snapshot
    }

    pub(crate) fn refresh_snapshot(&mut self) {
        let (components, connections) = self.mapper.dehydrate(&self.graph);
        self.snapshot = DocumentSnapshot {
            name: self.document_name.clone(),
            kind: self.kind,
            components,
            connections,
            viewport: self.viewport.state(),
        };
    }

    /// Bookkeeping after a graph mutation that was applied.
    pub(crate) fn graph_changed(&mut self, membership: bool) {
        self.is_modified = true;
        self.refresh_snapshot();
        if membership {
            self.publish_membership();
        }
    }

    pub(crate) fn publish_membership(&self) {
        self.bus.publish(AppEvent::Graph(GraphEvent::MembershipChanged {
            nodes: self.graph.node_count(),
            edges: self.graph.edge_count(),
        }));
    }

    pub(crate) fn publish_selection(&self) {
        self.bus.publish(AppEvent::Graph(GraphEvent::SelectionChanged {
            selected: self.selection.selected_id().map(str::to_string),
        }));
    }

    pub(crate) fn publish_session(&self, event: SessionEvent) {
        self.bus.publish(AppEvent::Session(event));
    }

    /// Publishes `StateChanged` if the controller moved since the last call.
    pub(crate) fn sync_state(&mut self) {
        let label = self.session.state().label();
        if label != self.published_state {
            self.published_state = label.clone();
            self.publish_session(SessionEvent::StateChanged { state: label });
        }
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(
            &Config::default(),
            Arc::new(EventBus::new()),
            Arc::new(SystemClock),
        )
    }
}

impl std::fmt::Debug for EditorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorState")
            .field("document_name", &self.document_name)
            .field("kind", &self.kind)
            .field("state", self.session.state())
            .field("nodes", &self.graph.node_count())
            .field("edges", &self.graph.edge_count())
            .field("selected", &self.selection.selected_id())
            .field("is_modified", &self.is_modified)
            .finish()
    }
}
