//! # ThreatKit Designer
//!
//! The diagram session engine behind the threat-model editor.
//!
//! - Graph view-model: live nodes and edges with nesting, selection flags
//!   and free-form property bags ([`graph`])
//! - Mapping between persisted documents and the view-model
//!   ([`serialization`])
//! - Pointer hit-testing with type and size tie-breaks ([`spatial_resolver`])
//! - The session state machine for new/load/save ([`session`])
//! - Selection and camera coordination ([`selection_manager`], [`viewport`])
//! - Coalesced property edits ([`coalescer`])
//! - Store and assistant collaborators ([`persistence`], [`assistant`])
//!
//! [`EditorState`] ties these together for one open editor and
//! [`EditorSession`] drives its async collaborator calls.

pub mod assistant;
pub mod coalescer;
pub mod editor_session;
pub mod editor_state;
pub mod geometry;
pub mod graph;
pub mod model;
pub mod persistence;
pub mod selection_manager;
pub mod serialization;
pub mod session;
pub mod shapes;
pub mod spatial_resolver;
pub mod viewport;

pub use assistant::{Assistant, AssistantError};
pub use coalescer::{Coalesce, Coalescer};
pub use editor_session::{EditorError, EditorSession};
pub use editor_state::{EditorState, SaveOutcome};
pub use geometry::{Bounds, Point};
pub use graph::{
    stacking_rank, Anchors, ElementRef, GraphEdge, GraphElement, GraphModel, GraphNode,
    GraphSnapshot, NodeIndex, RenderHints,
};
pub use model::{
    Component, Connection, Document, DocumentId, DocumentSnapshot, DocumentSummary, PropertyBag,
    Report, ViewportState,
};
pub use persistence::{
    DocumentStore, FileDocumentStore, MemoryDocumentStore, SaveRequest, StoreError,
    StoredDocument,
};
pub use selection_manager::SelectionManager;
pub use serialization::{GraphMapper, Hydrated};
pub use session::{
    ExternalIdentity, IdentityAction, LoadDecision, LoadResolution, LoadTicket, NewDecision,
    Notifier, SaveResolution, SaveTicket, SessionController, SessionState,
};
pub use shapes::{ShapeCatalog, ShapeKind, Stencil};
pub use spatial_resolver::SpatialResolver;
pub use viewport::Viewport;
