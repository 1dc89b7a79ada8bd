use std::sync::Arc;

use async_trait::async_trait;
use threatkit_core::{
    AppEvent, ErrorKind, EventBus, EventBusConfig, ModelKind, SessionEvent, SystemClock,
};
use threatkit_designer::{
    Document, DocumentId, DocumentStore, DocumentSummary, EditorSession, EditorState,
    IdentityAction, MemoryDocumentStore, NewDecision, Point, SaveRequest, SessionState,
    ShapeCatalog, ShapeKind, Stencil, StoreError,
};
use threatkit_settings::Config;

fn recording_bus() -> Arc<EventBus> {
    Arc::new(EventBus::with_config(EventBusConfig {
        enable_history: true,
        ..Default::default()
    }))
}

fn session_with(store: Arc<dyn DocumentStore>) -> (EditorSession, Arc<EventBus>) {
    let bus = recording_bus();
    let state = EditorState::new(&Config::default(), bus.clone(), Arc::new(SystemClock));
    (EditorSession::new(state, store), bus)
}

fn count(bus: &EventBus, pred: impl Fn(&AppEvent) -> bool) -> usize {
    bus.history().iter().filter(|e| pred(e)).count()
}

/// Loads from memory, fails every save.
struct ReadOnlyStore(MemoryDocumentStore);

#[async_trait]
impl DocumentStore for ReadOnlyStore {
    async fn load_document(&self, id: &DocumentId) -> Result<Option<Document>, StoreError> {
        self.0.load_document(id).await
    }

    async fn save_document(&self, _request: SaveRequest) -> Result<DocumentId, StoreError> {
        Err(StoreError::Unavailable("read-only".into()))
    }

    async fn list_documents(&self, owner_id: &str) -> Result<Vec<DocumentSummary>, StoreError> {
        self.0.list_documents(owner_id).await
    }
}

#[test]
fn test_request_new_twice_resets_once() {
    let (session, bus) = session_with(Arc::new(MemoryDocumentStore::new()));

    let first = session
        .request_new("Untitled", ModelKind::Infrastructure)
        .unwrap();
    let second = session
        .request_new("Untitled", ModelKind::Infrastructure)
        .unwrap();
    assert_eq!(first, NewDecision::Reset);
    assert_eq!(second, NewDecision::Unchanged);

    let resets = count(&bus, |e| {
        matches!(e, AppEvent::Session(SessionEvent::ViewportReset))
    });
    let cleared = count(&bus, |e| {
        matches!(e, AppEvent::Session(SessionEvent::ReportsCleared))
    });
    assert_eq!((resets, cleared), (1, 1));
}

#[tokio::test]
async fn test_route_advance_does_not_reload() {
    let (session, bus) = session_with(Arc::new(MemoryDocumentStore::new()));
    session.navigate("new").await.unwrap();
    session.with_state(|s| {
        s.drop_stencil(&Stencil::new("server"), Point::new(0.0, 0.0))
            .unwrap();
    });

    let id = session.save().await.unwrap();
    let advanced: Vec<_> = bus
        .history()
        .into_iter()
        .filter_map(|e| match e {
            AppEvent::Session(SessionEvent::RouteAdvanced { id }) => Some(id),
            _ => None,
        })
        .collect();
    assert_eq!(advanced, vec![id.to_string()]);

    // the router reflects the new id back
    let action = session.navigate(id.as_str()).await.unwrap();
    assert_eq!(action, IdentityAction::None);
    let loads = count(&bus, |e| {
        matches!(e, AppEvent::Session(SessionEvent::DocumentLoaded { .. }))
    });
    assert_eq!(loads, 0);

    // navigating to the bound id with content on screen is a no-op too
    assert_eq!(
        session.navigate(id.as_str()).await.unwrap(),
        IdentityAction::None
    );
}

#[tokio::test]
async fn test_custom_container_reloads_in_fresh_editor() {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
    let (author, _) = session_with(store.clone());
    author.navigate("new").await.unwrap();
    let (vpc, web) = author.with_state(|s| {
        let vpc = s
            .drop_stencil(&Stencil::new("vpc").container(), Point::new(0.0, 0.0))
            .unwrap();
        let web = s
            .drop_stencil(&Stencil::new("server"), Point::new(40.0, 40.0))
            .unwrap();
        (vpc, web)
    });
    let id = author.save().await.unwrap();

    let (reader, _) = session_with(store);
    assert!(reader.load(id).await.unwrap());
    reader.with_state(|s| {
        assert!(s.graph().node(&vpc).unwrap().is_container());
        assert_eq!(
            s.graph().node(&web).unwrap().parent_id.as_deref(),
            Some(vpc.as_str())
        );
    });
}

#[test]
fn test_catalog_known_before_load() {
    let catalog = ShapeCatalog::with_stencils([&Stencil::new("enclave").container()]);
    let state = EditorState::with_catalog(
        &Config::default(),
        recording_bus(),
        Arc::new(SystemClock),
        catalog,
    );
    let node = state
        .mapper()
        .component_to_node(&threatkit_designer::Component::new("e", "enclave", Default::default()));
    assert_eq!(node.kind, ShapeKind::Boundary);
}

#[tokio::test]
async fn test_failed_save_keeps_ready_state_and_graph() {
    let memory = MemoryDocumentStore::new();
    let mut doc = Document::new("Existing", ModelKind::Process);
    doc.components = vec![threatkit_designer::Component::new(
        "n1",
        "process",
        Default::default(),
    )];
    memory.insert("local", "d1".into(), doc);
    let (session, bus) = session_with(Arc::new(ReadOnlyStore(memory)));

    assert!(session.load("d1").await.unwrap());
    session.with_state(|s| s.move_node("n1", Point::new(5.0, 5.0)).unwrap());

    let err = session.save().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);

    session.with_state(|s| {
        assert_eq!(s.session_state(), &SessionState::Ready("d1".into()));
        assert!(s.is_modified);
        assert_eq!(
            s.graph().node("n1").unwrap().position,
            Point::new(5.0, 5.0)
        );
    });
    let errors = count(&bus, |e| {
        matches!(e, AppEvent::Notification(threatkit_core::NotificationEvent::Error { .. }))
    });
    assert_eq!(errors, 1);
}

#[tokio::test]
async fn test_error_state_recovers() {
    let (session, _bus) = session_with(Arc::new(MemoryDocumentStore::new()));

    let err = session.load("missing").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(session.with_state(|s| s.session_state().is_error()));

    let action = session.navigate("new").await.unwrap();
    assert_eq!(action, IdentityAction::Reset);
    assert!(session.with_state(|s| s.session_state().is_ready()));
}

#[tokio::test]
async fn test_empty_name_rejected_before_io() {
    let (session, _bus) = session_with(Arc::new(ReadOnlyStore(MemoryDocumentStore::new())));
    session.navigate("new").await.unwrap();
    session.with_state(|s| s.rename_document(""));

    let err = session.save().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(session.with_state(|s| s.session_state().is_ready()));
}
