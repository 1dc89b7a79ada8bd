use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use threatkit_core::{ErrorKind, ModelKind};
use threatkit_designer::{
    Component, Document, DocumentId, DocumentStore, DocumentSummary, EditorSession, EditorState,
    IdentityAction, LoadDecision, LoadResolution, MemoryDocumentStore, PropertyBag, SaveRequest,
    SessionController, SessionState, StoreError,
};
use tokio::sync::Notify;

/// Memory store whose calls for gated ids wait until released.
struct GatedStore {
    inner: MemoryDocumentStore,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

impl GatedStore {
    fn new() -> Self {
        Self {
            inner: MemoryDocumentStore::new(),
            gates: Mutex::new(HashMap::new()),
        }
    }

    fn gate(&self, id: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates.lock().insert(id.to_string(), notify.clone());
        notify
    }

    async fn wait(&self, id: &str) {
        let gate = self.gates.lock().get(id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl DocumentStore for GatedStore {
    async fn load_document(&self, id: &DocumentId) -> Result<Option<Document>, StoreError> {
        self.wait(id.as_str()).await;
        self.inner.load_document(id).await
    }

    async fn save_document(&self, request: SaveRequest) -> Result<DocumentId, StoreError> {
        self.wait("save").await;
        self.inner.save_document(request).await
    }

    async fn list_documents(&self, owner_id: &str) -> Result<Vec<DocumentSummary>, StoreError> {
        self.inner.list_documents(owner_id).await
    }
}

fn document(name: &str, component: &str) -> Document {
    let mut doc = Document::new(name, ModelKind::Infrastructure);
    doc.components = vec![Component::new(component, "server", PropertyBag::new())];
    doc
}

#[test]
fn test_controller_discards_stale_load() {
    let mut controller = SessionController::new();
    let LoadDecision::Start(a) = controller.request_load("A".into()) else {
        panic!("load A should start");
    };
    let LoadDecision::Start(b) = controller.request_load("B".into()) else {
        panic!("load B should start");
    };

    let resolved = controller.finish_load(&b, Ok(Some(document("B", "b1"))));
    assert!(matches!(resolved, LoadResolution::Loaded(_)));
    assert_eq!(
        controller.finish_load(&a, Ok(Some(document("A", "a1")))),
        LoadResolution::Stale
    );
    assert_eq!(controller.state(), &SessionState::Ready("B".into()));
    assert_eq!(controller.bound_id(), Some(&DocumentId::new("B")));
}

#[tokio::test]
async fn test_late_load_does_not_clobber_newer() {
    let store = Arc::new(GatedStore::new());
    store.inner.insert("local", "A".into(), document("A", "a1"));
    store.inner.insert("local", "B".into(), document("B", "b1"));
    let gate_a = store.gate("A");

    let session = EditorSession::new(EditorState::default(), store.clone());

    let (a, b) = tokio::join!(session.load("A"), async {
        let loaded = session.load("B").await;
        gate_a.notify_one();
        loaded
    });

    assert_eq!(a, Ok(false));
    assert_eq!(b, Ok(true));
    session.with_state(|s| {
        assert_eq!(s.session().bound_id(), Some(&DocumentId::new("B")));
        assert_eq!(s.document_name, "B");
        assert!(s.graph().node("b1").is_some());
        assert!(s.graph().node("a1").is_none());
    });
}

#[tokio::test]
async fn test_duplicate_load_is_noop() {
    let store = Arc::new(GatedStore::new());
    store.inner.insert("local", "A".into(), document("A", "a1"));
    let gate = store.gate("A");
    let session = EditorSession::new(EditorState::default(), store.clone());

    let (first, second) = tokio::join!(session.load("A"), async {
        let again = session.load("A").await;
        gate.notify_one();
        again
    });
    assert_eq!(first, Ok(true));
    assert_eq!(second, Ok(false));
}

#[tokio::test]
async fn test_load_waits_for_pending_save() {
    let store = Arc::new(GatedStore::new());
    store.inner.insert("local", "B".into(), document("B", "b1"));
    let gate = store.gate("save");
    let session = EditorSession::new(EditorState::default(), store.clone());
    session.navigate("new").await.unwrap();

    let (saved, queued) = tokio::join!(session.save(), async {
        let queued = session.load("B").await;
        // new documents cannot start while the save is pending
        let busy = session
            .request_new("Other", ModelKind::Process)
            .unwrap_err();
        assert_eq!(busy.kind(), ErrorKind::Busy);
        gate.notify_one();
        queued
    });

    assert!(saved.is_ok());
    assert_eq!(queued, Ok(false));
    // the queued load ran once the save finished
    session.with_state(|s| {
        assert_eq!(s.session_state(), &SessionState::Ready("B".into()));
        assert!(s.graph().node("b1").is_some());
    });
}

#[tokio::test]
async fn test_back_navigation_discards_pending_load() {
    let store = Arc::new(GatedStore::new());
    store.inner.insert("local", "A".into(), document("A", "a1"));
    store.inner.insert("local", "B".into(), document("B", "b1"));
    let session = EditorSession::new(EditorState::default(), store.clone());
    assert!(session.load("A").await.unwrap());
    let gate_b = store.gate("B");

    let (forward, back) = tokio::join!(session.navigate("B"), async {
        let back = session.navigate("A").await;
        gate_b.notify_one();
        back
    });

    assert!(matches!(forward, Ok(IdentityAction::Load(_))));
    assert_eq!(back, Ok(IdentityAction::None));
    session.with_state(|s| {
        assert_eq!(s.session().bound_id(), Some(&DocumentId::new("A")));
        assert_eq!(s.session_state(), &SessionState::Ready("A".into()));
        assert_eq!(s.document_name, "A");
        assert!(s.graph().node("a1").is_some());
        assert!(s.graph().node("b1").is_none());
    });
}
