use std::sync::Arc;

use serde_json::json;
use threatkit_core::ModelKind;
use threatkit_designer::{
    Component, Connection, Document, DocumentId, DocumentStore, EditorSession, EditorState,
    FileDocumentStore, Point, PropertyBag, SaveRequest, ViewportState,
};

fn props(value: serde_json::Value) -> PropertyBag {
    value.as_object().cloned().unwrap_or_default()
}

fn seed_request() -> SaveRequest {
    SaveRequest {
        owner_id: "local".into(),
        id: Some(DocumentId::new("1")),
        name: "Payments".into(),
        kind: ModelKind::Infrastructure,
        components: vec![
            Component::new(
                "A",
                "server",
                props(json!({ "name": "A", "position": { "x": 0, "y": 0 }, "width": 150, "height": 80 })),
            ),
            Component::new(
                "B",
                "database",
                props(json!({ "name": "B", "position": { "x": 0, "y": 300 }, "width": 150, "height": 80 })),
            ),
        ],
        connections: vec![Connection::new("AB", "A", "B")],
        viewport: ViewportState::default(),
        reports: Vec::new(),
    }
}

#[tokio::test]
async fn test_drag_save_reload_persists_live_position() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileDocumentStore::new(dir.path()));
    store.save_document(seed_request()).await.unwrap();

    let session = EditorSession::new(EditorState::default(), store.clone());
    assert!(session.load("1").await.unwrap());

    session.with_state(|s| s.move_node("A", Point::new(100.0, 100.0)).unwrap());
    let id = session.save().await.unwrap();
    assert_eq!(id, DocumentId::new("1"));

    // a fresh editor sees the dragged position
    let reopened = EditorSession::new(EditorState::default(), store.clone());
    assert!(reopened.load("1").await.unwrap());
    reopened.with_state(|s| {
        let a = s.graph().node("A").unwrap();
        assert_eq!(a.position, Point::new(100.0, 100.0));
        assert_eq!(s.graph().edge_count(), 1);
    });

    let stored = store.load_document(&id).await.unwrap().unwrap();
    let a = stored.components.iter().find(|c| c.id == "A").unwrap();
    assert_eq!(a.properties["position"], json!({ "x": 100.0, "y": 100.0 }));
    let b = stored.components.iter().find(|c| c.id == "B").unwrap();
    assert_eq!(b.properties["position"], json!({ "x": 0, "y": 300 }));
}

#[tokio::test]
async fn test_first_save_assigns_id_once() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileDocumentStore::new(dir.path()));
    let session = EditorSession::new(EditorState::default(), store.clone());

    session.navigate("new").await.unwrap();
    session.with_state(|s| s.rename_document("Draft"));
    let first = session.save().await.unwrap();
    let second = session.save().await.unwrap();
    assert_eq!(first, second);

    let listed = session.list_documents().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Draft");
}

#[tokio::test]
async fn test_viewport_and_reports_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileDocumentStore::new(dir.path()));
    let session = EditorSession::new(EditorState::default(), store.clone());

    session.navigate("new").await.unwrap();
    session.with_state(|s| {
        s.camera_moved(-120.0, 45.0, 1.5);
        s.add_report("# Report");
    });
    let id = session.save().await.unwrap();

    let stored: Document = store.load_document(&id).await.unwrap().unwrap();
    assert_eq!(
        stored.viewport,
        ViewportState {
            x: -120.0,
            y: 45.0,
            zoom: 1.5
        }
    );
    assert_eq!(stored.reports.len(), 1);
    assert_eq!(stored.reports[0].content, "# Report");
}
