use std::sync::Arc;

use serde_json::json;
use threatkit_core::{
    AppEvent, EventBus, EventBusConfig, ManualClock, ModelKind, NotificationEvent,
};
use threatkit_designer::{
    Document, DocumentStore, EditorSession, EditorState, MemoryDocumentStore, Point, Stencil,
};
use threatkit_settings::Config;

fn setup() -> (EditorSession, Arc<EventBus>, ManualClock) {
    let bus = Arc::new(EventBus::with_config(EventBusConfig {
        enable_history: true,
        ..Default::default()
    }));
    let clock = ManualClock::new();
    let store = MemoryDocumentStore::new();
    for id in ["a", "b", "c"] {
        store.insert("local", id.into(), Document::new(id, ModelKind::Infrastructure));
    }
    let state = EditorState::new(&Config::default(), bus.clone(), Arc::new(clock.clone()));
    (EditorSession::new(state, Arc::new(store)), bus, clock)
}

fn confirmations(bus: &EventBus) -> Vec<String> {
    bus.history()
        .into_iter()
        .filter_map(|e| match e {
            AppEvent::Notification(NotificationEvent::Confirmation { message }) => Some(message),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_load_confirmations_rate_limited() {
    let (session, bus, clock) = setup();

    session.load("a").await.unwrap();
    clock.advance_ms(500);
    session.load("b").await.unwrap();
    clock.advance_ms(2500);
    session.load("c").await.unwrap();

    assert_eq!(confirmations(&bus), vec!["Loaded 'a'", "Loaded 'c'"]);
    assert_eq!(session.with_state(|s| s.notifier().suppressed()), 1);
}

#[tokio::test]
async fn test_pending_edit_committed_by_save() {
    let (session, _bus, clock) = setup();
    session.navigate("new").await.unwrap();

    let id = session.with_state(|s| {
        let id = s
            .drop_stencil(&Stencil::new("server"), Point::new(0.0, 0.0))
            .unwrap();
        s.edit_property(&id, "os", json!("linux")).unwrap();
        id
    });
    clock.advance_ms(100);
    assert!(session.with_state(|s| s.has_pending_edit()));

    let doc_id = session.save().await.unwrap();
    assert!(session.with_state(|s| !s.has_pending_edit()));

    let stored = session.store().load_document(&doc_id).await.unwrap().unwrap();
    let component = stored.components.iter().find(|c| c.id == id).unwrap();
    assert_eq!(component.properties["os"], json!("linux"));
}

#[test]
fn test_name_edit_not_delayed() {
    let (session, _bus, _clock) = setup();
    session.with_state(|s| {
        s.request_new("Untitled", ModelKind::Infrastructure).unwrap();
        let id = s
            .drop_stencil(&Stencil::new("database"), Point::new(0.0, 0.0))
            .unwrap();
        assert_eq!(s.graph().node(&id).unwrap().label(), "Database");

        s.edit_property(&id, "name", json!("Ledger")).unwrap();
        assert_eq!(s.graph().node(&id).unwrap().label(), "Ledger");
        assert!(!s.has_pending_edit());
    });
}
