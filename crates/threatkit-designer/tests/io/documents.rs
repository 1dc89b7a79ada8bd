use threatkit_core::{ErrorKind, ModelKind, SessionError};
use threatkit_designer::{Document, GraphMapper};

const PAYMENTS: &str = r#"{
    "name": "Payments",
    "components": [
        { "id": "zone", "type": "boundary",
          "properties": { "name": "DMZ", "position": { "x": 0, "y": 0 },
                          "width": 600, "height": 400, "parent_id": "web" } },
        { "id": "web", "type": "server",
          "properties": { "name": "Web", "position": { "x": 20, "y": 40 },
                          "parent_id": "zone" } },
        { "id": "db", "type": "database", "properties": {} }
    ],
    "connections": [
        { "id": "c1", "source": "web", "target": "db", "label": "SQL" },
        { "id": "c2", "source": "web", "target": "ghost" }
    ]
}"#;

#[test]
fn test_document_defaults_and_hydration() {
    let doc = Document::from_json(PAYMENTS).unwrap();
    assert_eq!(doc.kind, ModelKind::Infrastructure);
    assert_eq!(doc.viewport.zoom, 1.0);

    let mapper = GraphMapper::default();
    let hydrated = mapper.hydrate(&doc);

    let zone = &hydrated.nodes[0];
    assert!(zone.is_container());
    assert_eq!(zone.parent_id, None);

    let web = &hydrated.nodes[1];
    assert_eq!(web.parent_id.as_deref(), Some("zone"));
    assert_eq!((web.width, web.height), (150.0, 80.0));
    assert_eq!(web.hints.label, "Web");

    let db = &hydrated.nodes[2];
    assert!(db.position.x >= 0.0 && db.position.x <= 500.0);
    assert!(db.position.y >= 0.0 && db.position.y <= 500.0);
    assert_eq!(db.hints.label, "Database");

    assert_eq!(hydrated.edges.len(), 1);
    assert_eq!(hydrated.edges[0].label, "SQL");
    assert_eq!(
        hydrated.issues,
        vec![SessionError::Integrity {
            connection: "c2".into(),
            missing: "ghost".into(),
        }]
    );
}

#[test]
fn test_kind_accepts_type_alias() {
    let doc = Document::from_json(r#"{ "name": "Flow", "type": "process" }"#).unwrap();
    assert_eq!(doc.kind, ModelKind::Process);
}

#[test]
fn test_malformed_documents() {
    for json in [r#"{ "components": [] }"#, "[1, 2]", r#"{ "name": "x", "kind": "org" }"#] {
        let err = Document::from_json(json).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed, "{}", json);
    }
}

#[test]
fn test_container_parent_dropped_on_save() {
    let doc = Document::from_json(PAYMENTS).unwrap();
    let mapper = GraphMapper::default();
    let zone = mapper.component_to_node(&doc.components[0]);
    let out = mapper.node_to_component(&zone);
    assert!(!out.properties.contains_key("parent_id"));
}
