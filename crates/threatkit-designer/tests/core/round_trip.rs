use proptest::prelude::*;
use serde_json::{json, Value};
use threatkit_designer::{Component, Connection, GraphMapper, PropertyBag};

const TAGS: &[&str] = &["server", "database", "client", "boundary", "zone", "widget", "api"];

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        "[a-z ]{0,12}".prop_map(Value::from),
    ]
}

fn extras() -> impl Strategy<Value = PropertyBag> {
    prop::collection::btree_map("x_[a-z]{1,8}", scalar(), 0..6)
        .prop_map(|map| map.into_iter().collect())
}

fn number() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-2000i64..2000).prop_map(Value::from),
        (-2000.0f64..2000.0).prop_map(Value::from),
    ]
}

fn component() -> impl Strategy<Value = Component> {
    (
        "[a-z0-9]{1,10}",
        prop::sample::select(TAGS),
        (number(), number(), number(), number()),
        "[A-Za-z ]{0,16}",
        prop::option::of("[a-z0-9]{1,10}"),
        prop::option::of(any::<bool>()),
        extras(),
    )
        .prop_map(|(id, tag, (x, y, w, h), name, parent, selected, mut bag)| {
            bag.insert("position".into(), json!({ "x": x, "y": y }));
            bag.insert("width".into(), w);
            bag.insert("height".into(), h);
            bag.insert("name".into(), name.into());
            let container = matches!(tag, "boundary" | "zone");
            if let (Some(parent), false) = (parent, container) {
                bag.insert("parent_id".into(), parent.into());
            }
            if let Some(selected) = selected {
                bag.insert("selected".into(), selected.into());
            }
            Component::new(id, tag, bag)
        })
}

fn connection() -> impl Strategy<Value = Connection> {
    (
        "[a-z0-9]{1,10}",
        "[a-z0-9]{1,10}",
        "[a-z0-9]{1,10}",
        prop::option::of("[a-z]{1,4}"),
        prop::option::of("[a-z]{1,4}"),
        "[A-Za-z ]{0,16}",
        extras(),
    )
        .prop_map(|(id, source, target, sh, th, label, mut bag)| {
            if !label.is_empty() {
                bag.insert("name".into(), label.clone().into());
            }
            let mut connection = Connection::new(id, source, target);
            connection.source_handle = sh;
            connection.target_handle = th;
            connection.label = label;
            connection.properties = bag;
            connection
        })
}

proptest! {
    #[test]
    fn component_round_trip_is_identity(component in component()) {
        let mapper = GraphMapper::default();
        let node = mapper.component_to_node(&component);
        prop_assert_eq!(mapper.node_to_component(&node), component);
    }

    #[test]
    fn connection_round_trip_is_identity(connection in connection()) {
        let mapper = GraphMapper::default();
        let edge = mapper.connection_to_edge(&connection);
        prop_assert_eq!(mapper.edge_to_connection(&edge), connection);
    }

    #[test]
    fn transient_keys_are_stripped(component in component()) {
        let mapper = GraphMapper::default();
        let mut dirty = component.clone();
        dirty.properties.insert("resizable".into(), json!(true));
        dirty.properties.insert("min_width".into(), json!(60));
        let node = mapper.component_to_node(&dirty);
        prop_assert_eq!(mapper.node_to_component(&node), component);
    }
}

#[test]
fn test_live_geometry_written_back() {
    let mapper = GraphMapper::default();
    let bag = json!({ "position": { "x": 0, "y": 0 }, "width": 150, "height": 80 })
        .as_object()
        .cloned()
        .unwrap();
    let mut node = mapper.component_to_node(&Component::new("a", "server", bag));
    node.position.x = 100.0;
    node.width = 200.0;

    let out = mapper.node_to_component(&node);
    assert_eq!(out.properties["position"], json!({ "x": 100.0, "y": 0.0 }));
    assert_eq!(out.properties["width"], json!(200.0));
    assert_eq!(out.properties["height"], json!(80));
}
