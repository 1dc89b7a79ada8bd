use proptest::prelude::*;
use serde_json::json;
use threatkit_designer::{
    Component, ElementRef, GraphMapper, GraphModel, GraphNode, Point, SpatialResolver,
};

fn node(id: &str, tag: &str, x: f64, y: f64, w: f64, h: f64) -> GraphNode {
    let bag = json!({ "position": { "x": x, "y": y }, "width": w, "height": h })
        .as_object()
        .cloned()
        .unwrap();
    GraphMapper::default().component_to_node(&Component::new(id, tag, bag))
}

fn resolver() -> SpatialResolver {
    SpatialResolver::new(10.0)
}

proptest! {
    // A regular node overlapping a container wins at any relative size,
    // whether or not the container is selected.
    #[test]
    fn regular_node_beats_container(
        container_w in 1.0f64..2000.0,
        container_h in 1.0f64..2000.0,
        regular_w in 1.0f64..2000.0,
        regular_h in 1.0f64..2000.0,
        container_first in any::<bool>(),
        select_container in any::<bool>(),
    ) {
        let container = node("c", "boundary", 0.0, 0.0, container_w, container_h);
        let regular = node("r", "server", 0.0, 0.0, regular_w, regular_h);
        let nodes = if container_first {
            vec![container, regular]
        } else {
            vec![regular, container]
        };
        let selected = select_container.then(|| ElementRef::node("c"));

        let pointer = Point::new(0.5, 0.5);
        let hit = resolver().resolve(pointer, &nodes, &[], selected.as_ref());
        prop_assert_eq!(hit, Some(ElementRef::node("r")));
    }
}

#[test]
fn test_smaller_regular_node_wins_tie() {
    let nodes = vec![
        node("big", "server", 0.0, 0.0, 400.0, 400.0),
        node("small", "database", 50.0, 50.0, 100.0, 100.0),
    ];
    let hit = resolver().resolve(Point::new(60.0, 60.0), &nodes, &[], None);
    assert_eq!(hit, Some(ElementRef::node("small")));

    // selecting the larger node raises it above the other
    let selected = ElementRef::node("big");
    let hit = resolver().resolve(Point::new(60.0, 60.0), &nodes, &[], Some(&selected));
    assert_eq!(hit, Some(ElementRef::node("big")));
}

#[test]
fn test_edge_checked_before_container() {
    let mut graph = GraphModel::new();
    let mapper = GraphMapper::default();
    let edge = mapper.connection_to_edge(&threatkit_designer::Connection::new("ab", "a", "b"));
    graph.replace_all(
        vec![
            node("zone", "boundary", 0.0, 0.0, 1000.0, 1000.0),
            node("a", "server", 100.0, 100.0, 100.0, 100.0),
            node("b", "server", 600.0, 100.0, 100.0, 100.0),
        ],
        vec![edge],
    );

    // between the two servers, on the center line
    let on_edge = Point::new(400.0, 153.0);
    let hit = resolver().resolve(on_edge, graph.nodes(), graph.edges(), None);
    assert_eq!(hit, Some(ElementRef::edge("ab")));

    // off the line, only the container is under the pointer
    let off_edge = Point::new(400.0, 400.0);
    let hit = resolver().resolve(off_edge, graph.nodes(), graph.edges(), None);
    assert_eq!(hit, Some(ElementRef::node("zone")));

    assert_eq!(
        resolver().resolve(Point::new(-5.0, -5.0), graph.nodes(), graph.edges(), None),
        None
    );
}

#[test]
fn test_nested_node_hit_at_absolute_position() {
    let mut child = node("s", "server", 20.0, 20.0, 100.0, 80.0);
    child.parent_id = Some("zone".into());
    let nodes = vec![node("zone", "boundary", 500.0, 500.0, 300.0, 300.0), child];

    let hit = resolver().resolve(Point::new(530.0, 530.0), &nodes, &[], None);
    assert_eq!(hit, Some(ElementRef::node("s")));
    let hit = resolver().resolve(Point::new(30.0, 30.0), &nodes, &[], None);
    assert_eq!(hit, None);
}
