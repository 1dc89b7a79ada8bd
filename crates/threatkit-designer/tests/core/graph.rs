use proptest::prelude::*;
use threatkit_core::ModelKind;
use threatkit_designer::{Anchors, EditorState, ElementRef, Point, ShapeKind, Stencil};

fn editor() -> EditorState {
    let mut state = EditorState::default();
    state
        .request_new("Untitled", ModelKind::Infrastructure)
        .unwrap();
    state
}

proptest! {
    #[test]
    fn container_drop_never_nests(
        x in -200.0f64..600.0,
        y in -200.0f64..600.0,
        layers in 1usize..4,
    ) {
        let mut state = editor();
        for i in 0..layers {
            let offset = i as f64 * 10.0;
            state
                .drop_stencil(&Stencil::new("boundary").container(), Point::new(offset, offset))
                .unwrap();
        }

        let dropped = state
            .drop_stencil(&Stencil::new("enclave").container(), Point::new(x, y))
            .unwrap();
        let node = state.graph().node(&dropped).unwrap();
        prop_assert_eq!(node.kind, ShapeKind::Boundary);
        prop_assert_eq!(node.parent_id.as_deref(), None);
        prop_assert!(state.graph().nodes().iter().all(|n| !n.is_container() || n.parent_id.is_none()));
    }
}

#[test]
fn test_regular_drop_nests_in_innermost_container() {
    let mut state = editor();
    let outer = state
        .drop_stencil(&Stencil::new("boundary").container(), Point::new(0.0, 0.0))
        .unwrap();
    state.resize_node(&outer, 1000.0, 1000.0).unwrap();
    let inner = state
        .drop_stencil(&Stencil::new("boundary").container(), Point::new(100.0, 100.0))
        .unwrap();

    let server = state
        .drop_stencil(&Stencil::new("server"), Point::new(150.0, 150.0))
        .unwrap();
    assert_eq!(
        state.graph().node(&server).unwrap().parent_id.as_deref(),
        Some(inner.as_str())
    );

    let outside = state
        .drop_stencil(&Stencil::new("server"), Point::new(900.0, 900.0))
        .unwrap();
    assert_eq!(
        state.graph().node(&outside).unwrap().parent_id.as_deref(),
        Some(outer.as_str())
    );
}

#[test]
fn test_deleting_node_cascades_edges() {
    let mut state = editor();
    let ids: Vec<String> = (0..3)
        .map(|i| {
            state
                .drop_stencil(&Stencil::new("server"), Point::new(i as f64 * 400.0, 2000.0))
                .unwrap()
        })
        .collect();
    let ab = state.connect(&ids[0], &ids[1], Anchors::default()).unwrap();
    let bc = state.connect(&ids[1], &ids[2], Anchors::default()).unwrap();
    let ca = state.connect(&ids[2], &ids[0], Anchors::default()).unwrap();

    // selection on an unrelated edge survives
    state.select(Some(ElementRef::edge(&bc)));
    state.delete(&ids[0]).unwrap();

    assert!(state.graph().edge(&ab).is_none());
    assert!(state.graph().edge(&ca).is_none());
    assert!(state.graph().edge(&bc).is_some());
    assert_eq!(state.selection().selected(), Some(&ElementRef::edge(&bc)));

    // selection on the removed node is cleared
    state.select(Some(ElementRef::node(&ids[1])));
    state.delete(&ids[1]).unwrap();
    assert_eq!(state.graph().edge_count(), 0);
    assert_eq!(state.selection().selected(), None);
}

#[test]
fn test_deleting_container_detaches_children() {
    let mut state = editor();
    let zone = state
        .drop_stencil(&Stencil::new("boundary").container(), Point::new(100.0, 100.0))
        .unwrap();
    let server = state
        .drop_stencil(&Stencil::new("server"), Point::new(150.0, 150.0))
        .unwrap();

    state.delete(&zone).unwrap();
    let node = state.graph().node(&server).unwrap();
    assert_eq!(node.parent_id, None);
    assert_eq!(node.position, Point::new(150.0, 150.0));
}

#[test]
fn test_stacking_order_matches_hit_ranking() {
    let mut state = editor();
    let zone = state
        .drop_stencil(&Stencil::new("boundary").container(), Point::new(0.0, 0.0))
        .unwrap();
    let a = state
        .drop_stencil(&Stencil::new("server"), Point::new(20.0, 20.0))
        .unwrap();
    let b = state
        .drop_stencil(&Stencil::new("server"), Point::new(40.0, 40.0))
        .unwrap();

    assert_eq!(state.stacking_order(), vec![zone.clone(), a.clone(), b.clone()]);
    state.select(Some(ElementRef::node(&a)));
    assert_eq!(state.stacking_order(), vec![zone, b, a]);
}
