//! End-to-end pipeline: encoded store image → snapshot → graph → dot.

use rbprobe::testkit::{store_image, StoredNode};
use rbprobe::{GraphDescription, ProbeError, SliceReader, TreeHandle, TreeSnapshot};

fn stored(
    red: bool,
    parent: Option<u64>,
    left: Option<u64>,
    right: Option<u64>,
    value: u64,
) -> StoredNode {
    StoredNode {
        red,
        parent,
        left,
        right,
        value,
    }
}

#[test]
fn three_node_tree_renders_expected_dot() {
    let nodes = vec![
        stored(false, None, Some(1), Some(2), 10),
        stored(true, Some(0), None, None, 5),
        stored(false, Some(0), None, None, 20),
    ];
    let reader = SliceReader::new(0x7000_0000, store_image(Some(0), &nodes));
    let snapshot = TreeSnapshot::capture(&reader, &TreeHandle::at(0x7000_0000))
        .expect("capture from fixture image");
    assert_eq!(snapshot.len(), 3, "every stored record decoded");

    let graph = GraphDescription::from_snapshot(&snapshot).expect("walk valid snapshot");
    assert_eq!(graph.nodes.len(), 3, "no placeholders for leaf children");
    assert_eq!(graph.edges.len(), 2);

    let dot = graph.to_string();
    let expected = "digraph G {\n\
                    \x20 graph [ordering=\"out\"];\n\
                    \x20 10 [label=\"0,10\", color=\"black\"];\n\
                    \x20 5 [label=\"1,5\", color=\"red\"];\n\
                    \x20 20 [label=\"2,20\", color=\"black\"];\n\
                    \x20 10 -> 5;\n\
                    \x20 10 -> 20;\n\
                    }";
    assert_eq!(dot, expected);
}

#[test]
fn empty_tree_renders_empty_digraph() {
    let reader = SliceReader::new(0, store_image(None, &[]));
    let snapshot = TreeSnapshot::capture(&reader, &TreeHandle::at(0)).expect("capture empty tree");
    let graph = GraphDescription::from_snapshot(&snapshot).expect("walk empty snapshot");
    assert!(graph.nodes.is_empty());
    assert!(graph.edges.is_empty());
    assert_eq!(
        graph.to_string(),
        "digraph G {\n  graph [ordering=\"out\"];\n}"
    );
}

#[test]
fn internal_node_missing_one_side_gets_single_placeholder() {
    // 10 has only a right child; the left side gets a point node.
    let nodes = vec![
        stored(false, None, None, Some(1), 10),
        stored(true, Some(0), None, None, 20),
    ];
    let reader = SliceReader::new(0, store_image(Some(0), &nodes));
    let snapshot = TreeSnapshot::capture(&reader, &TreeHandle::at(0)).unwrap();
    let graph = GraphDescription::from_snapshot(&snapshot).unwrap();

    let points: Vec<_> = graph.nodes.iter().filter(|n| n.point).collect();
    assert_eq!(points.len(), 1, "exactly one placeholder");
    assert_eq!(points[0].name, "left10");
    assert_eq!(
        graph.edges.len(),
        2,
        "one placeholder edge plus one real edge"
    );
}

#[test]
fn corrupted_child_index_never_reaches_the_walker() {
    let nodes = vec![stored(false, None, None, Some(1), 3)];
    let reader = SliceReader::new(0, store_image(Some(0), &nodes));
    let err = TreeSnapshot::capture(&reader, &TreeHandle::at(0)).unwrap_err();
    assert!(
        matches!(err, ProbeError::Index { index: 1, len: 1 }),
        "out-of-range child must fail capture, got {err:?}"
    );
}

#[test]
fn deeper_tree_traverses_left_before_right() {
    //        8
    //      /   \
    //     4     12
    //    / \
    //   2   6
    let nodes = vec![
        stored(false, None, Some(1), Some(2), 8),
        stored(true, Some(0), Some(3), Some(4), 4),
        stored(false, Some(0), None, None, 12),
        stored(false, Some(1), None, None, 2),
        stored(false, Some(1), None, None, 6),
    ];
    let reader = SliceReader::new(0, store_image(Some(0), &nodes));
    let snapshot = TreeSnapshot::capture(&reader, &TreeHandle::at(0)).unwrap();
    let graph = GraphDescription::from_snapshot(&snapshot).unwrap();

    let edges: Vec<_> = graph
        .edges
        .iter()
        .map(|e| (e.from.as_str(), e.to.as_str()))
        .collect();
    assert_eq!(
        edges,
        vec![("8", "4"), ("4", "2"), ("4", "6"), ("8", "12")],
        "edges emitted in depth-first order, left side first"
    );
    assert!(graph.nodes.iter().all(|n| !n.point));
}

#[test]
fn capture_is_deterministic_across_repeated_inspections() {
    let nodes = vec![
        stored(false, None, Some(1), None, 7),
        stored(true, Some(0), None, None, 3),
    ];
    let reader = SliceReader::new(0, store_image(Some(0), &nodes));
    let first = TreeSnapshot::capture(&reader, &TreeHandle::at(0)).unwrap();
    let second = TreeSnapshot::capture(&reader, &TreeHandle::at(0)).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        GraphDescription::from_snapshot(&first).unwrap(),
        GraphDescription::from_snapshot(&second).unwrap()
    );
}
