use uncover_core::{ElementId, UncoverError};
use uncover_graph::{Hypergraph, Mapping, Rule};

/// `L = x -A-> y`, `R = x' -A-> y' -B-> z'` preserving the `A` edge.
fn edge_extension() -> (Rule, Vec<ElementId>, Vec<ElementId>) {
    let mut left = Hypergraph::new();
    let x = left.add_vertex();
    let y = left.add_vertex();
    let a = left.add_edge("A", &[x, y]).unwrap();

    let mut right = Hypergraph::new();
    let rx = right.add_vertex();
    let ry = right.add_vertex();
    let rz = right.add_vertex();
    let ra = right.add_edge("A", &[rx, ry]).unwrap();
    let rb = right.add_edge("B", &[ry, rz]).unwrap();

    let mapping: Mapping = [(x, rx), (y, ry), (a, ra)].into_iter().collect();
    let rule = Rule::new(left, right, mapping).unwrap();
    (rule, vec![x, y, a], vec![rx, ry, rz, ra, rb])
}

#[test]
fn totality_and_injectivity() {
    let (rule, left, right) = edge_extension();
    assert!(rule.is_total());
    assert!(rule.is_injective());
    assert!(rule.preserves(left[0]));
    assert!(rule.creates(right[2]));
    assert!(rule.creates(right[4]));
    assert!(!rule.creates(right[0]));
}

#[test]
fn malformed_mappings_are_rejected() {
    let mut left = Hypergraph::new();
    let x = left.add_vertex();
    let a = left.add_edge("A", &[x]).unwrap();
    let mut right = Hypergraph::new();
    let rx = right.add_vertex();
    let rb = right.add_edge("B", &[rx]).unwrap();

    let wrong_label: Mapping = [(x, rx), (a, rb)].into_iter().collect();
    assert!(matches!(
        Rule::new(left.clone(), right.clone(), wrong_label),
        Err(UncoverError::Rule(info)) if info.code == "not-a-morphism"
    ));
    let missing_tentacle: Mapping = [(a, rb)].into_iter().collect();
    assert!(Rule::new(left.clone(), right.clone(), missing_tentacle).is_err());
    let kind_mismatch: Mapping = [(x, rb)].into_iter().collect();
    assert!(Rule::new(left, right, kind_mismatch).is_err());
}

#[test]
fn dangling_condition_blocks_extra_edges_on_created_vertices() {
    let (rule, _, right) = edge_extension();
    let mut graph = Hypergraph::new();
    let g: Vec<_> = (0..3).map(|_| graph.add_vertex()).collect();
    let ga = graph.add_edge("A", &[g[0], g[1]]).unwrap();
    let gb = graph.add_edge("B", &[g[1], g[2]]).unwrap();
    let comatch: Mapping = [
        (right[0], g[0]),
        (right[1], g[1]),
        (right[2], g[2]),
        (right[3], ga),
        (right[4], gb),
    ]
    .into_iter()
    .collect();
    assert!(rule.is_backward_applicable(&graph, &comatch));

    let mut dangling = graph.clone();
    dangling.add_edge("C", &[g[2]]).unwrap();
    assert!(!rule.is_backward_applicable(&dangling, &comatch));

    let mut partial = comatch.clone();
    partial.remove_source(right[4]);
    assert!(!rule.is_backward_applicable(&graph, &partial));
}

#[test]
fn identification_condition_rejects_created_collisions() {
    let (rule, _, right) = edge_extension();
    let mut graph = Hypergraph::new();
    let g0 = graph.add_vertex();
    let g1 = graph.add_vertex();
    let ga = graph.add_edge("A", &[g0, g1]).unwrap();
    let gb = graph.add_edge("B", &[g1, g1]).unwrap();
    // z' (created) and y' (preserved) land on the same vertex.
    let comatch: Mapping = [
        (right[0], g0),
        (right[1], g1),
        (right[2], g1),
        (right[3], ga),
        (right[4], gb),
    ]
    .into_iter()
    .collect();
    assert!(!rule.is_backward_applicable(&graph, &comatch));
}

#[test]
fn conflict_freedom_compares_deletion_status() {
    let mut left = Hypergraph::new();
    let keep = left.add_vertex();
    let drop_a = left.add_vertex();
    let drop_b = left.add_vertex();
    let mut right = Hypergraph::new();
    let kept = right.add_vertex();
    let rule = Rule::new(left, right, [(keep, kept)].into_iter().collect()).unwrap();
    assert!(!rule.is_total());

    let target = ElementId::from_raw(100);
    let deleted_together: Mapping = [(keep, ElementId::from_raw(99)), (drop_a, target), (drop_b, target)]
        .into_iter()
        .collect();
    assert!(rule.is_conflict_free(&deleted_together));
    let mixed: Mapping = [(keep, target), (drop_a, target), (drop_b, ElementId::from_raw(7))]
        .into_iter()
        .collect();
    assert!(!rule.is_conflict_free(&mixed));
}
