use uncover_graph::{gen_path, BacktrackingMatcher, Hypergraph, Matcher};

fn single_edge(label: &str) -> Hypergraph {
    let mut graph = Hypergraph::new();
    let a = graph.add_vertex();
    let b = graph.add_vertex();
    graph.add_edge(label, &[a, b]).unwrap();
    graph
}

#[test]
fn edge_pattern_matches_every_edge_of_a_path() {
    let pattern = single_edge("A");
    let target = gen_path(3, "A").unwrap();
    let matches = BacktrackingMatcher::new()
        .find_matches(&pattern, &target, true)
        .unwrap();
    assert_eq!(matches.len(), 3);
    for mapping in &matches {
        assert_eq!(mapping.len(), 3);
        assert!(mapping.is_injective());
    }
}

#[test]
fn labels_must_agree() {
    let pattern = single_edge("B");
    let target = gen_path(3, "A").unwrap();
    let matches = BacktrackingMatcher::new()
        .find_matches(&pattern, &target, false)
        .unwrap();
    assert!(matches.is_empty());
}

#[test]
fn non_injective_matches_may_fold_vertices_onto_loops() {
    let pattern = single_edge("A");
    let mut target = Hypergraph::new();
    let v = target.add_vertex();
    target.add_edge("A", &[v, v]).unwrap();
    let matcher = BacktrackingMatcher::new();
    assert!(matcher.find_matches(&pattern, &target, true).unwrap().is_empty());
    assert_eq!(matcher.find_matches(&pattern, &target, false).unwrap().len(), 1);
}

#[test]
fn isolated_vertices_range_over_the_target() {
    let mut pattern = Hypergraph::new();
    pattern.add_vertex();
    pattern.add_vertex();
    let mut target = Hypergraph::new();
    for _ in 0..3 {
        target.add_vertex();
    }
    let matcher = BacktrackingMatcher::new();
    assert_eq!(matcher.find_matches(&pattern, &target, true).unwrap().len(), 6);
    assert_eq!(matcher.find_matches(&pattern, &target, false).unwrap().len(), 9);
    assert_eq!(
        BacktrackingMatcher::stop_fast()
            .find_matches(&pattern, &target, false)
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn empty_pattern_has_one_match() {
    let target = gen_path(2, "A").unwrap();
    let matches = BacktrackingMatcher::new()
        .find_matches(&Hypergraph::new(), &target, true)
        .unwrap();
    assert_eq!(matches.len(), 1);
    assert!(matches[0].is_empty());
}
