use uncover_core::UncoverError;
use uncover_graph::{canonical_hash, Hypergraph};

#[test]
fn add_delete_and_incidence() {
    let mut graph = Hypergraph::new();
    let a = graph.add_vertex();
    let b = graph.add_vertex();
    let loop_edge = graph.add_edge("A", &[a, a]).unwrap();
    let link = graph.add_edge("B", &[a, b]).unwrap();

    assert_eq!(graph.vertex_count(), 2);
    assert_eq!(graph.edge_count(), 2);
    assert!(graph.is_edge(loop_edge));
    assert!(graph.is_vertex(b));
    assert_eq!(graph.incident_edges(a).unwrap().len(), 2);
    assert_eq!(graph.edge(loop_edge).unwrap().tentacles(), &[a, a]);

    let mut removed = Vec::new();
    graph.delete_vertex(a, &mut removed).unwrap();
    removed.sort();
    assert_eq!(removed, vec![loop_edge, link]);
    assert_eq!(graph.edge_count(), 0);
    assert!(graph.incident_edges(b).unwrap().is_empty());
}

#[test]
fn unknown_elements_are_reported() {
    let mut graph = Hypergraph::new();
    let a = graph.add_vertex();
    let edge = graph.add_edge("A", &[a]).unwrap();

    assert!(matches!(
        graph.add_edge("A", &[edge]),
        Err(UncoverError::Graph(info)) if info.code == "unknown-vertex"
    ));
    graph.delete_edge(edge).unwrap();
    assert!(matches!(
        graph.delete_edge(edge),
        Err(UncoverError::Graph(info)) if info.code == "unknown-edge"
    ));
    let mut removed = Vec::new();
    assert!(graph.delete_vertex(edge, &mut removed).is_err());
}

#[test]
fn merging_vertices_rewrites_tentacles() {
    let mut graph = Hypergraph::new();
    let a = graph.add_vertex();
    let b = graph.add_vertex();
    let c = graph.add_vertex();
    let e1 = graph.add_edge("A", &[a, b]).unwrap();
    let e2 = graph.add_edge("A", &[c, c]).unwrap();

    let merged = graph.merge_vertices(&[c, b]).unwrap();
    assert_eq!(merged.survivor, b);
    assert_eq!(merged.resolve(c), b);
    assert_eq!(graph.vertex_count(), 2);
    assert_eq!(graph.edge(e2).unwrap().tentacles(), &[b, b]);
    assert_eq!(graph.edge(e1).unwrap().tentacles(), &[a, b]);
    assert!(graph.incident_edges(b).unwrap().contains(&e2));
}

#[test]
fn merging_edges_merges_tentacles_positionwise() {
    let mut graph = Hypergraph::new();
    let vs: Vec<_> = (0..4).map(|_| graph.add_vertex()).collect();
    let e1 = graph.add_edge("A", &[vs[0], vs[1]]).unwrap();
    let e2 = graph.add_edge("A", &[vs[2], vs[3]]).unwrap();
    let e3 = graph.add_edge("B", &[vs[3]]).unwrap();

    let merged = graph.merge_edges(&[e2, e1]).unwrap();
    assert_eq!(merged.survivor, e1);
    assert_eq!(merged.resolve(e2), e1);
    assert_eq!(merged.resolve(vs[2]), vs[0]);
    assert_eq!(merged.resolve(vs[3]), vs[1]);
    assert_eq!(graph.vertex_count(), 2);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.edge(e3).unwrap().tentacles(), &[vs[1]]);
}

#[test]
fn merging_edges_chains_vertex_redirects() {
    let mut graph = Hypergraph::new();
    let vs: Vec<_> = (0..3).map(|_| graph.add_vertex()).collect();
    let e1 = graph.add_edge("A", &[vs[1], vs[0]]).unwrap();
    let e2 = graph.add_edge("A", &[vs[2], vs[1]]).unwrap();

    let merged = graph.merge_edges(&[e1, e2]).unwrap();
    assert_eq!(graph.vertex_count(), 1);
    assert_eq!(merged.resolve(vs[1]), vs[0]);
    assert_eq!(merged.resolve(vs[2]), vs[0]);
    assert_eq!(graph.edge(e1).unwrap().tentacles(), &[vs[0], vs[0]]);
}

#[test]
fn incompatible_edges_refuse_to_merge() {
    let mut graph = Hypergraph::new();
    let a = graph.add_vertex();
    let e1 = graph.add_edge("A", &[a]).unwrap();
    let e2 = graph.add_edge("B", &[a]).unwrap();
    let e3 = graph.add_edge("A", &[a, a]).unwrap();
    for pair in [[e1, e2], [e1, e3]] {
        assert!(matches!(
            graph.merge_edges(&pair),
            Err(UncoverError::Graph(info)) if info.code == "incompatible-edges"
        ));
    }
    assert!(graph.merge_vertices(&[]).is_err());
}

#[test]
fn parallel_edges_are_detected() {
    let mut graph = Hypergraph::new();
    let a = graph.add_vertex();
    let b = graph.add_vertex();
    let e1 = graph.add_edge("A", &[a, b]).unwrap();
    let e2 = graph.add_edge("A", &[a, b]).unwrap();
    let e3 = graph.add_edge("A", &[b, a]).unwrap();
    assert!(graph.are_parallel(e1, e2));
    assert!(!graph.are_parallel(e1, e3));
    assert!(!graph.are_parallel(e1, a));
}

#[test]
fn copies_keep_ids_and_allocate_fresh_ones() {
    let mut graph = Hypergraph::new();
    let a = graph.add_vertex();
    graph.add_edge("A", &[a]).unwrap();
    let mut copy = graph.clone();
    assert_eq!(canonical_hash(&graph), canonical_hash(&copy));
    let fresh = copy.add_vertex();
    assert!(!graph.contains(fresh));
    assert!(copy.contains(a));
    assert_ne!(canonical_hash(&graph), canonical_hash(&copy));
}
