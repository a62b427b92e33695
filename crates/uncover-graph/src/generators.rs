use uncover_core::errors::UncoverError;
use uncover_core::rng::RngHandle;
use uncover_core::ElementId;

use crate::hypergraph::Hypergraph;

/// Generates a hypergraph with `n_vertices` vertices and `n_edges` random edges.
///
/// Labels are drawn from `labels`, arities from `1..=max_arity`, tentacles
/// uniformly from the vertices (so self-loops and parallel edges occur).
pub fn gen_random_hypergraph(
    n_vertices: usize,
    n_edges: usize,
    labels: &[&str],
    max_arity: usize,
    rng: &mut RngHandle,
) -> Result<Hypergraph, UncoverError> {
    if n_vertices == 0 && n_edges > 0 {
        return Err(UncoverError::graph(
            "empty-graph",
            "edges need at least one vertex to attach to",
        ));
    }
    if labels.is_empty() && n_edges > 0 {
        return Err(UncoverError::graph("no-labels", "edges need at least one label"));
    }
    let mut graph = Hypergraph::new();
    let vertices: Vec<ElementId> = (0..n_vertices).map(|_| graph.add_vertex()).collect();
    for _ in 0..n_edges {
        let label = labels[rng.index(labels.len())];
        let arity = 1 + rng.index(max_arity.max(1));
        let tentacles: Vec<ElementId> = (0..arity)
            .map(|_| vertices[rng.index(vertices.len())])
            .collect();
        graph.add_edge(label, &tentacles)?;
    }
    Ok(graph)
}

/// Generates a directed path of `length` binary edges labelled `label`.
pub fn gen_path(length: usize, label: &str) -> Result<Hypergraph, UncoverError> {
    let mut graph = Hypergraph::new();
    let mut previous = graph.add_vertex();
    for _ in 0..length {
        let next = graph.add_vertex();
        graph.add_edge(label, &[previous, next])?;
        previous = next;
    }
    Ok(graph)
}
