use sha2::{Digest, Sha256};

use crate::hypergraph::Hypergraph;
use crate::mapping::Mapping;

/// Computes a SHA-256 digest of the graph's structure, ids included.
///
/// Two graphs hash equally exactly when they have the same vertex ids and the
/// same edges (id, label, tentacles). Used to compare enumeration runs.
pub fn canonical_hash(graph: &Hypergraph) -> String {
    let mut hasher = Sha256::new();
    hasher.update((graph.vertex_count() as u64).to_le_bytes());
    for vertex in graph.vertices() {
        hasher.update(vertex.as_raw().to_le_bytes());
    }
    hasher.update((graph.edge_count() as u64).to_le_bytes());
    for (id, edge) in graph.edges() {
        hasher.update(id.as_raw().to_le_bytes());
        update_label(edge.label(), &mut hasher);
        hasher.update((edge.arity() as u64).to_le_bytes());
        for tentacle in edge.tentacles() {
            hasher.update(tentacle.as_raw().to_le_bytes());
        }
    }
    format!("{:x}", hasher.finalize())
}

/// Computes a SHA-256 digest of a mapping's `(source, target)` pairs.
pub fn mapping_hash(mapping: &Mapping) -> String {
    let mut hasher = Sha256::new();
    hasher.update((mapping.len() as u64).to_le_bytes());
    for (source, target) in mapping.iter() {
        hasher.update(source.as_raw().to_le_bytes());
        hasher.update(target.as_raw().to_le_bytes());
    }
    format!("{:x}", hasher.finalize())
}

fn update_label(label: &str, hasher: &mut Sha256) {
    hasher.update((label.len() as u64).to_le_bytes());
    hasher.update(label.as_bytes());
}
