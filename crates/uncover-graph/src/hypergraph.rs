use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use uncover_core::errors::{ErrorInfo, UncoverError};
use uncover_core::{ElementId, IdAllocator};

/// Labelled hyperedge attached to an ordered tuple of vertices.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hyperedge {
    label: String,
    tentacles: Vec<ElementId>,
}

impl Hyperedge {
    /// Returns the edge label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the attached vertices in tentacle order.
    pub fn tentacles(&self) -> &[ElementId] {
        &self.tentacles
    }

    /// Returns the number of tentacles.
    pub fn arity(&self) -> usize {
        self.tentacles.len()
    }
}

/// Outcome of merging vertices or edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merged {
    /// Element that represents the merged class afterwards.
    pub survivor: ElementId,
    /// Every element folded away by the merge, mapped to the element replacing it.
    pub redirects: BTreeMap<ElementId, ElementId>,
}

impl Merged {
    /// Returns the element that now stands for `id`.
    pub fn resolve(&self, id: ElementId) -> ElementId {
        self.redirects.get(&id).copied().unwrap_or(id)
    }

    fn record(&mut self, removed: ElementId, replacement: ElementId) {
        for target in self.redirects.values_mut() {
            if *target == removed {
                *target = replacement;
            }
        }
        self.redirects.insert(removed, replacement);
    }
}

/// Hypergraph with labelled, ordered hyperedges.
///
/// Vertices and edges draw their ids from one [`IdAllocator`] owned by the
/// graph. Self-loops, repeated tentacles and parallel edges are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hypergraph {
    ids: IdAllocator,
    vertices: BTreeMap<ElementId, BTreeSet<ElementId>>,
    edges: BTreeMap<ElementId, Hyperedge>,
}

impl Hypergraph {
    /// Creates an empty hypergraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an isolated vertex.
    pub fn add_vertex(&mut self) -> ElementId {
        let id = self.ids.fresh();
        self.vertices.insert(id, BTreeSet::new());
        id
    }

    /// Adds a hyperedge with the given label and tentacles.
    pub fn add_edge(
        &mut self,
        label: impl Into<String>,
        tentacles: &[ElementId],
    ) -> Result<ElementId, UncoverError> {
        for vertex in tentacles {
            self.vertex(*vertex)?;
        }
        let id = self.ids.fresh();
        for vertex in tentacles {
            if let Some(incident) = self.vertices.get_mut(vertex) {
                incident.insert(id);
            }
        }
        self.edges.insert(
            id,
            Hyperedge {
                label: label.into(),
                tentacles: tentacles.to_vec(),
            },
        );
        Ok(id)
    }

    /// Removes an edge and returns it.
    pub fn delete_edge(&mut self, id: ElementId) -> Result<Hyperedge, UncoverError> {
        let edge = self.edges.remove(&id).ok_or_else(|| unknown("edge", id))?;
        for vertex in &edge.tentacles {
            if let Some(incident) = self.vertices.get_mut(vertex) {
                incident.remove(&id);
            }
        }
        Ok(edge)
    }

    /// Removes a vertex together with every incident edge.
    ///
    /// The ids of the removed edges are appended to `removed_edges`.
    pub fn delete_vertex(
        &mut self,
        id: ElementId,
        removed_edges: &mut Vec<ElementId>,
    ) -> Result<(), UncoverError> {
        let incident = self.vertices.remove(&id).ok_or_else(|| unknown("vertex", id))?;
        for edge in incident {
            if self.edges.contains_key(&edge) {
                self.delete_edge(edge)?;
                removed_edges.push(edge);
            }
        }
        Ok(())
    }

    /// Merges the given vertices into the one with the smallest id.
    pub fn merge_vertices(&mut self, ids: &[ElementId]) -> Result<Merged, UncoverError> {
        let class: BTreeSet<ElementId> = ids.iter().copied().collect();
        let survivor = *class
            .iter()
            .next()
            .ok_or_else(|| UncoverError::graph("empty-merge", "no vertices given to merge"))?;
        for vertex in &class {
            self.vertex(*vertex)?;
        }
        let mut merged = Merged {
            survivor,
            redirects: BTreeMap::new(),
        };
        for vertex in class.into_iter().skip(1) {
            self.fold_vertex(vertex, survivor);
            merged.record(vertex, survivor);
        }
        Ok(merged)
    }

    /// Merges parallel-compatible edges into the one with the smallest id.
    ///
    /// All edges must share label and arity. Vertices at equal tentacle
    /// positions are merged first, which makes the edges parallel; the
    /// redundant copies are then removed.
    pub fn merge_edges(&mut self, ids: &[ElementId]) -> Result<Merged, UncoverError> {
        let class: BTreeSet<ElementId> = ids.iter().copied().collect();
        let survivor = *class
            .iter()
            .next()
            .ok_or_else(|| UncoverError::graph("empty-merge", "no edges given to merge"))?;
        let reference = self.edge(survivor).ok_or_else(|| unknown("edge", survivor))?.clone();
        for edge in &class {
            let candidate = self.edge(*edge).ok_or_else(|| unknown("edge", *edge))?;
            if candidate.label != reference.label || candidate.arity() != reference.arity() {
                return Err(UncoverError::Graph(
                    ErrorInfo::new("incompatible-edges", "merged edges differ in label or arity")
                        .with_context("survivor", survivor)
                        .with_context("edge", edge),
                ));
            }
        }

        let mut merged = Merged {
            survivor,
            redirects: BTreeMap::new(),
        };
        for position in 0..reference.arity() {
            // Earlier positions may already have rewritten these tentacles.
            let column: Vec<ElementId> = class
                .iter()
                .filter_map(|edge| self.edges.get(edge))
                .map(|edge| edge.tentacles[position])
                .collect();
            let step = self.merge_vertices(&column)?;
            for (removed, replacement) in step.redirects {
                merged.record(removed, replacement);
            }
        }
        for edge in class.into_iter().skip(1) {
            self.delete_edge(edge)?;
            merged.record(edge, survivor);
        }
        Ok(merged)
    }

    /// Returns whether both edges exist and share label and tentacles.
    pub fn are_parallel(&self, first: ElementId, second: ElementId) -> bool {
        match (self.edges.get(&first), self.edges.get(&second)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Iterates over vertex ids in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.vertices.keys().copied()
    }

    /// Iterates over edges in ascending id order.
    pub fn edges(&self) -> impl Iterator<Item = (ElementId, &Hyperedge)> + '_ {
        self.edges.iter().map(|(id, edge)| (*id, edge))
    }

    /// Iterates over edge ids in ascending order.
    pub fn edge_ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.edges.keys().copied()
    }

    /// Iterates over all element ids, vertices first.
    pub fn elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.vertices().chain(self.edge_ids())
    }

    /// Returns the edge with the given id.
    pub fn edge(&self, id: ElementId) -> Option<&Hyperedge> {
        self.edges.get(&id)
    }

    /// Returns the edges attached to a vertex.
    pub fn incident_edges(&self, vertex: ElementId) -> Option<&BTreeSet<ElementId>> {
        self.vertices.get(&vertex)
    }

    /// Returns whether `id` is a vertex of this graph.
    pub fn is_vertex(&self, id: ElementId) -> bool {
        self.vertices.contains_key(&id)
    }

    /// Returns whether `id` is an edge of this graph.
    pub fn is_edge(&self, id: ElementId) -> bool {
        self.edges.contains_key(&id)
    }

    /// Returns whether `id` is a vertex or an edge of this graph.
    pub fn contains(&self, id: ElementId) -> bool {
        self.is_vertex(id) || self.is_edge(id)
    }

    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns whether the graph has neither vertices nor edges.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty()
    }

    fn vertex(&self, id: ElementId) -> Result<&BTreeSet<ElementId>, UncoverError> {
        self.vertices.get(&id).ok_or_else(|| unknown("vertex", id))
    }

    fn fold_vertex(&mut self, removed: ElementId, survivor: ElementId) {
        let incident = self.vertices.remove(&removed).unwrap_or_default();
        for edge_id in &incident {
            if let Some(edge) = self.edges.get_mut(edge_id) {
                for tentacle in edge.tentacles.iter_mut() {
                    if *tentacle == removed {
                        *tentacle = survivor;
                    }
                }
            }
        }
        if let Some(target) = self.vertices.get_mut(&survivor) {
            target.extend(incident);
        }
    }
}

fn unknown(kind: &str, id: ElementId) -> UncoverError {
    UncoverError::Graph(
        ErrorInfo::new(format!("unknown-{kind}"), format!("{kind} does not exist"))
            .with_context(kind, id),
    )
}
