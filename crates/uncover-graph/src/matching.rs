use std::collections::{BTreeMap, BTreeSet};

use uncover_core::errors::UncoverError;
use uncover_core::ElementId;

use crate::hypergraph::Hypergraph;
use crate::mapping::Mapping;

/// Service computing hypergraph morphisms from a pattern into a target.
pub trait Matcher {
    /// Returns every morphism `pattern → target`, injective if requested.
    fn find_matches(
        &self,
        pattern: &Hypergraph,
        target: &Hypergraph,
        injective: bool,
    ) -> Result<Vec<Mapping>, UncoverError>;
}

/// Deterministic backtracking matcher.
///
/// Pattern edges are placed first, in ascending id order, which fixes most
/// vertices through their tentacles; the vertices left over are placed
/// afterwards. Results come out in lexicographic order of the choices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BacktrackingMatcher {
    stop_fast: bool,
}

impl BacktrackingMatcher {
    /// Matcher returning all morphisms.
    pub fn new() -> Self {
        Self { stop_fast: false }
    }

    /// Matcher returning at most one morphism.
    pub fn stop_fast() -> Self {
        Self { stop_fast: true }
    }
}

impl Matcher for BacktrackingMatcher {
    fn find_matches(
        &self,
        pattern: &Hypergraph,
        target: &Hypergraph,
        injective: bool,
    ) -> Result<Vec<Mapping>, UncoverError> {
        let mut search = Search::new(pattern, target, injective, self.stop_fast);
        search.place_edge(0);
        tracing::trace!(
            pattern_elements = pattern.vertex_count() + pattern.edge_count(),
            target_elements = target.vertex_count() + target.edge_count(),
            injective,
            found = search.results.len(),
            "matcher finished"
        );
        Ok(search.results)
    }
}

struct Search<'a> {
    pattern: &'a Hypergraph,
    target: &'a Hypergraph,
    injective: bool,
    stop_fast: bool,
    pattern_edges: Vec<ElementId>,
    pattern_vertices: Vec<ElementId>,
    candidates: BTreeMap<(&'a str, usize), Vec<ElementId>>,
    assignment: BTreeMap<ElementId, ElementId>,
    used: BTreeSet<ElementId>,
    results: Vec<Mapping>,
}

impl<'a> Search<'a> {
    fn new(pattern: &'a Hypergraph, target: &'a Hypergraph, injective: bool, stop_fast: bool) -> Self {
        let mut candidates: BTreeMap<(&'a str, usize), Vec<ElementId>> = BTreeMap::new();
        for (id, edge) in target.edges() {
            candidates
                .entry((edge.label(), edge.arity()))
                .or_default()
                .push(id);
        }
        Self {
            pattern,
            target,
            injective,
            stop_fast,
            pattern_edges: pattern.edge_ids().collect(),
            pattern_vertices: pattern.vertices().collect(),
            candidates,
            assignment: BTreeMap::new(),
            used: BTreeSet::new(),
            results: Vec::new(),
        }
    }

    fn done(&self) -> bool {
        self.stop_fast && !self.results.is_empty()
    }

    fn place_edge(&mut self, index: usize) {
        let Some(&edge_id) = self.pattern_edges.get(index) else {
            self.place_vertex(0);
            return;
        };
        let (pattern, target) = (self.pattern, self.target);
        let Some(edge) = pattern.edge(edge_id) else {
            return;
        };
        let key = (edge.label(), edge.arity());
        let options = self.candidates.get(&key).cloned().unwrap_or_default();
        for image in options {
            if self.done() {
                return;
            }
            if self.injective && self.used.contains(&image) {
                continue;
            }
            let Some(image_edge) = target.edge(image) else {
                continue;
            };
            let mut placed = Vec::new();
            let fits = edge
                .tentacles()
                .iter()
                .zip(image_edge.tentacles())
                .all(|(vertex, vertex_image)| self.bind(*vertex, *vertex_image, &mut placed));
            if fits {
                self.bind_fresh(edge_id, image);
                self.place_edge(index + 1);
                self.unbind(edge_id);
            }
            for vertex in placed {
                self.unbind(vertex);
            }
        }
    }

    fn place_vertex(&mut self, index: usize) {
        let Some(&vertex) = self.pattern_vertices.get(index) else {
            self.results.push(self.assignment.iter().map(|(s, t)| (*s, *t)).collect());
            return;
        };
        if self.assignment.contains_key(&vertex) {
            self.place_vertex(index + 1);
            return;
        }
        let options: Vec<ElementId> = self.target.vertices().collect();
        for image in options {
            if self.done() {
                return;
            }
            if self.injective && self.used.contains(&image) {
                continue;
            }
            self.bind_fresh(vertex, image);
            self.place_vertex(index + 1);
            self.unbind(vertex);
        }
    }

    /// Binds a tentacle vertex, recording it in `placed` when newly assigned.
    fn bind(&mut self, vertex: ElementId, image: ElementId, placed: &mut Vec<ElementId>) -> bool {
        match self.assignment.get(&vertex) {
            Some(existing) => *existing == image,
            None => {
                if self.injective && self.used.contains(&image) {
                    return false;
                }
                self.bind_fresh(vertex, image);
                placed.push(vertex);
                true
            }
        }
    }

    fn bind_fresh(&mut self, source: ElementId, image: ElementId) {
        self.assignment.insert(source, image);
        if self.injective {
            self.used.insert(image);
        }
    }

    fn unbind(&mut self, source: ElementId) {
        if let Some(image) = self.assignment.remove(&source) {
            if self.injective {
                self.used.remove(&image);
            }
        }
    }
}
