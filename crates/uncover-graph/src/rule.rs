use uncover_core::errors::{ErrorInfo, UncoverError};
use uncover_core::ElementId;

use crate::hypergraph::Hypergraph;
use crate::mapping::Mapping;

/// Rewrite rule `L ⇀ R` given by a partial hypergraph morphism.
///
/// Elements of `L` outside the mapping's domain are deleted by the rule,
/// elements of `R` outside its image are created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    left: Hypergraph,
    right: Hypergraph,
    mapping: Mapping,
}

impl Rule {
    /// Builds a rule after checking that `mapping` is a partial morphism.
    pub fn new(left: Hypergraph, right: Hypergraph, mapping: Mapping) -> Result<Self, UncoverError> {
        for (source, target) in mapping.iter() {
            if left.is_vertex(source) {
                if !right.is_vertex(target) {
                    return Err(not_a_morphism("vertex mapped to a non-vertex", source, target));
                }
                continue;
            }
            let Some(edge) = left.edge(source) else {
                return Err(not_a_morphism("source is not an element of L", source, target));
            };
            let Some(image) = right.edge(target) else {
                return Err(not_a_morphism("edge mapped to a non-edge", source, target));
            };
            if edge.label() != image.label() || edge.arity() != image.arity() {
                return Err(not_a_morphism("edge label or arity differs", source, target));
            }
            for (tentacle, expected) in edge.tentacles().iter().zip(image.tentacles()) {
                if mapping.get(*tentacle) != Some(*expected) {
                    return Err(not_a_morphism("tentacles are not preserved", source, target)
                        .with_context("tentacle", tentacle));
                }
            }
        }
        Ok(Self {
            left,
            right,
            mapping,
        })
    }

    /// Returns the left-hand side.
    pub fn left(&self) -> &Hypergraph {
        &self.left
    }

    /// Returns the right-hand side.
    pub fn right(&self) -> &Hypergraph {
        &self.right
    }

    /// Returns the morphism `L ⇀ R`.
    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    /// Returns whether every element of `L` is mapped.
    pub fn is_total(&self) -> bool {
        self.mapping.len() == self.left.vertex_count() + self.left.edge_count()
    }

    /// Returns whether no two elements of `L` share an image.
    pub fn is_injective(&self) -> bool {
        self.mapping.is_injective()
    }

    /// Returns whether the rule keeps the `L`-element `id`.
    pub fn preserves(&self, id: ElementId) -> bool {
        self.mapping.contains(id)
    }

    /// Returns whether the `R`-element `id` is created by the rule.
    pub fn creates(&self, id: ElementId) -> bool {
        self.right.contains(id) && !self.mapping.has_preimage(id)
    }

    /// Checks whether `comatch: R → graph` can be undone.
    ///
    /// Identification condition: elements of `R` sharing an image must all be
    /// preserved by the rule. Dangling condition: a vertex created by the rule
    /// may only be attached to edges inside the co-match's image.
    pub fn is_backward_applicable(&self, graph: &Hypergraph, comatch: &Mapping) -> bool {
        if self.right.elements().any(|id| !comatch.contains(id)) {
            return false;
        }
        for (_, sources) in comatch.collisions() {
            if sources.iter().any(|source| self.creates(*source)) {
                return false;
            }
        }
        for vertex in self.right.vertices().filter(|id| self.creates(*id)) {
            let Some(image) = comatch.get(vertex) else {
                return false;
            };
            let Some(incident) = graph.incident_edges(image) else {
                return false;
            };
            if incident.iter().any(|edge| !comatch.has_preimage(*edge)) {
                return false;
            }
        }
        true
    }

    /// Checks that `matching: L → D` only identifies elements the rule treats
    /// alike: either all of them are preserved or all of them are deleted.
    pub fn is_conflict_free(&self, matching: &Mapping) -> bool {
        matching.collisions().all(|(_, sources)| {
            let preserved = sources.iter().filter(|id| self.preserves(**id)).count();
            preserved == 0 || preserved == sources.len()
        })
    }
}

fn not_a_morphism(message: &str, source: ElementId, target: ElementId) -> UncoverError {
    UncoverError::Rule(
        ErrorInfo::new("not-a-morphism", message)
            .with_context("source", source)
            .with_context("target", target),
    )
}
