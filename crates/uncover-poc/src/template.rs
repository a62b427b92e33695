use std::collections::BTreeMap;

use uncover_core::errors::{ErrorInfo, UncoverError};
use uncover_core::ElementId;
use uncover_graph::{Hypergraph, Mapping, Merged, Rule};

use crate::enumerator::PocResult;
use crate::partition::Partition;

/// Candidate context graph under construction.
///
/// Carries the graph together with the match `L → graph` and the projection
/// `graph ⇀ G` onto the target, both kept current across merges.
#[derive(Debug, Clone)]
pub(crate) struct Template {
    pub(crate) graph: Hypergraph,
    pub(crate) mapping: Mapping,
    pub(crate) projection: Mapping,
}

impl Template {
    pub(crate) fn merge_vertices(&mut self, ids: &[ElementId]) -> Result<(), UncoverError> {
        let merged = self.graph.merge_vertices(ids)?;
        self.follow(&merged);
        Ok(())
    }

    pub(crate) fn merge_edges(&mut self, ids: &[ElementId]) -> Result<(), UncoverError> {
        let merged = self.graph.merge_edges(ids)?;
        self.follow(&merged);
        Ok(())
    }

    /// Merges the vertices of every block of `partition`.
    pub(crate) fn glue_vertices(&mut self, partition: &Partition) -> Result<(), UncoverError> {
        for block in partition.nontrivial_blocks() {
            self.merge_vertices(&block)?;
        }
        Ok(())
    }

    /// Merges the edges of every block of `partition`.
    pub(crate) fn glue_edges(&mut self, partition: &Partition) -> Result<(), UncoverError> {
        for block in partition.nontrivial_blocks() {
            self.merge_edges(&block)?;
        }
        Ok(())
    }

    /// Template vertices grouped by the target vertex they project onto.
    pub(crate) fn vertex_fibres(&self) -> BTreeMap<ElementId, Vec<ElementId>> {
        self.fibres(self.graph.vertices())
    }

    /// Template edges grouped by the target edge they project onto.
    pub(crate) fn edge_fibres(&self) -> BTreeMap<ElementId, Vec<ElementId>> {
        self.fibres(self.graph.edge_ids())
    }

    /// Relates members whose `L`-preimages share an image under the rule.
    pub(crate) fn rule_reference(&self, rule: &Rule, members: &[ElementId]) -> Partition {
        let mut groups: BTreeMap<ElementId, Vec<ElementId>> = BTreeMap::new();
        for member in members {
            for source in self.mapping.preimages(*member) {
                if let Some(image) = rule.mapping().get(source) {
                    groups.entry(image).or_default().push(*member);
                }
            }
        }
        Partition::connecting(members.iter().copied(), groups.into_values())
    }

    pub(crate) fn into_result(self, comatch: &Mapping) -> PocResult {
        PocResult {
            graph: self.graph,
            mapping: self.mapping,
            comatch: comatch.clone(),
            projection: self.projection,
        }
    }

    fn fibres(&self, ids: impl Iterator<Item = ElementId>) -> BTreeMap<ElementId, Vec<ElementId>> {
        let mut fibres: BTreeMap<ElementId, Vec<ElementId>> = BTreeMap::new();
        for id in ids {
            if let Some(target) = self.projection.get(id) {
                fibres.entry(target).or_default().push(id);
            }
        }
        fibres
    }

    fn follow(&mut self, merged: &Merged) {
        self.mapping.redirect_targets(&merged.redirects);
        self.projection.redirect_sources(&merged.redirects);
    }
}

/// Looks up the image of the `L`-element `source` under `comatch ∘ rule`.
pub(crate) fn composite_image(
    rule: &Rule,
    comatch: &Mapping,
    source: ElementId,
) -> Result<ElementId, UncoverError> {
    rule.mapping()
        .get(source)
        .and_then(|image| comatch.get(image))
        .ok_or_else(|| {
            UncoverError::InvalidState(
                ErrorInfo::new("unmapped-element", "element has no image in the target")
                    .with_context("element", source),
            )
        })
}
