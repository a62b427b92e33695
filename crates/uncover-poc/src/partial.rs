use std::collections::BTreeMap;
use std::sync::Arc;

use uncover_core::errors::UncoverError;
use uncover_core::{ElementId, MatchDiscipline, PocConfig};
use uncover_graph::{BacktrackingMatcher, Hyperedge, Hypergraph, Mapping, Matcher, Rule};

use crate::enumerator::{PocEnumerator, PocResult};
use crate::odometer::advance_odometer;
use crate::set_partition::SetPartitionEnumerator;
use crate::template::Template;
use crate::total::TotalPocEnumerator;

const COMPONENT: &str = "partial-poc";

/// Splits a partial rule `L ⇀ R` into `p: L ⇀ L'` and a total `t: L' → R`.
///
/// `L'` is `L` restricted to the rule's domain with ids kept, so `p` is a
/// partial identity and `t` carries the original mapping unchanged.
pub fn split_rule(rule: &Rule) -> Result<(Rule, Mapping), UncoverError> {
    let left = rule.left();
    let mut domain = left.clone();
    let deleted_edges: Vec<ElementId> = left.edge_ids().filter(|id| !rule.preserves(*id)).collect();
    for edge in deleted_edges {
        domain.delete_edge(edge)?;
    }
    let deleted_vertices: Vec<ElementId> = left.vertices().filter(|id| !rule.preserves(*id)).collect();
    let mut dangling = Vec::new();
    for vertex in deleted_vertices {
        domain.delete_vertex(vertex, &mut dangling)?;
    }
    let prefix = Mapping::identity(domain.elements());
    let total = Rule::new(domain, rule.right().clone(), rule.mapping().clone())?;
    Ok((total, prefix))
}

/// Enumerates the pushout complements of a partial rule.
///
/// Each result of the inner [`TotalPocEnumerator`] for the total part is
/// extended by fresh copies of the deleted elements of `L`. Under the
/// conflict-free discipline the fresh vertices may be merged among
/// themselves, and afterwards fresh edges that became parallel may be merged
/// as well. Edge mergers move fastest, then vertex mergers, then the inner
/// enumerator.
///
/// When original rules are given, a result is only kept if its match is
/// conflict-free for at least one of them. No original rules, or an empty
/// list, keeps every result.
#[derive(Debug)]
pub struct PartialPocEnumerator<M: Matcher = BacktrackingMatcher> {
    inner: TotalPocEnumerator<M>,
    lifecycle: Lifecycle,
}

#[derive(Debug)]
enum Lifecycle {
    Uninitialized,
    Active(Box<PartialState>),
    Invalidated,
}

#[derive(Debug)]
struct PartialState {
    rule: Arc<Rule>,
    prefix: Mapping,
    discipline: MatchDiscipline,
    original_rules: Option<Vec<Arc<Rule>>>,
    reattachment: Option<Reattachment>,
    current: Option<PocResult>,
}

#[derive(Debug)]
struct Reattachment {
    comatch: Mapping,
    template: Template,
    fresh_edges: Vec<ElementId>,
    vertex_merger: Option<SetPartitionEnumerator>,
    vertex_merged: Template,
    edge_mergers: Vec<SetPartitionEnumerator>,
}

impl PartialPocEnumerator<BacktrackingMatcher> {
    /// Creates an enumerator with the default configuration.
    pub fn new() -> Self {
        Self::with_config(PocConfig::default())
    }

    /// Creates an enumerator with the given configuration.
    pub fn with_config(config: PocConfig) -> Self {
        Self {
            inner: TotalPocEnumerator::with_config(config),
            lifecycle: Lifecycle::Uninitialized,
        }
    }
}

impl Default for PartialPocEnumerator<BacktrackingMatcher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Matcher> PartialPocEnumerator<M> {
    /// Replaces the matcher used by the inner enumerator.
    pub fn with_matcher<N: Matcher>(self, matcher: N) -> PartialPocEnumerator<N> {
        PartialPocEnumerator {
            inner: self.inner.with_matcher(matcher),
            lifecycle: self.lifecycle,
        }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &PocConfig {
        self.inner.config()
    }

    /// Starts enumerating the pushout complements of `rule` into `graph`.
    pub fn reset(
        &mut self,
        rule: Arc<Rule>,
        graph: Arc<Hypergraph>,
        discipline: MatchDiscipline,
        original_rules: Option<Vec<Arc<Rule>>>,
    ) -> Result<(), UncoverError> {
        if matches!(self.lifecycle, Lifecycle::Invalidated) {
            return Err(UncoverError::moved_from(COMPONENT));
        }
        self.lifecycle = Lifecycle::Uninitialized;
        let (total, prefix) = split_rule(&rule)?;
        tracing::debug!(
            deleted = rule.left().vertex_count() + rule.left().edge_count() - prefix.len(),
            original_rules = original_rules.as_ref().map_or(0, Vec::len),
            "partial poc enumerator reset"
        );
        self.inner.reset(Arc::new(total), graph, discipline)?;
        let mut state = PartialState {
            rule,
            prefix,
            discipline,
            original_rules,
            reattachment: None,
            current: None,
        };
        state.settle(&mut self.inner)?;
        self.lifecycle = Lifecycle::Active(Box::new(state));
        Ok(())
    }

    /// Returns whether no further result is available.
    pub fn ended(&self) -> Result<bool, UncoverError> {
        match &self.lifecycle {
            Lifecycle::Uninitialized => Ok(true),
            Lifecycle::Active(state) => Ok(state.current.is_none()),
            Lifecycle::Invalidated => Err(UncoverError::moved_from(COMPONENT)),
        }
    }

    /// Moves to the next kept pushout complement.
    pub fn advance(&mut self) -> Result<(), UncoverError> {
        match &mut self.lifecycle {
            Lifecycle::Uninitialized => Ok(()),
            Lifecycle::Active(state) => state.advance(&mut self.inner),
            Lifecycle::Invalidated => Err(UncoverError::moved_from(COMPONENT)),
        }
    }

    /// Returns the current pushout complement.
    pub fn current(&self) -> Result<&PocResult, UncoverError> {
        match &self.lifecycle {
            Lifecycle::Uninitialized => Err(UncoverError::exhausted(COMPONENT)),
            Lifecycle::Active(state) => state
                .current
                .as_ref()
                .ok_or_else(|| UncoverError::exhausted(COMPONENT)),
            Lifecycle::Invalidated => Err(UncoverError::moved_from(COMPONENT)),
        }
    }
}

impl<M: Matcher + Clone> PartialPocEnumerator<M> {
    /// Moves the enumeration state out, leaving `self` unusable.
    pub fn take(&mut self) -> Self {
        Self {
            inner: self.inner.take(),
            lifecycle: std::mem::replace(&mut self.lifecycle, Lifecycle::Invalidated),
        }
    }
}

impl<M: Matcher> PocEnumerator for PartialPocEnumerator<M> {
    fn ended(&self) -> Result<bool, UncoverError> {
        PartialPocEnumerator::ended(self)
    }

    fn advance(&mut self) -> Result<(), UncoverError> {
        PartialPocEnumerator::advance(self)
    }

    fn current(&self) -> Result<&PocResult, UncoverError> {
        PartialPocEnumerator::current(self)
    }
}

impl PartialState {
    fn advance<M: Matcher>(&mut self, inner: &mut TotalPocEnumerator<M>) -> Result<(), UncoverError> {
        if self.current.is_none() {
            return Ok(());
        }
        self.step(inner)?;
        self.settle(inner)
    }

    /// Moves forward until a kept result is found or everything is consumed.
    fn settle<M: Matcher>(&mut self, inner: &mut TotalPocEnumerator<M>) -> Result<(), UncoverError> {
        loop {
            let reattachment = match self.reattachment.take() {
                Some(reattachment) => reattachment,
                None => {
                    if inner.ended()? {
                        self.current = None;
                        return Ok(());
                    }
                    Reattachment::build(&self.rule, &self.prefix, self.discipline, inner.current()?)?
                }
            };
            let candidate = reattachment.materialize()?;
            self.reattachment = Some(reattachment);
            if self.keeps(&candidate) {
                self.current = Some(candidate);
                return Ok(());
            }
            tracing::trace!(
                elements = candidate.graph.vertex_count() + candidate.graph.edge_count(),
                "skipping match that no original rule accepts"
            );
            self.step(inner)?;
        }
    }

    fn step<M: Matcher>(&mut self, inner: &mut TotalPocEnumerator<M>) -> Result<(), UncoverError> {
        if let Some(reattachment) = self.reattachment.as_mut() {
            if reattachment.advance()? {
                return Ok(());
            }
        }
        self.reattachment = None;
        inner.advance()
    }

    fn keeps(&self, candidate: &PocResult) -> bool {
        match &self.original_rules {
            Some(rules) if !rules.is_empty() => rules
                .iter()
                .any(|rule| rule.is_conflict_free(&candidate.mapping)),
            _ => true,
        }
    }
}

impl Reattachment {
    fn build(
        rule: &Rule,
        prefix: &Mapping,
        discipline: MatchDiscipline,
        total: &PocResult,
    ) -> Result<Self, UncoverError> {
        let mut template = Template {
            graph: total.graph.clone(),
            mapping: prefix.concat(&total.mapping),
            projection: total.projection.clone(),
        };
        let left = rule.left();
        let mut fresh_vertices = Vec::new();
        for vertex in left.vertices().filter(|id| !rule.preserves(*id)) {
            let copy = template.graph.add_vertex();
            template.mapping.insert(vertex, copy);
            fresh_vertices.push(copy);
        }
        let mut fresh_edges = Vec::new();
        for (edge, hyperedge) in left.edges().filter(|(id, _)| !rule.preserves(*id)) {
            let tentacles = hyperedge
                .tentacles()
                .iter()
                .map(|tentacle| {
                    template
                        .mapping
                        .get(*tentacle)
                        .ok_or_else(|| UncoverError::graph("unknown-vertex", "tentacle outside L"))
                })
                .collect::<Result<Vec<_>, _>>()?;
            let copy = template.graph.add_edge(hyperedge.label(), &tentacles)?;
            template.mapping.insert(edge, copy);
            fresh_edges.push(copy);
        }

        let vertex_merger = (!discipline.is_injective())
            .then(|| SetPartitionEnumerator::new(fresh_vertices.iter().copied()));
        let (vertex_merged, edge_mergers) =
            edge_stage(&template, vertex_merger.as_ref(), &fresh_edges)?;
        Ok(Self {
            comatch: total.comatch.clone(),
            template,
            fresh_edges,
            vertex_merger,
            vertex_merged,
            edge_mergers,
        })
    }

    /// Moves to the next merge combination; `false` once exhausted.
    fn advance(&mut self) -> Result<bool, UncoverError> {
        if advance_odometer(&mut self.edge_mergers)? {
            return Ok(true);
        }
        let Some(vertex_merger) = self.vertex_merger.as_mut() else {
            return Ok(false);
        };
        vertex_merger.advance()?;
        if vertex_merger.ended()? {
            return Ok(false);
        }
        let (vertex_merged, edge_mergers) =
            edge_stage(&self.template, self.vertex_merger.as_ref(), &self.fresh_edges)?;
        self.vertex_merged = vertex_merged;
        self.edge_mergers = edge_mergers;
        Ok(true)
    }

    fn materialize(&self) -> Result<PocResult, UncoverError> {
        let mut glued = self.vertex_merged.clone();
        for merger in &self.edge_mergers {
            glued.glue_edges(merger.current()?)?;
        }
        Ok(glued.into_result(&self.comatch))
    }
}

/// Applies the chosen vertex merger and sets up one edge merger per bucket
/// of fresh edges that became parallel.
fn edge_stage(
    template: &Template,
    vertex_merger: Option<&SetPartitionEnumerator>,
    fresh_edges: &[ElementId],
) -> Result<(Template, Vec<SetPartitionEnumerator>), UncoverError> {
    let Some(vertex_merger) = vertex_merger else {
        return Ok((template.clone(), Vec::new()));
    };
    let mut merged = template.clone();
    merged.glue_vertices(vertex_merger.current()?)?;
    let mut buckets: BTreeMap<&Hyperedge, Vec<ElementId>> = BTreeMap::new();
    for edge in fresh_edges {
        if let Some(hyperedge) = merged.graph.edge(*edge) {
            buckets.entry(hyperedge).or_default().push(*edge);
        }
    }
    let edge_mergers = buckets
        .into_values()
        .filter(|bucket| bucket.len() > 1)
        .map(|bucket| SetPartitionEnumerator::new(bucket))
        .collect();
    Ok((merged, edge_mergers))
}
