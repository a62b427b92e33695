use std::collections::BTreeSet;
use std::sync::Arc;

use uncover_core::errors::{ErrorInfo, UncoverError};
use uncover_core::{ElementId, MatchDiscipline, PocConfig};
use uncover_graph::{BacktrackingMatcher, Hypergraph, Mapping, Matcher, Rule};

use crate::closure::PartitionClosureEnumerator;
use crate::enumerator::{PocEnumerator, PocResult};
use crate::odometer::{advance_odometer, all_live};
use crate::point_to_set::PointToSetEnumerator;
use crate::template::{composite_image, Template};

const COMPONENT: &str = "total-poc";

/// Enumerates the pushout complements of a total rule `L → R` into a target `G`.
///
/// After [`TotalPocEnumerator::reset`] the enumerator holds every
/// backward-applicable co-match `R → G` and consumes them from the back of
/// the list. Per co-match it produces one result for every combination of
/// merge choices:
///
/// * an injective rule has exactly one pushout complement: `G` without the
///   image of the created part;
/// * a non-injective rule under the injective discipline glues each
///   attachment point (a target vertex kept because unmatched edges still use
///   it) onto one of the copied `L`-vertices over it;
/// * a non-injective rule under the conflict-free discipline first chooses
///   edge mergers per edge fibre, then vertex mergers per vertex fibre, each
///   restricted to partitions that glue the fibre into a single element.
///
/// The vertex merger is the fastest moving choice, the co-match the slowest.
#[derive(Debug)]
pub struct TotalPocEnumerator<M: Matcher = BacktrackingMatcher> {
    config: PocConfig,
    matcher: M,
    lifecycle: Lifecycle,
}

#[derive(Debug)]
enum Lifecycle {
    Uninitialized,
    Active(Box<TotalState>),
    Invalidated,
}

#[derive(Debug)]
struct TotalState {
    rule: Arc<Rule>,
    graph: Arc<Hypergraph>,
    candidates: Vec<Mapping>,
    shape: Shape,
    choices: Option<Choices>,
    current: Option<PocResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    InjectiveRule,
    Attach,
    Merge,
}

impl Shape {
    fn of(rule: &Rule, discipline: MatchDiscipline) -> Self {
        if rule.is_injective() {
            Shape::InjectiveRule
        } else if discipline.is_injective() {
            Shape::Attach
        } else {
            Shape::Merge
        }
    }

    fn name(self) -> &'static str {
        match self {
            Shape::InjectiveRule => "injective-rule",
            Shape::Attach => "attach",
            Shape::Merge => "merge",
        }
    }
}

#[derive(Debug)]
enum Choices {
    Unique(Template),
    Attach {
        template: Template,
        assignments: Vec<PointToSetEnumerator>,
    },
    Merge {
        template: Template,
        edge_layer: Vec<PartitionClosureEnumerator>,
        edge_merged: Template,
        vertex_layer: Vec<PartitionClosureEnumerator>,
    },
}

impl TotalPocEnumerator<BacktrackingMatcher> {
    /// Creates an enumerator with the default configuration.
    pub fn new() -> Self {
        Self::with_config(PocConfig::default())
    }

    /// Creates an enumerator with the given configuration.
    pub fn with_config(config: PocConfig) -> Self {
        let config = config.sanitised();
        let matcher = if config.stop_fast {
            BacktrackingMatcher::stop_fast()
        } else {
            BacktrackingMatcher::new()
        };
        Self {
            config,
            matcher,
            lifecycle: Lifecycle::Uninitialized,
        }
    }
}

impl Default for TotalPocEnumerator<BacktrackingMatcher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Matcher> TotalPocEnumerator<M> {
    /// Replaces the matcher used to find co-matches.
    pub fn with_matcher<N: Matcher>(self, matcher: N) -> TotalPocEnumerator<N> {
        TotalPocEnumerator {
            config: self.config,
            matcher,
            lifecycle: self.lifecycle,
        }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &PocConfig {
        &self.config
    }

    /// Starts enumerating the pushout complements of `rule` into `graph`.
    ///
    /// Previous state is dropped first. Fails with `Rule` for a partial rule
    /// and with `CapacityExceeded` for an oversized right side.
    pub fn reset(
        &mut self,
        rule: Arc<Rule>,
        graph: Arc<Hypergraph>,
        discipline: MatchDiscipline,
    ) -> Result<(), UncoverError> {
        if matches!(self.lifecycle, Lifecycle::Invalidated) {
            return Err(UncoverError::moved_from(COMPONENT));
        }
        self.lifecycle = Lifecycle::Uninitialized;
        if !rule.is_total() {
            let elements = rule.left().vertex_count() + rule.left().edge_count();
            return Err(UncoverError::Rule(
                ErrorInfo::new("partial-rule", "rule morphism is not total")
                    .with_context("unmapped", elements - rule.mapping().len())
                    .with_hint("use PartialPocEnumerator for partial rules"),
            ));
        }
        check_capacity(&rule, &self.config)?;

        let found = self
            .matcher
            .find_matches(rule.right(), &graph, discipline.is_injective())?;
        let matches = found.len();
        let candidates: Vec<Mapping> = found
            .into_iter()
            .filter(|comatch| {
                let applicable = rule.is_backward_applicable(&graph, comatch);
                if !applicable {
                    tracing::trace!(size = comatch.len(), "discarding inapplicable co-match");
                }
                applicable
            })
            .collect();
        let shape = Shape::of(&rule, discipline);
        tracing::debug!(
            matches,
            applicable = candidates.len(),
            shape = shape.name(),
            "total poc enumerator reset"
        );

        let mut state = TotalState {
            rule,
            graph,
            candidates,
            shape,
            choices: None,
            current: None,
        };
        state.settle()?;
        self.lifecycle = Lifecycle::Active(Box::new(state));
        Ok(())
    }

    /// Returns whether the candidate list is empty.
    pub fn ended(&self) -> Result<bool, UncoverError> {
        match &self.lifecycle {
            Lifecycle::Uninitialized => Ok(true),
            Lifecycle::Active(state) => Ok(state.candidates.is_empty()),
            Lifecycle::Invalidated => Err(UncoverError::moved_from(COMPONENT)),
        }
    }

    /// Moves to the next pushout complement.
    pub fn advance(&mut self) -> Result<(), UncoverError> {
        match &mut self.lifecycle {
            Lifecycle::Uninitialized => Ok(()),
            Lifecycle::Active(state) => state.advance(),
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

    /// Returns the number of co-matches not yet consumed, the current one included.
    pub fn remaining_comatches(&self) -> Result<usize, UncoverError> {
        match &self.lifecycle {
            Lifecycle::Uninitialized => Ok(0),
            Lifecycle::Active(state) => Ok(state.candidates.len()),
            Lifecycle::Invalidated => Err(UncoverError::moved_from(COMPONENT)),
        }
    }
}

impl<M: Matcher + Clone> TotalPocEnumerator<M> {
    /// Moves the enumeration state out, leaving `self` unusable.
    pub fn take(&mut self) -> Self {
        Self {
            config: self.config.clone(),
            matcher: self.matcher.clone(),
            lifecycle: std::mem::replace(&mut self.lifecycle, Lifecycle::Invalidated),
        }
    }
}

impl<M: Matcher> PocEnumerator for TotalPocEnumerator<M> {
    fn ended(&self) -> Result<bool, UncoverError> {
        TotalPocEnumerator::ended(self)
    }

    fn advance(&mut self) -> Result<(), UncoverError> {
        TotalPocEnumerator::advance(self)
    }

    fn current(&self) -> Result<&PocResult, UncoverError> {
        TotalPocEnumerator::current(self)
    }
}

fn check_capacity(rule: &Rule, config: &PocConfig) -> Result<(), UncoverError> {
    let right = rule.right();
    let checks = [
        ("vertices", right.vertex_count(), config.max_right_vertices),
        ("edges", right.edge_count(), config.max_right_edges),
    ];
    for (kind, count, limit) in checks {
        if count > limit {
            return Err(UncoverError::CapacityExceeded(
                ErrorInfo::new("right-side-too-large", "rule right side exceeds the supported size")
                    .with_context("kind", kind)
                    .with_context("count", count)
                    .with_context("limit", limit),
            ));
        }
    }
    Ok(())
}

impl TotalState {
    /// Builds choices for the last candidate, dropping candidates without any.
    fn settle(&mut self) -> Result<(), UncoverError> {
        loop {
            let Some(comatch) = self.candidates.last() else {
                self.choices = None;
                self.current = None;
                return Ok(());
            };
            match Choices::build(self.shape, &self.rule, &self.graph, comatch)? {
                Some(choices) => {
                    self.current = Some(choices.materialize(comatch)?);
                    self.choices = Some(choices);
                    return Ok(());
                }
                None => {
                    tracing::trace!("co-match admits no merge choice");
                    self.candidates.pop();
                }
            }
        }
    }

    fn advance(&mut self) -> Result<(), UncoverError> {
        let Some(choices) = self.choices.as_mut() else {
            return Ok(());
        };
        if choices.advance(&self.rule)? {
            if let Some(comatch) = self.candidates.last() {
                self.current = Some(choices.materialize(comatch)?);
                return Ok(());
            }
        }
        self.candidates.pop();
        self.settle()
    }
}

impl Choices {
    fn build(
        shape: Shape,
        rule: &Rule,
        graph: &Hypergraph,
        comatch: &Mapping,
    ) -> Result<Option<Self>, UncoverError> {
        match shape {
            Shape::InjectiveRule => Ok(Some(Choices::Unique(deletion_template(rule, graph, comatch)?))),
            Shape::Attach => attach_choices(rule, graph, comatch),
            Shape::Merge => merge_choices(rule, graph, comatch),
        }
    }

    /// Moves to the next merge combination; `false` once exhausted.
    fn advance(&mut self, rule: &Rule) -> Result<bool, UncoverError> {
        match self {
            Choices::Unique(_) => Ok(false),
            Choices::Attach { assignments, .. } => advance_odometer(assignments),
            Choices::Merge {
                template,
                edge_layer,
                edge_merged,
                vertex_layer,
            } => {
                if advance_odometer(vertex_layer)? {
                    return Ok(true);
                }
                while advance_odometer(edge_layer)? {
                    let (merged, layer) = vertex_stage(rule, template, edge_layer)?;
                    *edge_merged = merged;
                    *vertex_layer = layer;
                    if all_live(vertex_layer)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    fn materialize(&self, comatch: &Mapping) -> Result<PocResult, UncoverError> {
        match self {
            Choices::Unique(template) => Ok(template.clone().into_result(comatch)),
            Choices::Attach {
                template,
                assignments,
            } => {
                let mut glued = template.clone();
                for assignment in assignments {
                    let (point, vertex) = assignment.current()?;
                    glued.merge_vertices(&[point, vertex])?;
                }
                Ok(glued.into_result(comatch))
            }
            Choices::Merge {
                edge_merged,
                vertex_layer,
                ..
            } => {
                let mut glued = edge_merged.clone();
                for merger in vertex_layer {
                    glued.glue_vertices(merger.current()?)?;
                }
                Ok(glued.into_result(comatch))
            }
        }
    }
}

/// `G` without the image of the elements the rule creates.
fn deletion_template(
    rule: &Rule,
    graph: &Hypergraph,
    comatch: &Mapping,
) -> Result<Template, UncoverError> {
    let mut context = graph.clone();
    let created: BTreeSet<ElementId> = comatch
        .iter()
        .filter(|(source, _)| rule.creates(*source))
        .map(|(_, image)| image)
        .collect();
    let edges: Vec<ElementId> = created.iter().copied().filter(|id| context.is_edge(*id)).collect();
    for edge in edges {
        context.delete_edge(edge)?;
    }
    let vertices: Vec<ElementId> = created
        .iter()
        .copied()
        .filter(|id| context.is_vertex(*id))
        .collect();
    let mut dangling = Vec::new();
    for vertex in vertices {
        context.delete_vertex(vertex, &mut dangling)?;
    }
    let projection = Mapping::identity(context.elements());
    Ok(Template {
        graph: context,
        mapping: rule.mapping().concat(comatch),
        projection,
    })
}

/// `G` without the co-match image plus a fresh copy of `L` projecting onto it.
///
/// Image vertices still used by unmatched edges stay as attachment points,
/// which are returned alongside.
fn gluing_template(
    rule: &Rule,
    graph: &Hypergraph,
    comatch: &Mapping,
) -> Result<(Template, Vec<ElementId>), UncoverError> {
    let mut context = graph.clone();
    let image: Vec<ElementId> = comatch.image().collect();
    for edge in image.iter().copied().filter(|id| graph.is_edge(*id)) {
        context.delete_edge(edge)?;
    }
    let mut attachment_points = Vec::new();
    let mut dangling = Vec::new();
    for vertex in image.iter().copied().filter(|id| graph.is_vertex(*id)) {
        let in_use = context
            .incident_edges(vertex)
            .is_some_and(|edges| !edges.is_empty());
        if in_use {
            attachment_points.push(vertex);
        } else {
            context.delete_vertex(vertex, &mut dangling)?;
        }
    }

    let mut projection = Mapping::identity(context.elements());
    let mut mapping = Mapping::new();
    let left = rule.left();
    for vertex in left.vertices() {
        let copy = context.add_vertex();
        mapping.insert(vertex, copy);
        projection.insert(copy, composite_image(rule, comatch, vertex)?);
    }
    for (edge, hyperedge) in left.edges() {
        let tentacles = hyperedge
            .tentacles()
            .iter()
            .map(|tentacle| {
                mapping
                    .get(*tentacle)
                    .ok_or_else(|| UncoverError::graph("unknown-vertex", "tentacle outside L"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let copy = context.add_edge(hyperedge.label(), &tentacles)?;
        mapping.insert(edge, copy);
        projection.insert(copy, composite_image(rule, comatch, edge)?);
    }
    Ok((
        Template {
            graph: context,
            mapping,
            projection,
        },
        attachment_points,
    ))
}

fn attach_choices(
    rule: &Rule,
    graph: &Hypergraph,
    comatch: &Mapping,
) -> Result<Option<Choices>, UncoverError> {
    let (mut template, attachment_points) = gluing_template(rule, graph, comatch)?;
    let fibres = template.vertex_fibres();
    let mut assignments = Vec::new();
    for point in attachment_points {
        let copies: Vec<ElementId> = fibres
            .get(&point)
            .into_iter()
            .flatten()
            .copied()
            .filter(|vertex| *vertex != point)
            .collect();
        match copies.as_slice() {
            [] => return Ok(None),
            [only] => template.merge_vertices(&[point, *only])?,
            _ => assignments.push(PointToSetEnumerator::new(point, copies)?),
        }
    }
    Ok(Some(Choices::Attach {
        template,
        assignments,
    }))
}

fn merge_choices(
    rule: &Rule,
    graph: &Hypergraph,
    comatch: &Mapping,
) -> Result<Option<Choices>, UncoverError> {
    let (template, _) = gluing_template(rule, graph, comatch)?;
    let mut edge_layer = Vec::new();
    for members in template.edge_fibres().into_values() {
        if members.len() < 2 {
            continue;
        }
        let reference = template.rule_reference(rule, &members);
        edge_layer.push(PartitionClosureEnumerator::new(members, reference)?);
    }
    if !all_live(&edge_layer)? {
        return Ok(None);
    }
    loop {
        let (edge_merged, vertex_layer) = vertex_stage(rule, &template, &edge_layer)?;
        if all_live(&vertex_layer)? {
            return Ok(Some(Choices::Merge {
                template,
                edge_layer,
                edge_merged,
                vertex_layer,
            }));
        }
        if !advance_odometer(&mut edge_layer)? {
            return Ok(None);
        }
    }
}

/// Applies the chosen edge mergers and sets up the vertex mergers on top.
fn vertex_stage(
    rule: &Rule,
    template: &Template,
    edge_layer: &[PartitionClosureEnumerator],
) -> Result<(Template, Vec<PartitionClosureEnumerator>), UncoverError> {
    let mut merged = template.clone();
    for merger in edge_layer {
        merged.glue_edges(merger.current()?)?;
    }
    let mut vertex_layer = Vec::new();
    for members in merged.vertex_fibres().into_values() {
        if members.len() < 2 {
            continue;
        }
        let reference = merged.rule_reference(rule, &members);
        vertex_layer.push(PartitionClosureEnumerator::new(members, reference)?);
    }
    Ok((merged, vertex_layer))
}
