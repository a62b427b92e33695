use uncover_core::errors::UncoverError;
use uncover_graph::{Hypergraph, Mapping};

/// One pushout complement of a rule application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PocResult {
    /// The context graph `D`.
    pub graph: Hypergraph,
    /// Total match `L → D`.
    pub mapping: Mapping,
    /// Co-match `R → G` being undone.
    pub comatch: Mapping,
    /// Projection `D ⇀ G` of every element of `D` that survives into `G`.
    pub projection: Mapping,
}

/// Common interface of the pushout-complement enumerators.
///
/// Driven as `while !e.ended()? { use(e.current()?); e.advance()?; }`.
pub trait PocEnumerator {
    /// Returns whether no further result is available.
    fn ended(&self) -> Result<bool, UncoverError>;

    /// Moves to the next result; no-op once ended.
    fn advance(&mut self) -> Result<(), UncoverError>;

    /// Returns the current result.
    fn current(&self) -> Result<&PocResult, UncoverError>;

    /// Returns the current context graph, if any.
    fn current_graph(&self) -> Option<&Hypergraph> {
        self.current().ok().map(|result| &result.graph)
    }

    /// Returns the current match `L → D`, if any.
    fn current_mapping(&self) -> Option<&Mapping> {
        self.current().ok().map(|result| &result.mapping)
    }

    /// Returns the co-match of the current result, if any.
    fn current_comatch(&self) -> Option<&Mapping> {
        self.current().ok().map(|result| &result.comatch)
    }

    /// Returns the projection `D ⇀ G` of the current result, if any.
    fn current_projection(&self) -> Option<&Mapping> {
        self.current().ok().map(|result| &result.projection)
    }
}

/// Drains an enumerator, returning its results in production order.
pub fn collect_pocs<E: PocEnumerator + ?Sized>(
    enumerator: &mut E,
) -> Result<Vec<PocResult>, UncoverError> {
    let mut results = Vec::new();
    while !enumerator.ended()? {
        results.push(enumerator.current()?.clone());
        enumerator.advance()?;
    }
    Ok(results)
}
