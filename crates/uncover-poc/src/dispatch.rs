use std::sync::Arc;

use uncover_core::errors::UncoverError;
use uncover_core::{MatchDiscipline, PocConfig};
use uncover_graph::{BacktrackingMatcher, Hypergraph, Matcher, Rule};

use crate::enumerator::{PocEnumerator, PocResult};
use crate::partial::PartialPocEnumerator;
use crate::total::TotalPocEnumerator;

const COMPONENT: &str = "backward";

/// Entry point for the backward search: picks the enumerator by rule shape.
///
/// Total rules go to [`TotalPocEnumerator`], partial ones to
/// [`PartialPocEnumerator`]. Original rules only matter for partial rules.
#[derive(Debug)]
pub struct BackwardEnumerator<M: Matcher + Clone = BacktrackingMatcher> {
    config: PocConfig,
    matcher: M,
    active: Active<M>,
}

#[derive(Debug)]
enum Active<M: Matcher> {
    Idle,
    Total(TotalPocEnumerator<M>),
    Partial(PartialPocEnumerator<M>),
    Invalidated,
}

impl BackwardEnumerator<BacktrackingMatcher> {
    /// Creates an idle enumerator with the default configuration.
    pub fn new() -> Self {
        Self::with_config(PocConfig::default())
    }

    /// Creates an idle enumerator with the given configuration.
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
            active: Active::Idle,
        }
    }
}

impl Default for BackwardEnumerator<BacktrackingMatcher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Matcher + Clone> BackwardEnumerator<M> {
    /// Replaces the matcher handed to the underlying enumerators.
    pub fn with_matcher<N: Matcher + Clone>(self, matcher: N) -> BackwardEnumerator<N> {
        BackwardEnumerator {
            config: self.config,
            matcher,
            active: Active::Idle,
        }
    }

    /// Returns the sanitised configuration.
    pub fn config(&self) -> &PocConfig {
        &self.config
    }

    /// Starts enumerating the pushout complements of `rule` into `graph`.
    pub fn reset(
        &mut self,
        rule: Arc<Rule>,
        graph: Arc<Hypergraph>,
        discipline: MatchDiscipline,
        original_rules: Option<Vec<Arc<Rule>>>,
    ) -> Result<(), UncoverError> {
        if matches!(self.active, Active::Invalidated) {
            return Err(UncoverError::moved_from(COMPONENT));
        }
        self.active = Active::Idle;
        if rule.is_total() {
            let mut enumerator = TotalPocEnumerator::with_config(self.config.clone())
                .with_matcher(self.matcher.clone());
            enumerator.reset(rule, graph, discipline)?;
            self.active = Active::Total(enumerator);
        } else {
            let mut enumerator = PartialPocEnumerator::with_config(self.config.clone())
                .with_matcher(self.matcher.clone());
            enumerator.reset(rule, graph, discipline, original_rules)?;
            self.active = Active::Partial(enumerator);
        }
        Ok(())
    }

    /// Returns whether the last reset dispatched to the partial enumerator.
    pub fn is_partial(&self) -> bool {
        matches!(self.active, Active::Partial(_))
    }

    /// Moves the enumeration state out, leaving `self` unusable.
    pub fn take(&mut self) -> Self {
        Self {
            config: self.config.clone(),
            matcher: self.matcher.clone(),
            active: std::mem::replace(&mut self.active, Active::Invalidated),
        }
    }
}

impl<M: Matcher + Clone> PocEnumerator for BackwardEnumerator<M> {
    fn ended(&self) -> Result<bool, UncoverError> {
        match &self.active {
            Active::Idle => Ok(true),
            Active::Total(enumerator) => enumerator.ended(),
            Active::Partial(enumerator) => enumerator.ended(),
            Active::Invalidated => Err(UncoverError::moved_from(COMPONENT)),
        }
    }

    fn advance(&mut self) -> Result<(), UncoverError> {
        match &mut self.active {
            Active::Idle => Ok(()),
            Active::Total(enumerator) => enumerator.advance(),
            Active::Partial(enumerator) => enumerator.advance(),
            Active::Invalidated => Err(UncoverError::moved_from(COMPONENT)),
        }
    }

    fn current(&self) -> Result<&PocResult, UncoverError> {
        match &self.active {
            Active::Idle => Err(UncoverError::exhausted(COMPONENT)),
            Active::Total(enumerator) => enumerator.current(),
            Active::Partial(enumerator) => enumerator.current(),
            Active::Invalidated => Err(UncoverError::moved_from(COMPONENT)),
        }
    }
}
