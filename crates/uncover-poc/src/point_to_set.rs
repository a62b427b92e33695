use std::collections::BTreeSet;

use uncover_core::errors::UncoverError;
use uncover_core::ElementId;

use crate::odometer::ChoiceEnumerator;

const COMPONENT: &str = "point-to-set";

/// Pairs one source id with each id of a target set in turn.
#[derive(Debug)]
pub struct PointToSetEnumerator {
    state: Option<PointToSetState>,
}

#[derive(Debug)]
struct PointToSetState {
    source: ElementId,
    targets: Vec<ElementId>,
    position: usize,
}

impl PointToSetEnumerator {
    /// Creates an enumerator visiting `targets` in ascending order.
    pub fn new(
        source: ElementId,
        targets: impl IntoIterator<Item = ElementId>,
    ) -> Result<Self, UncoverError> {
        let targets: BTreeSet<ElementId> = targets.into_iter().collect();
        if targets.is_empty() {
            return Err(UncoverError::invalid_state(
                "empty-targets",
                "point-to-set enumeration needs at least one target",
            )
            .with_context("source", source));
        }
        Ok(Self {
            state: Some(PointToSetState {
                source,
                targets: targets.into_iter().collect(),
                position: 0,
            }),
        })
    }

    /// Returns whether every target has been visited.
    pub fn ended(&self) -> Result<bool, UncoverError> {
        let state = self.state()?;
        Ok(state.position >= state.targets.len())
    }

    /// Moves to the next target.
    pub fn advance(&mut self) -> Result<(), UncoverError> {
        let state = self.state_mut()?;
        if state.position < state.targets.len() {
            state.position += 1;
        }
        Ok(())
    }

    /// Returns the current `(source, target)` pair.
    pub fn current(&self) -> Result<(ElementId, ElementId), UncoverError> {
        let state = self.state()?;
        Ok((state.source, self.current_target()?))
    }

    /// Returns the current target.
    pub fn current_target(&self) -> Result<ElementId, UncoverError> {
        let state = self.state()?;
        state
            .targets
            .get(state.position)
            .copied()
            .ok_or_else(|| UncoverError::exhausted(COMPONENT))
    }

    /// Returns the source id.
    pub fn source(&self) -> Result<ElementId, UncoverError> {
        Ok(self.state()?.source)
    }

    /// Restarts at the smallest target.
    pub fn reset(&mut self) -> Result<(), UncoverError> {
        self.state_mut()?.position = 0;
        Ok(())
    }

    /// Moves the enumeration state out, leaving `self` unusable.
    pub fn take(&mut self) -> Self {
        Self {
            state: self.state.take(),
        }
    }

    fn state(&self) -> Result<&PointToSetState, UncoverError> {
        self.state
            .as_ref()
            .ok_or_else(|| UncoverError::moved_from(COMPONENT))
    }

    fn state_mut(&mut self) -> Result<&mut PointToSetState, UncoverError> {
        self.state
            .as_mut()
            .ok_or_else(|| UncoverError::moved_from(COMPONENT))
    }
}

impl ChoiceEnumerator for PointToSetEnumerator {
    fn ended(&self) -> Result<bool, UncoverError> {
        PointToSetEnumerator::ended(self)
    }

    fn advance(&mut self) -> Result<(), UncoverError> {
        PointToSetEnumerator::advance(self)
    }

    fn reset(&mut self) -> Result<(), UncoverError> {
        PointToSetEnumerator::reset(self)
    }
}
