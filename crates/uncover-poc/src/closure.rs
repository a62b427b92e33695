use uncover_core::errors::UncoverError;
use uncover_core::ElementId;

use crate::odometer::ChoiceEnumerator;
use crate::partition::Partition;
use crate::set_partition::SetPartitionEnumerator;

const COMPONENT: &str = "partition-closure";

/// Enumerates the partitions of an id set that connect a reference partition.
///
/// A partition `P` is usable when the transitive closure of `P` and the
/// reference is a single block. Unusable partitions of the underlying
/// [`SetPartitionEnumerator`] are skipped.
#[derive(Debug)]
pub struct PartitionClosureEnumerator {
    state: Option<ClosureState>,
}

#[derive(Debug)]
struct ClosureState {
    inner: SetPartitionEnumerator,
    reference: Partition,
    last_usable: Option<Partition>,
}

impl PartitionClosureEnumerator {
    /// Creates an enumerator over partitions of `ids` connecting `reference`.
    pub fn new(
        ids: impl IntoIterator<Item = ElementId>,
        reference: Partition,
    ) -> Result<Self, UncoverError> {
        let mut state = ClosureState {
            inner: SetPartitionEnumerator::new(ids),
            reference,
            last_usable: None,
        };
        state.skip_unusable()?;
        if state.inner.ended()? {
            let base_set = state.inner.base_set_size()?;
            tracing::debug!(
                base_set,
                reference = %state.reference,
                "no partition connects the reference partition"
            );
        }
        Ok(Self { state: Some(state) })
    }

    /// Returns whether every usable partition has been produced.
    pub fn ended(&self) -> Result<bool, UncoverError> {
        self.state()?.inner.ended()
    }

    /// Moves to the next usable partition.
    pub fn advance(&mut self) -> Result<(), UncoverError> {
        let state = self.state_mut()?;
        if state.inner.ended()? {
            return Ok(());
        }
        state.inner.advance()?;
        state.skip_unusable()
    }

    /// Returns the current usable partition, or the last one once ended.
    pub fn current(&self) -> Result<&Partition, UncoverError> {
        let state = self.state()?;
        if !state.inner.ended()? {
            return state.inner.current();
        }
        state
            .last_usable
            .as_ref()
            .ok_or_else(|| UncoverError::exhausted(COMPONENT))
    }

    /// Restarts at the first usable partition.
    pub fn reset(&mut self) -> Result<(), UncoverError> {
        let state = self.state_mut()?;
        state.inner.reset()?;
        state.skip_unusable()
    }

    /// Moves the enumeration state out, leaving `self` unusable.
    pub fn take(&mut self) -> Self {
        Self {
            state: self.state.take(),
        }
    }

    fn state(&self) -> Result<&ClosureState, UncoverError> {
        self.state
            .as_ref()
            .ok_or_else(|| UncoverError::moved_from(COMPONENT))
    }

    fn state_mut(&mut self) -> Result<&mut ClosureState, UncoverError> {
        self.state
            .as_mut()
            .ok_or_else(|| UncoverError::moved_from(COMPONENT))
    }
}

impl ClosureState {
    fn skip_unusable(&mut self) -> Result<(), UncoverError> {
        while !self.inner.ended()? {
            let candidate = self.inner.current()?;
            if candidate.transitive_closure(&self.reference).is_single_block() {
                self.last_usable = Some(candidate.clone());
                return Ok(());
            }
            self.inner.advance()?;
        }
        Ok(())
    }
}

impl ChoiceEnumerator for PartitionClosureEnumerator {
    fn ended(&self) -> Result<bool, UncoverError> {
        PartitionClosureEnumerator::ended(self)
    }

    fn advance(&mut self) -> Result<(), UncoverError> {
        PartitionClosureEnumerator::advance(self)
    }

    fn reset(&mut self) -> Result<(), UncoverError> {
        PartitionClosureEnumerator::reset(self)
    }
}
