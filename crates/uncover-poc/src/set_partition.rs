use std::collections::{BTreeSet, HashSet};

use uncover_core::errors::UncoverError;
use uncover_core::ElementId;

use crate::odometer::ChoiceEnumerator;
use crate::partition::Partition;

const COMPONENT: &str = "set-partition";

/// Lazily enumerates every set partition of a finite id set.
///
/// The sequence starts at the finest partition and moves towards the single
/// block by merging two blocks at a time. Each partition is produced once.
/// Partitions are discovered breadth first: before leaving position `i` all
/// pairwise block merges of partition `i` that were not seen yet are appended.
/// Discovered partitions are cached, so [`SetPartitionEnumerator::reset`]
/// replays the same sequence without recomputing it.
#[derive(Debug)]
pub struct SetPartitionEnumerator {
    state: Option<SetPartitionState>,
}

#[derive(Debug)]
struct SetPartitionState {
    base_size: usize,
    discovered: Vec<Partition>,
    seen: HashSet<Partition>,
    expanded: usize,
    position: usize,
    single_seen: bool,
}

impl SetPartitionEnumerator {
    /// Creates an enumerator over `ids`; duplicates collapse.
    pub fn new(ids: impl IntoIterator<Item = ElementId>) -> Self {
        let base: BTreeSet<ElementId> = ids.into_iter().collect();
        let finest = Partition::finest(base.iter().copied());
        let single_seen = finest.is_single_block();
        let mut seen = HashSet::new();
        seen.insert(finest.clone());
        Self {
            state: Some(SetPartitionState {
                base_size: base.len(),
                discovered: vec![finest],
                seen,
                expanded: 0,
                position: 0,
                single_seen,
            }),
        }
    }

    /// Returns whether every partition has been produced.
    pub fn ended(&self) -> Result<bool, UncoverError> {
        let state = self.state()?;
        Ok(state.position >= state.discovered.len())
    }

    /// Moves to the next partition.
    pub fn advance(&mut self) -> Result<(), UncoverError> {
        let state = self.state_mut()?;
        if state.position >= state.discovered.len() {
            return Ok(());
        }
        if state.expanded <= state.position {
            state.expand(state.position);
            state.expanded = state.position + 1;
        }
        state.position += 1;
        Ok(())
    }

    /// Returns the current partition, or the last one once ended.
    pub fn current(&self) -> Result<&Partition, UncoverError> {
        let state = self.state()?;
        let index = state.position.min(state.discovered.len() - 1);
        Ok(&state.discovered[index])
    }

    /// Restarts at the finest partition, replaying cached partitions.
    pub fn reset(&mut self) -> Result<(), UncoverError> {
        self.state_mut()?.position = 0;
        Ok(())
    }

    /// Returns the number of ids being partitioned.
    pub fn base_set_size(&self) -> Result<usize, UncoverError> {
        Ok(self.state()?.base_size)
    }

    /// Moves the enumeration state out, leaving `self` unusable.
    pub fn take(&mut self) -> Self {
        Self {
            state: self.state.take(),
        }
    }

    fn state(&self) -> Result<&SetPartitionState, UncoverError> {
        self.state
            .as_ref()
            .ok_or_else(|| UncoverError::moved_from(COMPONENT))
    }

    fn state_mut(&mut self) -> Result<&mut SetPartitionState, UncoverError> {
        self.state
            .as_mut()
            .ok_or_else(|| UncoverError::moved_from(COMPONENT))
    }
}

impl SetPartitionState {
    fn expand(&mut self, index: usize) {
        let blocks = self.discovered[index].block_count();
        if blocks < 2 || (blocks == 2 && self.single_seen) {
            return;
        }
        let mut found = Vec::new();
        for first in 0..blocks {
            for second in first + 1..blocks {
                let Some(merged) = self.discovered[index].merge_blocks(first, second) else {
                    continue;
                };
                if self.seen.contains(&merged) {
                    continue;
                }
                self.seen.insert(merged.clone());
                if merged.is_single_block() {
                    self.single_seen = true;
                }
                found.push(merged);
            }
        }
        self.discovered.extend(found);
    }
}

impl ChoiceEnumerator for SetPartitionEnumerator {
    fn ended(&self) -> Result<bool, UncoverError> {
        SetPartitionEnumerator::ended(self)
    }

    fn advance(&mut self) -> Result<(), UncoverError> {
        SetPartitionEnumerator::advance(self)
    }

    fn reset(&mut self) -> Result<(), UncoverError> {
        SetPartitionEnumerator::reset(self)
    }
}
