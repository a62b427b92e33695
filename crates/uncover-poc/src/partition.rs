use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};

use siphasher::sip::SipHasher13;
use uncover_core::errors::{ErrorInfo, UncoverError};
use uncover_core::ElementId;

/// Set partition of a finite id set into disjoint, non-empty blocks.
///
/// Equality is set-of-sets equality. The hash XORs one SipHash-1-3 digest per
/// block, so it does not depend on block order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    blocks: BTreeSet<BTreeSet<ElementId>>,
}

impl Partition {
    /// Partition with every id in its own block.
    pub fn finest(ids: impl IntoIterator<Item = ElementId>) -> Self {
        let blocks = ids
            .into_iter()
            .map(|id| BTreeSet::from([id]))
            .collect();
        Self { blocks }
    }

    /// Partition with all ids in one block (no block for an empty set).
    pub fn single_block(ids: impl IntoIterator<Item = ElementId>) -> Self {
        let block: BTreeSet<ElementId> = ids.into_iter().collect();
        let mut blocks = BTreeSet::new();
        if !block.is_empty() {
            blocks.insert(block);
        }
        Self { blocks }
    }

    /// Builds a partition from explicit blocks.
    ///
    /// Fails when a block is empty or two blocks overlap.
    pub fn from_blocks<B, I>(blocks: I) -> Result<Self, UncoverError>
    where
        I: IntoIterator<Item = B>,
        B: IntoIterator<Item = ElementId>,
    {
        let mut seen = BTreeSet::new();
        let mut collected = BTreeSet::new();
        for block in blocks {
            let block: BTreeSet<ElementId> = block.into_iter().collect();
            if block.is_empty() {
                return Err(UncoverError::graph(
                    "empty-block",
                    "partition blocks must be non-empty",
                ));
            }
            for id in &block {
                if !seen.insert(*id) {
                    return Err(UncoverError::Graph(
                        ErrorInfo::new("overlapping-blocks", "id occurs in two blocks")
                            .with_context("id", id),
                    ));
                }
            }
            collected.insert(block);
        }
        Ok(Self { blocks: collected })
    }

    /// Finest partition of `base` in which the members of each group share a block.
    ///
    /// Group members missing from `base` are added to the base set.
    pub fn connecting<G, I>(base: impl IntoIterator<Item = ElementId>, groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: IntoIterator<Item = ElementId>,
    {
        let mut forest = UnionFind::default();
        for id in base {
            forest.insert(id);
        }
        for group in groups {
            let mut members = group.into_iter();
            let Some(first) = members.next() else {
                continue;
            };
            forest.insert(first);
            for member in members {
                forest.union(first, member);
            }
        }
        forest.into_partition()
    }

    /// Finest partition relating every pair related by `self` or by `other`.
    ///
    /// The base set of the result is the union of both base sets.
    pub fn transitive_closure(&self, other: &Partition) -> Partition {
        Self::connecting(
            std::iter::empty(),
            self.blocks.iter().chain(other.blocks.iter()).map(|block| block.iter().copied()),
        )
    }

    /// Returns the partition obtained by merging the blocks at positions `first` and `second`.
    pub fn merge_blocks(&self, first: usize, second: usize) -> Option<Partition> {
        if first == second {
            return None;
        }
        let a = self.blocks.iter().nth(first)?;
        let b = self.blocks.iter().nth(second)?;
        let mut blocks = self.blocks.clone();
        blocks.remove(a);
        blocks.remove(b);
        blocks.insert(a.union(b).copied().collect());
        Some(Self { blocks })
    }

    /// Iterates over blocks in ascending order.
    pub fn blocks(&self) -> impl Iterator<Item = &BTreeSet<ElementId>> + '_ {
        self.blocks.iter()
    }

    /// Blocks with at least two ids, the ones that call for a merge.
    pub fn nontrivial_blocks(&self) -> impl Iterator<Item = Vec<ElementId>> + '_ {
        self.blocks
            .iter()
            .filter(|block| block.len() > 1)
            .map(|block| block.iter().copied().collect())
    }

    /// Returns the number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Returns the size of the base set.
    pub fn len(&self) -> usize {
        self.blocks.iter().map(BTreeSet::len).sum()
    }

    /// Returns whether the base set is empty.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Returns the block containing `id`.
    pub fn block_of(&self, id: ElementId) -> Option<&BTreeSet<ElementId>> {
        self.blocks.iter().find(|block| block.contains(&id))
    }

    /// Returns whether at most one block exists.
    pub fn is_single_block(&self) -> bool {
        self.blocks.len() <= 1
    }
}

impl Hash for Partition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut digest = 0u64;
        for block in &self.blocks {
            let mut hasher = SipHasher13::new_with_keys(0, 0);
            for id in block {
                hasher.write_u64(id.as_raw());
            }
            digest ^= hasher.finish();
        }
        state.write_u64(digest);
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (index, block) in self.blocks.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{{")?;
            for (position, id) in block.iter().enumerate() {
                if position > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{id}")?;
            }
            write!(f, "}}")?;
        }
        write!(f, "}}")
    }
}

#[derive(Default)]
struct UnionFind {
    index: BTreeMap<ElementId, usize>,
    ids: Vec<ElementId>,
    parent: Vec<usize>,
}

impl UnionFind {
    fn insert(&mut self, id: ElementId) -> usize {
        if let Some(position) = self.index.get(&id) {
            return *position;
        }
        let position = self.ids.len();
        self.index.insert(id, position);
        self.ids.push(id);
        self.parent.push(position);
        position
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: ElementId, b: ElementId) {
        let a = self.insert(a);
        let b = self.insert(b);
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[rb] = ra;
        }
    }

    fn into_partition(mut self) -> Partition {
        let mut classes: BTreeMap<usize, BTreeSet<ElementId>> = BTreeMap::new();
        for position in 0..self.ids.len() {
            let root = self.find(position);
            classes.entry(root).or_default().insert(self.ids[position]);
        }
        Partition {
            blocks: classes.into_values().collect(),
        }
    }
}
