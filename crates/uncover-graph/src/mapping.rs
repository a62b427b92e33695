use std::collections::{BTreeMap, BTreeSet};

use uncover_core::ElementId;

/// Partial, possibly non-injective function between element ids of two graphs.
///
/// Vertices and edges are handled uniformly. The inverse relation is kept in
/// sync so preimage lookups are cheap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    forward: BTreeMap<ElementId, ElementId>,
    inverse: BTreeMap<ElementId, BTreeSet<ElementId>>,
}

impl Mapping {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the identity mapping on the given ids.
    pub fn identity(ids: impl IntoIterator<Item = ElementId>) -> Self {
        ids.into_iter().map(|id| (id, id)).collect()
    }

    /// Maps `source` to `target`, returning the previous image of `source`.
    pub fn insert(&mut self, source: ElementId, target: ElementId) -> Option<ElementId> {
        let previous = self.forward.insert(source, target);
        if let Some(old) = previous {
            self.unlink(source, old);
        }
        self.inverse.entry(target).or_default().insert(source);
        previous
    }

    /// Returns the image of `source`.
    pub fn get(&self, source: ElementId) -> Option<ElementId> {
        self.forward.get(&source).copied()
    }

    /// Returns whether `source` is in the domain.
    pub fn contains(&self, source: ElementId) -> bool {
        self.forward.contains_key(&source)
    }

    /// Returns the preimages of `target`, in ascending order.
    pub fn preimages(&self, target: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        self.inverse
            .get(&target)
            .into_iter()
            .flat_map(|sources| sources.iter().copied())
    }

    /// Returns the number of preimages of `target`.
    pub fn preimage_count(&self, target: ElementId) -> usize {
        self.inverse.get(&target).map_or(0, BTreeSet::len)
    }

    /// Returns whether `target` has at least one preimage.
    pub fn has_preimage(&self, target: ElementId) -> bool {
        self.inverse.contains_key(&target)
    }

    /// Removes `source` from the domain and returns its former image.
    pub fn remove_source(&mut self, source: ElementId) -> Option<ElementId> {
        let target = self.forward.remove(&source)?;
        self.unlink(source, target);
        Some(target)
    }

    /// Removes every entry mapping to `target` and returns the removed sources.
    pub fn remove_target(&mut self, target: ElementId) -> BTreeSet<ElementId> {
        let sources = self.inverse.remove(&target).unwrap_or_default();
        for source in &sources {
            self.forward.remove(source);
        }
        sources
    }

    /// Composes `self` with `next`: the result maps `x` to `next(self(x))`.
    ///
    /// Sources whose image is outside the domain of `next` are dropped.
    pub fn concat(&self, next: &Mapping) -> Mapping {
        self.forward
            .iter()
            .filter_map(|(source, middle)| next.get(*middle).map(|target| (*source, target)))
            .collect()
    }

    /// Rewrites targets after elements of the codomain were merged.
    pub fn redirect_targets(&mut self, redirects: &BTreeMap<ElementId, ElementId>) {
        for (removed, replacement) in redirects {
            for source in self.remove_target(*removed) {
                self.insert(source, *replacement);
            }
        }
    }

    /// Drops sources that were folded into another element of the domain.
    ///
    /// The survivor keeps its own entry; removed sources are expected to have
    /// mapped to the same target.
    pub fn redirect_sources(&mut self, redirects: &BTreeMap<ElementId, ElementId>) {
        for (removed, replacement) in redirects {
            if let Some(target) = self.remove_source(*removed) {
                if !self.contains(*replacement) {
                    self.insert(*replacement, target);
                }
            }
        }
    }

    /// Iterates over `(source, target)` pairs in ascending source order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, ElementId)> + '_ {
        self.forward.iter().map(|(source, target)| (*source, *target))
    }

    /// Iterates over the domain in ascending order.
    pub fn domain(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.forward.keys().copied()
    }

    /// Iterates over the image in ascending order.
    pub fn image(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.inverse.keys().copied()
    }

    /// Iterates over targets hit by at least two sources, with their preimages.
    pub fn collisions(&self) -> impl Iterator<Item = (ElementId, &BTreeSet<ElementId>)> + '_ {
        self.inverse
            .iter()
            .filter(|(_, sources)| sources.len() > 1)
            .map(|(target, sources)| (*target, sources))
    }

    /// Returns the number of mapped sources.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Returns whether no source is mapped.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Returns whether no two sources share an image.
    pub fn is_injective(&self) -> bool {
        self.forward.len() == self.inverse.len()
    }

    fn unlink(&mut self, source: ElementId, target: ElementId) {
        if let Some(sources) = self.inverse.get_mut(&target) {
            sources.remove(&source);
            if sources.is_empty() {
                self.inverse.remove(&target);
            }
        }
    }
}

impl FromIterator<(ElementId, ElementId)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (ElementId, ElementId)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (source, target) in iter {
            mapping.insert(source, target);
        }
        mapping
    }
}
