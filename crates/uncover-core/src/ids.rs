//! Element identifiers and their allocator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier for a vertex or a hyperedge.
///
/// Vertices and edges share one id space so that mappings can treat both
/// uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementId(u64);

impl ElementId {
    /// Creates a new identifier from its raw integer representation.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub const fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out fresh [`ElementId`]s.
///
/// Every hypergraph owns one allocator. Cloning a graph clones the allocator,
/// so ids created in the copy never collide with ids it inherited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Creates an allocator whose first id is `0`.
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Returns a fresh identifier.
    pub fn fresh(&mut self) -> ElementId {
        let id = ElementId(self.next);
        self.next += 1;
        id
    }
}
