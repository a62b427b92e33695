//! Match discipline and enumeration bounds.

use serde::{Deserialize, Serialize};

/// Largest right side (vertices or edges) the bit-mask based collaborators can address.
pub const MAX_RIGHT_SIDE_ELEMENTS: usize = 31;

/// Match discipline used when undoing a rule application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MatchDiscipline {
    /// Matches must be injective.
    Injective,
    /// Matches may identify elements the rule treats alike (both deleted or both preserved).
    #[default]
    ConflictFree,
}

impl MatchDiscipline {
    /// Returns whether matches are required to be injective.
    pub fn is_injective(self) -> bool {
        matches!(self, MatchDiscipline::Injective)
    }
}

/// Options controlling pushout-complement enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PocConfig {
    /// Maximum number of vertices accepted on a rule's right side.
    pub max_right_vertices: usize,
    /// Maximum number of edges accepted on a rule's right side.
    pub max_right_edges: usize,
    /// Whether the matcher stops after the first co-match.
    #[serde(default)]
    pub stop_fast: bool,
}

impl Default for PocConfig {
    fn default() -> Self {
        Self {
            max_right_vertices: MAX_RIGHT_SIDE_ELEMENTS,
            max_right_edges: MAX_RIGHT_SIDE_ELEMENTS,
            stop_fast: false,
        }
    }
}

impl PocConfig {
    /// Returns a copy whose bounds never exceed [`MAX_RIGHT_SIDE_ELEMENTS`].
    pub fn sanitised(&self) -> Self {
        Self {
            max_right_vertices: self.max_right_vertices.min(MAX_RIGHT_SIDE_ELEMENTS),
            max_right_edges: self.max_right_edges.min(MAX_RIGHT_SIDE_ELEMENTS),
            stop_fast: self.stop_fast,
        }
    }
}
