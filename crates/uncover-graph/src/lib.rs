#![deny(missing_docs)]

//! Labelled hypergraphs, partial mappings, rewrite rules and subgraph matching.
//!
//! These are the primitives the pushout-complement enumerators in
//! `uncover-poc` build on. Everything is deterministic: ids are allocated per
//! graph and all collections iterate in ascending id order.

mod generators;
mod hash;
mod hypergraph;
mod mapping;
mod matching;
mod rule;

pub use generators::{gen_path, gen_random_hypergraph};
pub use hash::{canonical_hash, mapping_hash};
pub use hypergraph::{Hyperedge, Hypergraph, Merged};
pub use mapping::Mapping;
pub use matching::{BacktrackingMatcher, Matcher};
pub use rule::Rule;
