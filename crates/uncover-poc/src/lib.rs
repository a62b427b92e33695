#![deny(missing_docs)]

//! Pushout-complement enumeration for backward application of hypergraph
//! rewrite rules.
//!
//! Given a rule `L ⇀ R` and a target graph `G`, the enumerators in this crate
//! produce every context graph `D` with a match `L → D` such that applying the
//! rule forward to `D` yields `G`. Merge choices are driven by the partition
//! enumerators, which are exported for reuse.

mod closure;
mod dispatch;
mod enumerator;
mod odometer;
mod partial;
mod partition;
mod point_to_set;
mod set_partition;
mod template;
mod total;

pub use closure::PartitionClosureEnumerator;
pub use dispatch::BackwardEnumerator;
pub use enumerator::{collect_pocs, PocEnumerator, PocResult};
pub use odometer::{advance_odometer, all_live, ChoiceEnumerator};
pub use partial::{split_rule, PartialPocEnumerator};
pub use partition::Partition;
pub use point_to_set::PointToSetEnumerator;
pub use set_partition::SetPartitionEnumerator;
pub use total::TotalPocEnumerator;
