#![deny(missing_docs)]
#![doc = "Identifiers, errors and configuration shared by the uncover crates."]

pub mod config;
pub mod errors;
pub mod ids;
pub mod rng;

pub use config::{MatchDiscipline, PocConfig, MAX_RIGHT_SIDE_ELEMENTS};
pub use errors::{ErrorInfo, UncoverError};
pub use ids::{ElementId, IdAllocator};
pub use rng::{derive_substream_seed, RngHandle};
