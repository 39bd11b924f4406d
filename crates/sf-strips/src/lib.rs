//! sf-strips: reel strips, strip sets/configurations, player assignments,
//! and the generator that turns a weights map into a shuffled strip.

mod config;
mod generate;
mod repository;
mod strip;

pub use config::{PlayerAssignment, StripConfig};
pub use generate::{generate_strip, materialise};
pub use repository::{MemoryStripStore, StripRepository};
pub use strip::{checksum_of, ReelStrip};
