//! Offline RTP-tuning loop: generates candidate reel-strip topologies,
//! simulates them in parallel with a fast non-replayable RNG, and adjusts
//! symbol density feedback until the aggregated statistics land inside
//! every target's tolerance band or `maxIter` is reached.

mod config;
mod simulate;
mod stats;
mod topology;
mod tuner;

pub use config::{Target, TuningConfig};
pub use simulate::simulate_spins;
pub use stats::{TuningStats, WorkerStats};
pub use topology::{generate_topology_strip, role_for_reel, DensityMap, ReelRole};
pub use tuner::{run_tuning_loop, NullPersistence, TuningOutcome, TuningPersistence};
