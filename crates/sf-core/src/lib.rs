//! sf-core: shared errors, ids, hashes, and config types for the slot
//! engine core.
//!
//! This crate has no dependency on any other `sf-*` crate; every other
//! crate in the workspace depends on it.

mod cancel;
mod error;
mod hash;
mod ids;
mod mode;

pub use cancel::CancellationToken;
pub use error::{EngineError, EngineResult};
pub use hash::{HexHash, HexHashParseError};
pub use ids::{ConfigId, FreeSpinsSessionId, GameSessionId, PfSessionId, PlayerId, SpinId, StripId};
pub use mode::{BetSpec, EngineConfig, GameMode};
