//! sf-pf: the provably-fair commit/reveal protocol — session lifecycle,
//! hash-chained spin receipts, and the offline verification endpoints.

mod commitment;
mod receipt;
mod session;
mod verify;

pub use commitment::{server_seed_hash, spin_hash, theta_commitment_hash, verify_commitment, verify_theta};
pub use receipt::SpinReceipt;
pub use session::{EndedPfSession, PfSession};
pub use verify::{
    verify_active_spin, verify_single_spin, verify_spin_with_reel_positions, VerifyActiveResult,
    VerifyActiveSpinInput, VerifyResult, VerifySpinInput, VerifyWithReelInput,
};
