use serde::{Deserialize, Serialize};
use sf_core::HexHash;

/// One spin's hash-chain link, as persisted by the Store and returned to
/// the client — never carries the server seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinReceipt {
    pub nonce: u64,
    pub client_seed: Vec<u8>,
    pub spin_hash: HexHash,
    pub prev_spin_hash: Option<HexHash>,
}
