pub mod block;
pub mod consensus;
pub mod constants;
pub mod error;
pub mod hash;
pub mod ledger;
pub mod peers;
pub mod pow;
pub mod validate;

pub use block::{Block, Transaction};
pub use consensus::{ChainSnapshot, PeerClient, Reconciler};
pub use error::{LedgerError, PeerError, ValidationError};
pub use hash::hash_block;
pub use ledger::{Ledger, MinerReward};
pub use peers::{normalize_address, PeerSet};
pub use pow::{DifficultyPolicy, HexPrefix, ProofOfWork};
pub use validate::{is_valid, validate_chain, ValidatedChain};
