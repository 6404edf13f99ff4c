use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("proof-of-work search gave up after {0} attempts")]
    SearchExhausted(u64),

    #[error("cannot derive a peer identity from {0:?}")]
    InvalidPeerAddress(String),

    #[error("failed to encode block: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Reasons a candidate chain is rejected.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("chain is empty")]
    EmptyChain,

    #[error("block {index} does not link to the hash of its predecessor")]
    BrokenLink { index: u64 },

    #[error("block {index} carries proof {proof} which fails the difficulty check")]
    InvalidProof { index: u64, proof: u64 },

    #[error("block at position {position} has index {found}, expected {expected}")]
    NonSequentialIndex {
        position: usize,
        expected: u64,
        found: u64,
    },

    #[error("hashing block {index}: {source}")]
    Hashing {
        index: u64,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures talking to a single peer. All of them mean "skip this peer".
#[derive(Debug, Error)]
pub enum PeerError {
    #[error("peer {peer} unreachable: {reason}")]
    Unreachable { peer: String, reason: String },

    #[error("peer {peer} answered with status {status}")]
    Status { peer: String, status: u16 },

    #[error("peer {peer} sent a malformed chain: {reason}")]
    Malformed { peer: String, reason: String },

    #[error("peer {peer} timed out after {millis}ms")]
    Timeout { peer: String, millis: u128 },
}

pub type Result<T, E = LedgerError> = std::result::Result<T, E>;
