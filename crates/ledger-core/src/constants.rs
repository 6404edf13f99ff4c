pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;
pub const GENESIS_INDEX: u64 = 1;
pub const GENESIS_PROOF: u64 = 1;
pub const GENESIS_PREVIOUS_HASH: &str = "0";
pub const GENESIS_TIMESTAMP: u64 = 0;
pub const POW_TARGET_DIFFICULTY: usize = 4;
pub const PEER_FETCH_TIMEOUT_MS: u64 = 5_000;
pub const MINER_REWARD_AMOUNT: f64 = 1.0;
