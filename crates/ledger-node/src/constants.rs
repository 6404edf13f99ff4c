pub const DEFAULT_LISTEN: &str = "127.0.0.1:5000";
pub const CHAIN_PATH: &str = "/get_chain";
pub const DEFAULT_PEER_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_REWARD_RECEIVER: &str = "R2";
