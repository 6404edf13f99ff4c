use std::{net::SocketAddr, time::Duration};

use clap::Parser;
use ledger_core::{HexPrefix, ProofOfWork};

use crate::constants::{DEFAULT_LISTEN, DEFAULT_PEER_TIMEOUT_MS, DEFAULT_REWARD_RECEIVER};

#[derive(Parser, Debug)]
#[command(name = "ledger-node")]
#[command(about = "Proof-of-work ledger node with longest-chain consensus")]
pub struct Args {
    /// Address to listen on, e.g. 127.0.0.1:5000
    #[arg(long, default_value = DEFAULT_LISTEN)]
    pub listen: String,

    /// Address peers use to reach this node; defaults to --listen
    #[arg(long)]
    pub public_addr: Option<String>,

    /// Number of leading '0' hex digits a proof digest must carry
    #[arg(long, default_value_t = ledger_core::constants::POW_TARGET_DIFFICULTY)]
    pub difficulty: usize,

    /// Per-peer fetch timeout during reconciliation, in milliseconds
    #[arg(long, default_value_t = DEFAULT_PEER_TIMEOUT_MS)]
    pub peer_timeout_ms: u64,

    /// Peer to register at startup (repeatable)
    #[arg(long = "peer")]
    pub peers: Vec<String>,

    /// Receiver of the reward transaction added to each mined block
    #[arg(long, default_value = DEFAULT_REWARD_RECEIVER)]
    pub reward_to: String,
}

#[derive(Clone, Debug)]
pub struct NodeConfig {
    pub listen: SocketAddr,
    pub public_addr: String,
    pub difficulty: usize,
    pub peer_timeout: Duration,
    pub peers: Vec<String>,
    pub reward_to: String,
}

impl NodeConfig {
    pub fn from_args(args: Args) -> anyhow::Result<Self> {
        let listen: SocketAddr = args.listen.parse()?;
        Ok(Self {
            listen,
            public_addr: args.public_addr.unwrap_or(args.listen),
            difficulty: args.difficulty,
            peer_timeout: Duration::from_millis(args.peer_timeout_ms),
            peers: args.peers,
            reward_to: args.reward_to,
        })
    }

    pub fn pow(&self) -> ProofOfWork {
        ProofOfWork::new(HexPrefix::new(self.difficulty))
    }
}
