#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use ledger_core::{Block, ChainSnapshot, HexPrefix, Ledger, PeerClient, PeerError, ProofOfWork};

pub fn easy_pow() -> ProofOfWork {
    ProofOfWork::new(HexPrefix::new(1))
}

pub fn ledger_with_len(len: usize) -> Ledger {
    let ledger = Ledger::new(easy_pow());
    while ledger.len() < len {
        ledger.add_transaction("alice", "bob", ledger.len() as f64);
        ledger.mine().expect("mine");
    }
    ledger
}

/// Scripted answers keyed by `host:port`.
pub enum Reply {
    Chain(ChainSnapshot),
    Fail,
    Hang,
}

#[derive(Default)]
pub struct StubPeers {
    replies: HashMap<String, Reply>,
}

impl StubPeers {
    pub fn with(mut self, peer: &str, reply: Reply) -> Self {
        self.replies.insert(peer.to_string(), reply);
        self
    }

    pub fn with_chain(self, peer: &str, chain: Vec<Block>) -> Self {
        self.with(peer, Reply::Chain(ChainSnapshot::new(chain)))
    }
}

#[async_trait]
impl PeerClient for StubPeers {
    async fn fetch_chain(&self, peer: &str) -> Result<ChainSnapshot, PeerError> {
        match self.replies.get(peer) {
            Some(Reply::Chain(snapshot)) => Ok(snapshot.clone()),
            Some(Reply::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                unreachable!("the reconciler times out first")
            }
            Some(Reply::Fail) | None => Err(PeerError::Unreachable {
                peer: peer.to_string(),
                reason: "connection refused".into(),
            }),
        }
    }
}
