//! Longest-valid-chain reconciliation against the ledger's peers.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    block::Block,
    constants::PEER_FETCH_TIMEOUT_MS,
    error::PeerError,
    ledger::Ledger,
    pow::DifficultyPolicy,
    validate::ValidatedChain,
};

/// What a node exposes to its peers: the full chain and its length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub chain: Vec<Block>,
    pub length: usize,
}

impl ChainSnapshot {
    pub fn new(chain: Vec<Block>) -> Self {
        let length = chain.len();
        Self { chain, length }
    }
}

/// Transport used to pull a peer's chain.
#[async_trait]
pub trait PeerClient: Send + Sync {
    async fn fetch_chain(&self, peer: &str) -> Result<ChainSnapshot, PeerError>;
}

#[async_trait]
impl<T: PeerClient + ?Sized> PeerClient for Arc<T> {
    async fn fetch_chain(&self, peer: &str) -> Result<ChainSnapshot, PeerError> {
        (**self).fetch_chain(peer).await
    }
}

#[derive(Clone, Debug)]
pub struct Reconciler<C> {
    client: C,
    timeout: Duration,
}

impl<C: PeerClient> Reconciler<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            timeout: Duration::from_millis(PEER_FETCH_TIMEOUT_MS),
        }
    }

    /// Per-peer bound on a single fetch.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Adopts the longest valid peer chain that is strictly longer than the local one.
    ///
    /// Peers are queried concurrently, each under its own timeout. Any failure only
    /// drops that peer. Returns `true` if the local chain was replaced.
    pub async fn reconcile<P: DifficultyPolicy>(&self, ledger: &Ledger<P>) -> bool {
        let peers = ledger.peers();
        if peers.is_empty() {
            debug!("no peers to reconcile with");
            return false;
        }
        let local_len = ledger.len();
        let results = join_all(peers.iter().map(|peer| self.fetch(peer))).await;

        let mut best: Option<ValidatedChain> = None;
        for (peer, result) in peers.iter().zip(results) {
            let snapshot = match result {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    warn!(%peer, error = %err, "skipping peer");
                    continue;
                }
            };
            let floor = best.as_ref().map_or(local_len, ValidatedChain::len);
            if snapshot.chain.len() <= floor {
                debug!(%peer, length = snapshot.length, floor, "peer chain not longer");
                continue;
            }
            match ValidatedChain::new(snapshot.chain, ledger.pow()) {
                Ok(chain) => best = Some(chain),
                Err(err) => warn!(%peer, error = %err, "rejecting peer chain"),
            }
        }

        match best {
            Some(chain) => {
                info!(local_len, candidate = chain.len(), "adopting longer peer chain");
                ledger.replace_chain(chain)
            }
            None => false,
        }
    }

    async fn fetch(&self, peer: &str) -> Result<ChainSnapshot, PeerError> {
        let snapshot = tokio::time::timeout(self.timeout, self.client.fetch_chain(peer))
            .await
            .map_err(|_| PeerError::Timeout {
                peer: peer.to_string(),
                millis: self.timeout.as_millis(),
            })??;
        if snapshot.length != snapshot.chain.len() {
            return Err(PeerError::Malformed {
                peer: peer.to_string(),
                reason: format!(
                    "reported length {} but sent {} blocks",
                    snapshot.length,
                    snapshot.chain.len()
                ),
            });
        }
        Ok(snapshot)
    }
}
