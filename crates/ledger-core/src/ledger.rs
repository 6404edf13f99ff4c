use parking_lot::RwLock;
use tracing::{debug, info};

use crate::{
    block::{Block, Transaction},
    constants::MINER_REWARD_AMOUNT,
    error::Result,
    hash::hash_block,
    peers::PeerSet,
    pow::{DifficultyPolicy, HexPrefix, ProofOfWork},
    validate::{validate_chain, ValidatedChain},
};

/// Transaction appended to every block this node mines.
#[derive(Clone, Debug, PartialEq)]
pub struct MinerReward {
    pub node_id: String,
    pub receiver: String,
    pub amount: f64,
}

impl MinerReward {
    pub fn new(node_id: impl Into<String>, receiver: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            receiver: receiver.into(),
            amount: MINER_REWARD_AMOUNT,
        }
    }

    fn transaction(&self) -> Transaction {
        Transaction::new(self.node_id.clone(), self.receiver.clone(), self.amount)
    }
}

#[derive(Debug)]
struct ChainState {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
}

impl ChainState {
    fn tip(&self) -> &Block {
        self.chain
            .last()
            .expect("chain always holds at least the genesis block")
    }

    fn append(&mut self, proof: u64, previous_hash: String) -> Block {
        let index = self.chain.len() as u64 + 1;
        let transactions = std::mem::take(&mut self.pending);
        let block = Block::new(index, proof, previous_hash, transactions);
        self.chain.push(block.clone());
        block
    }
}

/// The chain, the pending-transaction buffer and the peer set of one node.
///
/// Chain and buffer share a single writer lock. Proof-of-work runs outside it, so
/// submissions are not blocked for the length of a search.
#[derive(Debug)]
pub struct Ledger<P = HexPrefix> {
    state: RwLock<ChainState>,
    peers: RwLock<PeerSet>,
    pow: ProofOfWork<P>,
    reward: Option<MinerReward>,
}

impl Default for Ledger<HexPrefix> {
    fn default() -> Self {
        Self::new(ProofOfWork::default())
    }
}

impl<P: DifficultyPolicy> Ledger<P> {
    /// A ledger holding only the genesis block.
    pub fn new(pow: ProofOfWork<P>) -> Self {
        Self {
            state: RwLock::new(ChainState {
                chain: vec![Block::genesis()],
                pending: Vec::new(),
            }),
            peers: RwLock::new(PeerSet::new()),
            pow,
            reward: None,
        }
    }

    pub fn with_peers(mut self, peers: PeerSet) -> Self {
        self.peers = RwLock::new(peers);
        self
    }

    pub fn with_reward(mut self, reward: MinerReward) -> Self {
        self.reward = Some(reward);
        self
    }

    pub fn pow(&self) -> &ProofOfWork<P> {
        &self.pow
    }

    /// Appends a block built from the whole pending buffer, which is left empty.
    pub fn create_block(&self, proof: u64, previous_hash: String) -> Block {
        self.state.write().append(proof, previous_hash)
    }

    pub fn previous_block(&self) -> Block {
        self.state.read().tip().clone()
    }

    /// Queues a transaction and returns the index of the block expected to carry it.
    pub fn add_transaction(
        &self,
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: f64,
    ) -> u64 {
        let mut state = self.state.write();
        state.pending.push(Transaction::new(sender, receiver, amount));
        state.tip().index + 1
    }

    /// Registers a peer by its `host[:port]`. Returns `false` if it was already known.
    pub fn add_peer(&self, address: &str) -> Result<bool> {
        let added = self.peers.write().insert(address)?;
        if added {
            info!(%address, "peer registered");
        }
        Ok(added)
    }

    /// Solves the puzzle against the current tip and commits the resulting block.
    ///
    /// If the tip moves while searching, the search starts over on the new tip.
    /// On error nothing has been committed.
    pub fn mine(&self) -> Result<Block> {
        loop {
            let previous = self.previous_block();
            let proof = self.pow.solve(previous.proof)?;
            let previous_hash = hash_block(&previous)?;

            let mut state = self.state.write();
            if state.tip() != &previous {
                debug!(stale_index = previous.index, "tip moved during search, retrying");
                continue;
            }
            if let Some(reward) = &self.reward {
                state.pending.push(reward.transaction());
            }
            let block = state.append(proof, previous_hash);
            info!(
                index = block.index,
                proof = block.proof,
                txs = block.transactions.len(),
                "mined block"
            );
            return Ok(block);
        }
    }

    /// Swaps in `candidate` if it is still strictly longer than the local chain.
    pub fn replace_chain(&self, candidate: ValidatedChain) -> bool {
        let mut state = self.state.write();
        let local = state.chain.len();
        if candidate.len() <= local {
            debug!(local, candidate = candidate.len(), "candidate no longer longer");
            return false;
        }
        state.chain = candidate.into_inner();
        info!(from = local, to = state.chain.len(), "chain replaced");
        true
    }

    pub fn is_chain_valid(&self) -> bool {
        validate_chain(&self.state.read().chain, &self.pow).is_ok()
    }

    pub fn chain(&self) -> Vec<Block> {
        self.state.read().chain.clone()
    }

    pub fn len(&self) -> usize {
        self.state.read().chain.len()
    }

    /// Always `false`: the genesis block is never removed.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn pending_transactions(&self) -> Vec<Transaction> {
        self.state.read().pending.clone()
    }

    pub fn peers(&self) -> Vec<String> {
        self.peers.read().iter().cloned().collect()
    }
}
