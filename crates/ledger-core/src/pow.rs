use tracing::debug;

use crate::{
    constants::POW_TARGET_DIFFICULTY,
    error::{LedgerError, Result},
    hash::sha256_hex,
};

/// Decides whether a puzzle digest is good enough.
pub trait DifficultyPolicy: Send + Sync {
    fn accepts(&self, digest_hex: &str) -> bool;
}

/// Requires the hex digest to start with `zeros` `'0'` characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HexPrefix {
    zeros: usize,
}

impl HexPrefix {
    pub fn new(zeros: usize) -> Self {
        Self { zeros }
    }

    pub fn zeros(&self) -> usize {
        self.zeros
    }
}

impl Default for HexPrefix {
    fn default() -> Self {
        Self::new(POW_TARGET_DIFFICULTY)
    }
}

impl DifficultyPolicy for HexPrefix {
    fn accepts(&self, digest_hex: &str) -> bool {
        digest_hex.len() >= self.zeros && digest_hex.bytes().take(self.zeros).all(|b| b == b'0')
    }
}

/// The digest the puzzle is judged on: SHA-256 of the decimal `proof² - previous²`.
/// Squares of any `u64` fit in a `u128`, so the difference is taken by magnitude and sign.
pub fn puzzle_digest(previous_proof: u64, proof: u64) -> String {
    let current = u128::from(proof) * u128::from(proof);
    let previous = u128::from(previous_proof) * u128::from(previous_proof);
    let delta = if current >= previous {
        (current - previous).to_string()
    } else {
        format!("-{}", previous - current)
    };
    sha256_hex(delta.as_bytes())
}

#[derive(Clone, Debug)]
pub struct ProofOfWork<P = HexPrefix> {
    policy: P,
    max_attempts: u64,
}

impl Default for ProofOfWork<HexPrefix> {
    fn default() -> Self {
        Self::new(HexPrefix::default())
    }
}

impl<P: DifficultyPolicy> ProofOfWork<P> {
    pub fn new(policy: P) -> Self {
        Self {
            policy,
            max_attempts: u64::MAX,
        }
    }

    /// Caps the number of candidates `solve` will try.
    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Smallest proof >= 1 satisfying the policy against `previous_proof`.
    /// Sequential and deterministic for a given input.
    pub fn solve(&self, previous_proof: u64) -> Result<u64> {
        let mut attempts = 0u64;
        let mut proof = 1u64;
        while attempts < self.max_attempts {
            attempts += 1;
            if self.verify(previous_proof, proof) {
                debug!(previous_proof, proof, attempts, "proof-of-work solved");
                return Ok(proof);
            }
            proof = match proof.checked_add(1) {
                Some(next) => next,
                None => break,
            };
        }
        Err(LedgerError::SearchExhausted(attempts))
    }

    pub fn verify(&self, previous_proof: u64, proof: u64) -> bool {
        self.policy.accepts(&puzzle_digest(previous_proof, proof))
    }
}
