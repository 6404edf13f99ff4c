use crate::{
    block::Block,
    error::ValidationError,
    hash::hash_block,
    pow::{DifficultyPolicy, ProofOfWork},
};

/// Walks `chain` pairwise from the second block on. The first block is trusted as-is.
pub fn validate_chain<P: DifficultyPolicy>(
    chain: &[Block],
    pow: &ProofOfWork<P>,
) -> Result<(), ValidationError> {
    let mut previous = chain.first().ok_or(ValidationError::EmptyChain)?;
    for (position, current) in chain.iter().enumerate().skip(1) {
        let expected_index = previous.index.wrapping_add(1);
        if current.index != expected_index {
            return Err(ValidationError::NonSequentialIndex {
                position,
                expected: expected_index,
                found: current.index,
            });
        }
        let linked = hash_block(previous).map_err(|source| ValidationError::Hashing {
            index: previous.index,
            source,
        })?;
        if current.previous_hash != linked {
            return Err(ValidationError::BrokenLink {
                index: current.index,
            });
        }
        if !pow.verify(previous.proof, current.proof) {
            return Err(ValidationError::InvalidProof {
                index: current.index,
                proof: current.proof,
            });
        }
        previous = current;
    }
    Ok(())
}

pub fn is_valid<P: DifficultyPolicy>(chain: &[Block], pow: &ProofOfWork<P>) -> bool {
    validate_chain(chain, pow).is_ok()
}

/// A chain that has passed [`validate_chain`]. The only thing a ledger will swap in.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedChain(Vec<Block>);

impl ValidatedChain {
    pub fn new<P: DifficultyPolicy>(
        chain: Vec<Block>,
        pow: &ProofOfWork<P>,
    ) -> Result<Self, ValidationError> {
        validate_chain(&chain, pow)?;
        Ok(Self(chain))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<Block> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Transaction;
    use crate::pow::HexPrefix;

    fn easy() -> ProofOfWork {
        ProofOfWork::new(HexPrefix::new(1))
    }

    fn build_chain(len: usize, pow: &ProofOfWork) -> Vec<Block> {
        let mut chain = vec![Block::genesis()];
        while chain.len() < len {
            let previous = chain.last().unwrap();
            let proof = pow.solve(previous.proof).unwrap();
            let block = Block::new(
                previous.index + 1,
                proof,
                hash_block(previous).unwrap(),
                vec![Transaction::new("a", "b", chain.len() as f64)],
            );
            chain.push(block);
        }
        chain
    }

    #[test]
    fn empty_chain_is_invalid() {
        assert!(matches!(
            validate_chain(&[], &easy()),
            Err(ValidationError::EmptyChain)
        ));
    }

    #[test]
    fn genesis_alone_is_valid() {
        assert!(is_valid(&[Block::genesis()], &easy()));
    }

    #[test]
    fn built_chain_is_valid() {
        let pow = easy();
        assert!(is_valid(&build_chain(6, &pow), &pow));
    }

    #[test]
    fn genesis_is_not_rechecked() {
        let pow = easy();
        let mut chain = build_chain(1, &pow);
        chain[0].proof = 999;
        chain[0].previous_hash = "junk".into();
        assert!(is_valid(&chain, &pow));
    }

    #[test]
    fn tampered_previous_hash_is_rejected() {
        let pow = easy();
        let mut chain = build_chain(4, &pow);
        chain[2].previous_hash = "f".repeat(64);
        assert!(matches!(
            validate_chain(&chain, &pow),
            Err(ValidationError::BrokenLink { index: 3 })
        ));
    }

    #[test]
    fn tampered_transactions_break_the_next_link() {
        let pow = easy();
        let mut chain = build_chain(4, &pow);
        chain[1].transactions[0].amount = 1_000.0;
        assert!(matches!(
            validate_chain(&chain, &pow),
            Err(ValidationError::BrokenLink { index: 3 })
        ));
    }

    #[test]
    fn tampered_proof_is_rejected() {
        let pow = easy();
        let mut chain = build_chain(2, &pow);
        chain[1].proof = 1;
        assert!(!pow.verify(1, chain[1].proof));
        assert!(matches!(
            validate_chain(&chain, &pow),
            Err(ValidationError::InvalidProof { index: 2, .. })
        ));
    }

    #[test]
    fn max_proof_is_rejected_without_panicking() {
        let genesis = Block::genesis();
        let forged = Block::new(2, u64::MAX, hash_block(&genesis).unwrap(), vec![]);
        assert!(matches!(
            validate_chain(&[genesis, forged], &easy()),
            Err(ValidationError::InvalidProof { index: 2, proof: u64::MAX })
        ));
    }

    #[test]
    fn skipped_index_is_rejected() {
        let pow = easy();
        let mut chain = build_chain(3, &pow);
        chain[2].index = 9;
        assert!(matches!(
            validate_chain(&chain, &pow),
            Err(ValidationError::NonSequentialIndex { position: 2, expected: 3, found: 9 })
        ));
    }

    #[test]
    fn stricter_difficulty_rejects_easy_chain() {
        let chain = build_chain(5, &easy());
        assert!(!is_valid(&chain, &ProofOfWork::new(HexPrefix::new(4))));
    }

    #[test]
    fn validated_chain_wraps_only_valid_input() {
        let pow = easy();
        let chain = build_chain(3, &pow);
        let validated = ValidatedChain::new(chain.clone(), &pow).unwrap();
        assert_eq!(validated.len(), 3);
        assert_eq!(validated.into_inner(), chain);
        assert!(ValidatedChain::new(vec![], &pow).is_err());
    }
}
