use crate::{
    block::{self, Block, Transaction},
    pow,
};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// The four domain chains. Closed set: every transaction payload maps onto
/// exactly one kind (see [`Transaction::chain`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainKind {
    Meta,
    Finance,
    Hr,
    Clients,
}

impl ChainKind {
    pub const ALL: [ChainKind; 4] = [
        ChainKind::Meta,
        ChainKind::Finance,
        ChainKind::Hr,
        ChainKind::Clients,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChainKind::Meta => "meta",
            ChainKind::Finance => "finance",
            ChainKind::Hr => "hr",
            ChainKind::Clients => "clients",
        }
    }
}

/// One domain's hash-linked block sequence plus its pending buffer. The
/// sealed blocks are the sole source of truth for the domain; the buffer
/// holds transactions waiting for the next seal.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Chain {
    blocks:  Vec<Block>,
    pending: Vec<Transaction>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn last_block(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Buffer a transaction and return the index of the block that will
    /// eventually contain it. A receipt for the future block, not a
    /// position in the buffer.
    pub fn add_transaction(&mut self, tx: Transaction) -> u64 {
        self.pending.push(tx);
        match self.blocks.last() {
            Some(last) => last.index + 1,
            None => 1,
        }
    }

    /// Drain the buffer into a new sealed block. An empty buffer still
    /// seals (a heartbeat block).
    pub fn seal(&mut self, kind: ChainKind, proof: u64, previous_hash: String) -> &Block {
        let block = Block {
            index: self.blocks.len() as u64 + 1,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
            transactions: std::mem::take(&mut self.pending),
            proof,
            previous_hash,
        };

        info!(
            chain = kind.as_str(),
            height = block.index,
            entries = block.transactions.len(),
            proof = block.proof,
            "sealing block"
        );

        self.blocks.push(block);
        self.blocks.last().expect("block just pushed")
    }

    /// Verify hash linkage and proof-of-work across the sealed chain,
    /// failing fast on the first broken pair. The genesis block carries a
    /// caller-supplied proof and previous_hash, so only links from the
    /// second block onwards are checked.
    pub fn validate(&self, kind: ChainKind, difficulty: usize) -> bool {
        for pair in self.blocks.windows(2) {
            let (last, current) = (&pair[0], &pair[1]);
            let last_hash = block::hash(last);

            if current.previous_hash != last_hash {
                warn!(
                    chain = kind.as_str(),
                    height = current.index,
                    "hash link broken"
                );
                return false;
            }
            if !pow::valid_proof(last.proof, current.proof, &last_hash, difficulty) {
                warn!(
                    chain = kind.as_str(),
                    height = current.index,
                    "proof-of-work invalid"
                );
                return false;
            }
        }
        true
    }

    /// Last-write-wins resolution over the append-only log: scan the pending
    /// buffer newest-to-oldest, then sealed blocks newest-to-oldest (and
    /// transactions within each block newest-to-oldest), returning the first
    /// value `pick` extracts. Linear in chain size. `None` means the whole
    /// history holds no matching record; callers turn that into a
    /// domain-specific not-found error.
    pub fn latest<T>(&self, pick: impl Fn(&Transaction) -> Option<T>) -> Option<T> {
        self.pending
            .iter()
            .rev()
            .chain(
                self.blocks
                    .iter()
                    .rev()
                    .flat_map(|b| b.transactions.iter().rev()),
            )
            .find_map(|tx| pick(tx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::MetaConfig;

    fn meta_tx(interest: f64) -> Transaction {
        Transaction::Meta(MetaConfig {
            interest,
            reserve_ratio: 0.2,
        })
    }

    fn mine(chain: &mut Chain, difficulty: usize) {
        let last = chain.last_block().expect("sealed genesis");
        let last_hash = block::hash(last);
        let proof = pow::find_proof(last.proof, &last_hash, difficulty);
        chain.seal(ChainKind::Meta, proof, last_hash);
    }

    #[test]
    fn forward_reference_points_at_the_next_block() {
        let mut chain = Chain::new();
        assert_eq!(chain.add_transaction(meta_tx(0.01)), 1);
        chain.seal(ChainKind::Meta, 100, "1".into());
        assert_eq!(chain.add_transaction(meta_tx(0.02)), 2);
        // Still the same future block until a seal happens.
        assert_eq!(chain.add_transaction(meta_tx(0.03)), 2);
    }

    #[test]
    fn sealing_drains_the_buffer() {
        let mut chain = Chain::new();
        chain.add_transaction(meta_tx(0.01));
        chain.add_transaction(meta_tx(0.02));
        let block = chain.seal(ChainKind::Meta, 100, "1".into());
        assert_eq!(block.index, 1);
        assert_eq!(block.transactions.len(), 2);
        assert!(chain.pending().is_empty());
    }

    #[test]
    fn empty_buffer_still_seals_a_heartbeat_block() {
        let mut chain = Chain::new();
        chain.seal(ChainKind::Meta, 100, "1".into());
        assert_eq!(chain.blocks().len(), 1);
        assert!(chain.blocks()[0].transactions.is_empty());
    }

    #[test]
    fn mined_chain_validates() {
        let difficulty = 1;
        let mut chain = Chain::new();
        chain.add_transaction(meta_tx(0.01));
        chain.seal(ChainKind::Meta, 100, "1".into());
        for i in 0..3 {
            chain.add_transaction(meta_tx(0.02 + i as f64));
            mine(&mut chain, difficulty);
        }
        assert!(chain.validate(ChainKind::Meta, difficulty));
    }

    #[test]
    fn corrupting_history_breaks_validation() {
        let difficulty = 1;
        let mut chain = Chain::new();
        chain.add_transaction(meta_tx(0.01));
        chain.seal(ChainKind::Meta, 100, "1".into());
        chain.add_transaction(meta_tx(0.02));
        mine(&mut chain, difficulty);
        assert!(chain.validate(ChainKind::Meta, difficulty));

        chain.blocks[0].transactions[0] = meta_tx(0.99);
        assert!(!chain.validate(ChainKind::Meta, difficulty));
    }

    #[test]
    fn latest_sees_pending_before_sealed_history() {
        let mut chain = Chain::new();
        chain.add_transaction(meta_tx(0.01));
        chain.seal(ChainKind::Meta, 100, "1".into());
        chain.add_transaction(meta_tx(0.02));

        let meta = chain
            .latest(|tx| match tx {
                Transaction::Meta(m) => Some(m.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(meta.interest, 0.02);
    }

    #[test]
    fn latest_returns_none_on_an_unmatched_scan() {
        let mut chain = Chain::new();
        chain.seal(ChainKind::Meta, 100, "1".into());
        let found = chain.latest(|tx| match tx {
            Transaction::Meta(m) => Some(m.clone()),
            _ => None,
        });
        assert!(found.is_none());
    }
}
