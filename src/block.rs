use crate::{
    chain::ChainKind,
    clients::Client,
    finance::{InterbankLoanPortfolio, RepoPortfolio},
    hr::Employee,
};

use blake3::Hasher;
use serde::{Deserialize, Serialize};

/// Institution-wide policy record, kept on the meta chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetaConfig {
    pub interest: f64,
    pub reserve_ratio: f64,
}

/// One ledger event: the full post-mutation snapshot of a domain entity.
/// The variant determines the chain the transaction belongs on, so an
/// append can never land on the wrong chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transaction {
    Meta(MetaConfig),
    RepoBook(RepoPortfolio),
    Interbank(InterbankLoanPortfolio),
    Employee(Employee),
    Client(Client),
}

impl Transaction {
    pub fn chain(&self) -> ChainKind {
        match self {
            Transaction::Meta(_) => ChainKind::Meta,
            Transaction::RepoBook(_) | Transaction::Interbank(_) => ChainKind::Finance,
            Transaction::Employee(_) => ChainKind::Hr,
            Transaction::Client(_) => ChainKind::Clients,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index:         u64,
    pub timestamp_ms:  i64,
    pub transactions:  Vec<Transaction>,
    pub proof:         u64,
    pub previous_hash: String,
}

/// Content hash of a block: blake3 over its RFC 8785 canonical JSON bytes.
/// Canonicalisation sorts object keys, so two semantically identical blocks
/// hash identically regardless of construction order.
pub fn hash(block: &Block) -> String {
    let bytes = serde_jcs::to_vec(block).expect("block serialises to canonical JSON");
    let mut h = Hasher::new();
    h.update(&bytes);
    h.finalize().to_hex().to_string()
}
