pub mod bank;           // Bank ledger context: genesis, sealing, domain operations
pub mod block;          // Block type, Transaction payloads, canonical hashing
pub mod chain;          // per-domain chain storage, pending buffers, validation
pub mod clients;        // Client and Account transition rules
pub mod config;         // loads bank.toml genesis/difficulty parameters
pub mod error;          // BankError taxonomy and ErrorKind classification
pub mod finance;        // repo and interbank loan portfolios
pub mod hr;             // personnel records
pub mod nodes;          // trust-on-first-use peer registry
pub mod pow;            // proof-of-work search and verification

pub use bank::{Bank, ReserveStatus};
pub use block::{Block, MetaConfig, Transaction};
pub use chain::{Chain, ChainKind};
pub use config::BankConfig;
pub use error::{BankError, ErrorKind};
