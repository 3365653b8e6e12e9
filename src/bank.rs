use crate::{
    block::{self, Block, MetaConfig, Transaction},
    chain::{Chain, ChainKind},
    clients::{Account, AccountType, Client, TransferReceipt},
    config::BankConfig,
    error::BankError,
    finance::{InterbankLoanPortfolio, Repo, RepoPortfolio},
    hr::Employee,
    nodes::NodeRegistry,
    pow,
};

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// Proof carried by every genesis block. Genesis is sealed without a
/// proof-of-work search; its link fields are fixed by convention.
pub const GENESIS_PROOF: u64 = 100;
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// Par value assumed when a repo trade arrives without one.
pub const DEFAULT_REPO_PAR: f64 = 1000.0;

/// Outcome of a reserve-ratio check.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ReserveStatus {
    pub reserves: f64,
    pub valid: bool,
}

/// One institution's complete ledger: the four domain chains, the peer
/// registry, and in-memory indexes of issued employee and client ids.
/// The chains are the sole source of truth; every operation resolves the
/// latest snapshot, applies a pure transition, and appends the result to
/// the owning chain's pending buffer.
pub struct Bank {
    cfg:       BankConfig,
    chains:    [Chain; 4],
    nodes:     NodeRegistry,
    employees: Vec<String>,
    clients:   Vec<String>,
}

impl Default for Bank {
    fn default() -> Self {
        Self::new(BankConfig::default())
    }
}

impl Bank {
    /// Build a ledger and seal genesis on all four chains: the configured
    /// policy record on meta, an empty repo book and a fresh interbank book
    /// on finance, heartbeat blocks on hr and clients.
    pub fn new(cfg: BankConfig) -> Self {
        let mut bank = Self {
            chains: Default::default(),
            nodes: NodeRegistry::new(),
            employees: Vec::new(),
            clients: Vec::new(),
            cfg,
        };

        let genesis_meta = MetaConfig {
            interest: bank.cfg.interest,
            reserve_ratio: bank.cfg.reserve_ratio,
        };
        let genesis_interbank = InterbankLoanPortfolio::new(bank.cfg.interbank_interest);

        bank.add_transaction(Transaction::Meta(genesis_meta));
        bank.add_transaction(Transaction::RepoBook(RepoPortfolio::new()));
        bank.add_transaction(Transaction::Interbank(genesis_interbank));

        for kind in ChainKind::ALL {
            bank.chain_mut(kind)
                .seal(kind, GENESIS_PROOF, GENESIS_PREVIOUS_HASH.to_owned());
        }

        bank
    }

    pub fn config(&self) -> &BankConfig {
        &self.cfg
    }

    // ----------------------------------
    //            Blockchain
    // ----------------------------------

    pub fn chain(&self, kind: ChainKind) -> &Chain {
        &self.chains[kind as usize]
    }

    fn chain_mut(&mut self, kind: ChainKind) -> &mut Chain {
        &mut self.chains[kind as usize]
    }

    pub fn chains(&self) -> impl Iterator<Item = (ChainKind, &Chain)> {
        ChainKind::ALL.into_iter().map(|kind| (kind, self.chain(kind)))
    }

    /// Append a transaction to the pending buffer of the chain its payload
    /// belongs on; returns the index of the block that will seal it.
    pub fn add_transaction(&mut self, tx: Transaction) -> u64 {
        let kind = tx.chain();
        self.chain_mut(kind).add_transaction(tx)
    }

    /// Run the proof-of-work puzzle against the chain's last block, then
    /// seal the pending buffer into a new block. CPU-bound: the search is
    /// unbounded except for the configured difficulty.
    pub fn mine(&mut self, kind: ChainKind) -> &Block {
        let difficulty = self.cfg.difficulty;
        let (last_proof, last_hash) = {
            let last = self
                .chain(kind)
                .last_block()
                .expect("genesis sealed in Bank::new");
            (last.proof, block::hash(last))
        };
        let proof = pow::find_proof(last_proof, &last_hash, difficulty);
        self.chain_mut(kind).seal(kind, proof, last_hash)
    }

    /// Seal every chain holding pending transactions; returns the kinds
    /// that were mined.
    pub fn mine_pending(&mut self) -> Vec<ChainKind> {
        let mut mined = Vec::new();
        for kind in ChainKind::ALL {
            if !self.chain(kind).pending().is_empty() {
                self.mine(kind);
                mined.push(kind);
            }
        }
        mined
    }

    /// Hash linkage and proof-of-work across all four chains.
    pub fn validate_chains(&self) -> bool {
        ChainKind::ALL
            .into_iter()
            .all(|kind| self.chain(kind).validate(kind, self.cfg.difficulty))
    }

    /// Peer conflict resolution (fetch remote chains, adopt if longer and
    /// valid) is a non-goal; this stub never replaces anything.
    pub fn resolve_conflicts(&mut self) -> bool {
        false
    }

    // ----------------------------------
    //              Nodes
    // ----------------------------------

    pub fn nodes(&self) -> &NodeRegistry {
        &self.nodes
    }

    pub fn register_node(&mut self, authorizer: &str, address: &str) -> Result<(), BankError> {
        self.nodes.register(authorizer, address)
    }

    pub fn register_nodes<S: AsRef<str>>(
        &mut self,
        authorizer: &str,
        addresses: &[S],
    ) -> Result<(), BankError> {
        for address in addresses {
            self.nodes.register(authorizer, address.as_ref())?;
        }
        Ok(())
    }

    // ----------------------------------
    //               Meta
    // ----------------------------------

    pub fn set_meta(&mut self, interest: f64, reserve_ratio: f64) -> u64 {
        self.add_transaction(Transaction::Meta(MetaConfig {
            interest,
            reserve_ratio,
        }))
    }

    pub fn meta(&self) -> Result<MetaConfig, BankError> {
        self.chain(ChainKind::Meta)
            .latest(|tx| match tx {
                Transaction::Meta(meta) => Some(meta.clone()),
                _ => None,
            })
            .ok_or(BankError::MissingMeta)
    }

    // ----------------------------------
    //              Finance
    // ----------------------------------

    pub fn interbank(&self) -> Result<InterbankLoanPortfolio, BankError> {
        self.chain(ChainKind::Finance)
            .latest(|tx| match tx {
                Transaction::Interbank(book) => Some(book.clone()),
                _ => None,
            })
            .ok_or(BankError::MissingInterbank)
    }

    pub fn repo_book(&self) -> Result<RepoPortfolio, BankError> {
        self.chain(ChainKind::Finance)
            .latest(|tx| match tx {
                Transaction::RepoBook(book) => Some(book.clone()),
                _ => None,
            })
            .ok_or(BankError::MissingRepoBook)
    }

    pub fn borrow(&mut self, amount: f64) -> Result<(f64, u64), BankError> {
        let mut book = self.interbank()?;
        let cash = book.borrow(amount);
        let index = self.add_transaction(Transaction::Interbank(book));
        Ok((cash, index))
    }

    pub fn lend(&mut self, amount: f64) -> Result<(f64, u64), BankError> {
        let mut book = self.interbank()?;
        let cash = book.lend(amount);
        let index = self.add_transaction(Transaction::Interbank(book));
        Ok((cash, index))
    }

    pub fn interbank_compound(&mut self) -> Result<(f64, u64), BankError> {
        let mut book = self.interbank()?;
        let net_value = book.compound_interest();
        let index = self.add_transaction(Transaction::Interbank(book));
        Ok((net_value, index))
    }

    pub fn buy_repo(&mut self, ytm: f64, par: Option<f64>) -> Result<(Repo, u64), BankError> {
        let mut book = self.repo_book()?;
        let repo = book.buy(ytm, par.unwrap_or(DEFAULT_REPO_PAR)).clone();
        let index = self.add_transaction(Transaction::RepoBook(book));
        Ok((repo, index))
    }

    pub fn sell_repo(&mut self, ytm: f64, par: Option<f64>) -> Result<(Repo, u64), BankError> {
        let mut book = self.repo_book()?;
        let repo = book.sell(ytm, par.unwrap_or(DEFAULT_REPO_PAR)).clone();
        let index = self.add_transaction(Transaction::RepoBook(book));
        Ok((repo, index))
    }

    /// Liquid reserves across the whole institution: interbank cash, the
    /// repo book's net cash effect and client deposits, less payroll.
    pub fn reserves(&self) -> Result<f64, BankError> {
        let interbank = self.interbank()?.cash;
        let repo = self.repo_book()?.reserves();

        let mut client_reserves = 0.0;
        for bank_num in &self.clients {
            let client = self.client(bank_num)?;
            client_reserves += client.accounts.iter().map(|a| a.amount).sum::<f64>();
        }

        let mut payroll = 0.0;
        for employee_num in &self.employees {
            payroll += self.employee(employee_num)?.salary;
        }

        Ok(interbank + repo + client_reserves - payroll)
    }

    /// Reserve-ratio check against the latest meta policy. A zero
    /// denominator (no client deposits and a flat repo book) fails the
    /// check rather than faulting.
    pub fn validate_reserves(&self) -> Result<ReserveStatus, BankError> {
        let liabilities = self.interbank()?.liabilities;
        let repo = self.repo_book()?.reserves();
        let reserve_ratio = self.meta()?.reserve_ratio;

        let mut client_reserves = 0.0;
        for bank_num in &self.clients {
            let client = self.client(bank_num)?;
            client_reserves += client.accounts.iter().map(|a| a.amount).sum::<f64>();
        }

        let base = client_reserves + repo;
        let valid = base != 0.0 && (base - liabilities) / base >= reserve_ratio;

        Ok(ReserveStatus {
            reserves: self.reserves()?,
            valid,
        })
    }

    // ----------------------------------
    //          Human Resources
    // ----------------------------------

    pub fn add_employee(
        &mut self,
        salary: f64,
        department: String,
        supervisor_id: String,
    ) -> (String, u64) {
        let employee = Employee::new(salary, department, supervisor_id);
        let employee_num = employee.employee_num.clone();
        self.employees.push(employee_num.clone());

        info!(employee = %employee_num, "employee added");
        let index = self.add_transaction(Transaction::Employee(employee));
        (employee_num, index)
    }

    pub fn employee(&self, employee_num: &str) -> Result<Employee, BankError> {
        self.chain(ChainKind::Hr)
            .latest(|tx| match tx {
                Transaction::Employee(e) if e.employee_num == employee_num => Some(e.clone()),
                _ => None,
            })
            .ok_or_else(|| BankError::UnknownEmployee(employee_num.to_owned()))
    }

    // ----------------------------------
    //              Clients
    // ----------------------------------

    /// Issue a new client and immediately mine the clients chain; client
    /// creation is coupled to sealing by design.
    pub fn add_client(&mut self) -> (String, u64) {
        let client = Client::new(Uuid::new_v4().simple().to_string());
        let bank_num = client.bank_num.clone();
        self.clients.push(bank_num.clone());

        info!(client = %bank_num, "client added");
        let index = self.add_transaction(Transaction::Client(client));
        self.mine(ChainKind::Clients);
        (bank_num, index)
    }

    pub fn client(&self, bank_num: &str) -> Result<Client, BankError> {
        self.chain(ChainKind::Clients)
            .latest(|tx| match tx {
                Transaction::Client(c) if c.bank_num == bank_num => Some(c.clone()),
                _ => None,
            })
            .ok_or_else(|| BankError::UnknownClient(bank_num.to_owned()))
    }

    /// Open an account under the latest meta deposit rate; savings keeps
    /// the rate, checking is forced to zero.
    pub fn open_account(
        &mut self,
        bank_num: &str,
        principal: f64,
        kind: AccountType,
    ) -> Result<(Account, u64), BankError> {
        let interest = self.meta()?.interest;
        let mut client = self.client(bank_num)?;
        let account = client.open_account(principal, interest, kind).clone();

        let index = self.add_transaction(Transaction::Client(client));
        Ok((account, index))
    }

    pub fn close_account(
        &mut self,
        bank_num: &str,
        account_num: &str,
    ) -> Result<(Account, u64), BankError> {
        let mut client = self.client(bank_num)?;
        let closed = client.close_account(account_num)?;

        let index = self.add_transaction(Transaction::Client(client));
        Ok((closed, index))
    }

    pub fn deposit(
        &mut self,
        bank_num: &str,
        account_num: &str,
        amount: f64,
    ) -> Result<(f64, u64), BankError> {
        let mut client = self.client(bank_num)?;
        let balance = client.account_mut(account_num)?.deposit(amount);

        let index = self.add_transaction(Transaction::Client(client));
        Ok((balance, index))
    }

    pub fn withdraw(
        &mut self,
        bank_num: &str,
        account_num: &str,
        amount: f64,
    ) -> Result<(f64, u64), BankError> {
        let mut client = self.client(bank_num)?;
        let withdrawn = client.account_mut(account_num)?.withdraw(amount);

        let index = self.add_transaction(Transaction::Client(client));
        Ok((withdrawn, index))
    }

    /// Transfer between two accounts of the same client.
    pub fn transfer(
        &mut self,
        bank_num: &str,
        account_num: &str,
        recipient_num: &str,
        amount: f64,
    ) -> Result<(TransferReceipt, u64), BankError> {
        let mut client = self.client(bank_num)?;

        let from_at = client
            .accounts
            .iter()
            .position(|a| a.account_num == account_num)
            .ok_or_else(|| BankError::UnknownAccount(account_num.to_owned()))?;
        let to_at = client
            .accounts
            .iter()
            .position(|a| a.account_num == recipient_num)
            .ok_or_else(|| BankError::UnknownAccount(recipient_num.to_owned()))?;

        let receipt = if from_at == to_at {
            // Self-transfer nets to zero but still honors the savings rule.
            let account = &client.accounts[from_at];
            if account.kind == AccountType::Savings {
                return Err(BankError::SavingsTransfer);
            }
            TransferReceipt {
                recipient: account.account_num.clone(),
                amount,
            }
        } else {
            let (sender, recipient) = if from_at < to_at {
                let (left, right) = client.accounts.split_at_mut(to_at);
                (&mut left[from_at], &mut right[0])
            } else {
                let (left, right) = client.accounts.split_at_mut(from_at);
                (&mut right[0], &mut left[to_at])
            };
            sender.transfer(recipient, amount)?
        };

        let index = self.add_transaction(Transaction::Client(client));
        Ok((receipt, index))
    }

    /// Compound every account of every client, appending one updated
    /// snapshot per client; returns the block index that will hold them.
    pub fn compound_client_interest(&mut self) -> Result<u64, BankError> {
        let mut index = self
            .chain(ChainKind::Clients)
            .last_block()
            .map(|b| b.index + 1)
            .unwrap_or(1);

        for bank_num in self.clients.clone() {
            let mut client = self.client(&bank_num)?;
            for account in &mut client.accounts {
                account.compound_interest();
            }
            index = self.add_transaction(Transaction::Client(client));
        }
        Ok(index)
    }
}
