use crate::error::BankError;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fraction of a savings withdrawal actually paid out; the rest stays in
/// the account as the early-withdrawal penalty never leaves it.
const SAVINGS_WITHDRAWAL_FACTOR: f64 = 0.9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
}

impl std::str::FromStr for AccountType {
    type Err = BankError;

    fn from_str(s: &str) -> Result<Self, BankError> {
        match s {
            "checking" => Ok(AccountType::Checking),
            "savings" => Ok(AccountType::Savings),
            other => Err(BankError::InvalidAccountType(other.to_owned())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub account_num: String,
    pub amount:      f64,
    #[serde(rename = "type")]
    pub kind:        AccountType,
    pub interest:    f64,
}

impl Account {
    /// Checking accounts never bear interest, whatever the caller supplies.
    pub fn new(principal: f64, interest: f64, kind: AccountType) -> Self {
        Self {
            account_num: Uuid::new_v4().simple().to_string(),
            amount: principal,
            kind,
            interest: match kind {
                AccountType::Savings => interest,
                AccountType::Checking => 0.0,
            },
        }
    }

    pub fn deposit(&mut self, amount: f64) -> f64 {
        self.amount += amount;
        self.amount
    }

    /// Checking pays out the full request; savings debits and pays out 90%,
    /// the 10% penalty simply stays put.
    pub fn withdraw(&mut self, amount: f64) -> f64 {
        let paid = match self.kind {
            AccountType::Checking => amount,
            AccountType::Savings => amount * SAVINGS_WITHDRAWAL_FACTOR,
        };
        self.amount -= paid;
        paid
    }

    /// Move funds to another account. Forbidden from savings; balances are
    /// untouched on rejection.
    pub fn transfer(
        &mut self,
        recipient: &mut Account,
        amount: f64,
    ) -> Result<TransferReceipt, BankError> {
        if self.kind == AccountType::Savings {
            return Err(BankError::SavingsTransfer);
        }

        self.amount -= amount;
        recipient.amount += amount;

        Ok(TransferReceipt {
            recipient: recipient.account_num.clone(),
            amount,
        })
    }

    /// No-op for checking by construction: its interest is always 0.
    pub fn compound_interest(&mut self) {
        self.amount *= 1.0 + self.interest;
    }
}

/// Confirmation of a completed transfer, keyed by the receiving account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub recipient: String,
    pub amount:    f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub bank_num: String,
    pub accounts: Vec<Account>,
}

impl Client {
    pub fn new(bank_num: String) -> Self {
        Self {
            bank_num,
            accounts: Vec::new(),
        }
    }

    pub fn account(&self, account_num: &str) -> Result<&Account, BankError> {
        self.accounts
            .iter()
            .find(|a| a.account_num == account_num)
            .ok_or_else(|| BankError::UnknownAccount(account_num.to_owned()))
    }

    pub fn account_mut(&mut self, account_num: &str) -> Result<&mut Account, BankError> {
        self.accounts
            .iter_mut()
            .find(|a| a.account_num == account_num)
            .ok_or_else(|| BankError::UnknownAccount(account_num.to_owned()))
    }

    pub fn open_account(
        &mut self,
        principal: f64,
        interest: f64,
        kind: AccountType,
    ) -> &Account {
        self.accounts.push(Account::new(principal, interest, kind));
        self.accounts.last().expect("account just pushed")
    }

    pub fn close_account(&mut self, account_num: &str) -> Result<Account, BankError> {
        let at = self
            .accounts
            .iter()
            .position(|a| a.account_num == account_num)
            .ok_or_else(|| BankError::UnknownAccount(account_num.to_owned()))?;
        Ok(self.accounts.remove(at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_type_parsing_rejects_unknown_kinds() {
        assert_eq!("checking".parse::<AccountType>().unwrap(), AccountType::Checking);
        assert_eq!("savings".parse::<AccountType>().unwrap(), AccountType::Savings);
        let err = "money-market".parse::<AccountType>().unwrap_err();
        assert!(matches!(err, BankError::InvalidAccountType(_)));
    }

    #[test]
    fn checking_interest_is_forced_to_zero() {
        let account = Account::new(100.0, 0.05, AccountType::Checking);
        assert_eq!(account.interest, 0.0);
        let account = Account::new(100.0, 0.05, AccountType::Savings);
        assert_eq!(account.interest, 0.05);
    }

    #[test]
    fn savings_withdrawal_keeps_the_penalty_in_the_account() {
        let mut account = Account::new(500.0, 0.05, AccountType::Savings);
        assert_eq!(account.withdraw(100.0), 90.0);
        assert_eq!(account.amount, 410.0);
    }

    #[test]
    fn checking_withdrawal_pays_in_full() {
        let mut account = Account::new(500.0, 0.0, AccountType::Checking);
        assert_eq!(account.withdraw(100.0), 100.0);
        assert_eq!(account.amount, 400.0);
    }

    #[test]
    fn deposit_is_unconditional() {
        let mut account = Account::new(10.0, 0.0, AccountType::Checking);
        assert_eq!(account.deposit(15.0), 25.0);
    }

    #[test]
    fn transfer_from_savings_is_rejected_without_side_effects() {
        let mut from = Account::new(300.0, 0.05, AccountType::Savings);
        let mut to = Account::new(50.0, 0.0, AccountType::Checking);
        let err = from.transfer(&mut to, 100.0).unwrap_err();
        assert!(matches!(err, BankError::SavingsTransfer));
        assert_eq!(from.amount, 300.0);
        assert_eq!(to.amount, 50.0);
    }

    #[test]
    fn transfer_moves_funds_and_issues_a_receipt() {
        let mut from = Account::new(300.0, 0.0, AccountType::Checking);
        let mut to = Account::new(50.0, 0.05, AccountType::Savings);
        let receipt = from.transfer(&mut to, 120.0).unwrap();
        assert_eq!(receipt.recipient, to.account_num);
        assert_eq!(receipt.amount, 120.0);
        assert_eq!(from.amount, 180.0);
        assert_eq!(to.amount, 170.0);
    }

    #[test]
    fn compounding_only_moves_savings_balances() {
        let mut savings = Account::new(100.0, 0.05, AccountType::Savings);
        savings.compound_interest();
        assert!((savings.amount - 105.0).abs() < 1e-9);

        let mut checking = Account::new(100.0, 0.05, AccountType::Checking);
        checking.compound_interest();
        assert_eq!(checking.amount, 100.0);
    }

    #[test]
    fn closing_removes_and_returns_the_account() {
        let mut client = Client::new("b1".into());
        let num = client.open_account(100.0, 0.0, AccountType::Checking).account_num.clone();
        client.open_account(5.0, 0.02, AccountType::Savings);

        let closed = client.close_account(&num).unwrap();
        assert_eq!(closed.account_num, num);
        assert_eq!(client.accounts.len(), 1);

        let err = client.close_account(&num).unwrap_err();
        assert!(matches!(err, BankError::UnknownAccount(_)));
    }
}
