use serde::{Deserialize, Serialize};

/// Side of a repo position. Buying consumes cash reserves to acquire the
/// security; selling raises cash by pledging one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoFlag {
    Buy,
    Sell,
}

/// A single short-term financing position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Repo {
    pub par:  f64,
    pub ytm:  f64,
    pub flag: RepoFlag,
}

impl Repo {
    pub fn present_value(&self) -> f64 {
        self.par * (1.0 + self.ytm)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoPortfolio {
    pub portfolio: Vec<Repo>,
}

impl RepoPortfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.portfolio.len()
    }

    pub fn is_empty(&self) -> bool {
        self.portfolio.is_empty()
    }

    pub fn buy(&mut self, ytm: f64, par: f64) -> &Repo {
        self.push(ytm, par, RepoFlag::Buy)
    }

    pub fn sell(&mut self, ytm: f64, par: f64) -> &Repo {
        self.push(ytm, par, RepoFlag::Sell)
    }

    fn push(&mut self, ytm: f64, par: f64, flag: RepoFlag) -> &Repo {
        self.portfolio.push(Repo { par, ytm, flag });
        self.portfolio.last().expect("position just pushed")
    }

    /// Net cash effect of the book: −par per buy, +par per sell.
    pub fn reserves(&self) -> f64 {
        self.portfolio
            .iter()
            .map(|r| match r.flag {
                RepoFlag::Buy => -r.par,
                RepoFlag::Sell => r.par,
            })
            .sum()
    }

    /// Same sign convention over par·(1+ytm).
    pub fn present_value(&self) -> f64 {
        self.portfolio
            .iter()
            .map(|r| match r.flag {
                RepoFlag::Buy => -r.present_value(),
                RepoFlag::Sell => r.present_value(),
            })
            .sum()
    }
}

/// Interbank lending book. All operations return the post-transition value;
/// appending the new snapshot to the finance chain is the caller's job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InterbankLoanPortfolio {
    pub assets:      f64,
    pub liabilities: f64,
    pub cash:        f64,
    pub interest:    f64,
}

impl InterbankLoanPortfolio {
    pub fn new(interest: f64) -> Self {
        Self {
            assets: 0.0,
            liabilities: 0.0,
            cash: 0.0,
            interest,
        }
    }

    pub fn net_value(&self) -> f64 {
        self.assets - self.liabilities
    }

    pub fn borrow(&mut self, amount: f64) -> f64 {
        self.liabilities += amount;
        self.cash += amount;
        self.cash
    }

    pub fn lend(&mut self, amount: f64) -> f64 {
        self.assets += amount;
        self.cash -= amount;
        self.cash
    }

    pub fn compound_interest(&mut self) -> f64 {
        self.assets *= 1.0 + self.interest;
        self.liabilities *= 1.0 + self.interest;
        self.net_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_signs_follow_the_cash_flow() {
        let mut book = RepoPortfolio::new();
        book.buy(0.05, 1000.0);
        book.sell(0.03, 400.0);
        assert_eq!(book.len(), 2);
        assert_eq!(book.reserves(), -600.0);
        // -1000*1.05 + 400*1.03
        assert!((book.present_value() - (-1050.0 + 412.0)).abs() < 1e-9);
    }

    #[test]
    fn borrow_raises_cash_and_liabilities() {
        let mut bank = InterbankLoanPortfolio::new(0.02);
        assert_eq!(bank.borrow(100.0), 100.0);
        assert_eq!(bank.liabilities, 100.0);
        assert_eq!(bank.net_value(), -100.0);
    }

    #[test]
    fn lend_moves_cash_into_assets() {
        let mut bank = InterbankLoanPortfolio::new(0.02);
        bank.borrow(100.0);
        assert_eq!(bank.lend(40.0), 60.0);
        assert_eq!(bank.assets, 40.0);
        assert_eq!(bank.net_value(), -60.0);
    }

    #[test]
    fn compounding_scales_both_sides_of_the_book() {
        let mut bank = InterbankLoanPortfolio::new(0.1);
        bank.borrow(100.0);
        bank.lend(50.0);
        let net = bank.compound_interest();
        assert!((bank.assets - 55.0).abs() < 1e-9);
        assert!((bank.liabilities - 110.0).abs() < 1e-9);
        assert!((net - -55.0).abs() < 1e-9);
        // Cash is not interest-bearing.
        assert_eq!(bank.cash, 50.0);
    }
}
