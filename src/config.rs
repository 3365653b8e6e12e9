use crate::pow;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

/// Genesis policy and mining parameters for one ledger instance.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct BankConfig {
    pub interest: f64,           // meta chain genesis deposit rate
    pub reserve_ratio: f64,      // meta chain genesis reserve requirement
    pub interbank_interest: f64, // rate on the interbank book
    pub difficulty: usize,       // proof-of-work leading zero nibbles
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            interest: 0.05,
            reserve_ratio: 0.2,
            interbank_interest: 0.02,
            difficulty: pow::DEFAULT_DIFFICULTY,
        }
    }
}

impl BankConfig {
    pub fn load(path: &str) -> Result<Self> {
        let s = fs::read_to_string(path)
            .with_context(|| format!("reading config file `{}`", path))?;
        let cfg: BankConfig = toml::from_str(&s)
            .with_context(|| format!("parsing `{}` as TOML", path))?;

        Ok(cfg)
    }
}
