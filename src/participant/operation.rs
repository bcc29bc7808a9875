//! Schedule and actual operation containers.
//!
//! These records mirror the shape a dispatch solver fills in: battery
//! charge/discharge, renewable generation and default demand split by
//! accounting source, plus conventional generation. Nothing in this crate
//! computes values for them.

use std::str::FromStr;

use crate::error::{MarketError, Result};

/// Accounting sources energy flows are attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountingSource {
    /// Self-supplied.
    Own,
    /// Local electricity market.
    Lem,
    /// Renewable energy retailer.
    Rer,
    /// Conventional energy retailer.
    Cer,
}

impl AccountingSource {
    pub const ALL: [Self; 4] = [Self::Own, Self::Lem, Self::Rer, Self::Cer];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Own => "self",
            Self::Lem => "lem",
            Self::Rer => "rer",
            Self::Cer => "cer",
        }
    }
}

impl FromStr for AccountingSource {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|source| source.as_str() == s)
            .ok_or_else(|| MarketError::unknown_key("accounting source", s))
    }
}

/// One series per accounting source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Accounting {
    pub own: Vec<f64>,
    pub lem: Vec<f64>,
    pub rer: Vec<f64>,
    pub cer: Vec<f64>,
}

impl Accounting {
    pub fn get(&self, source: AccountingSource) -> &[f64] {
        match source {
            AccountingSource::Own => &self.own,
            AccountingSource::Lem => &self.lem,
            AccountingSource::Rer => &self.rer,
            AccountingSource::Cer => &self.cer,
        }
    }

    pub fn get_mut(&mut self, source: AccountingSource) -> &mut Vec<f64> {
        match source {
            AccountingSource::Own => &mut self.own,
            AccountingSource::Lem => &mut self.lem,
            AccountingSource::Rer => &mut self.rer,
            AccountingSource::Cer => &mut self.cer,
        }
    }

    pub fn is_empty(&self) -> bool {
        AccountingSource::ALL
            .into_iter()
            .all(|source| self.get(source).is_empty())
    }
}

/// Battery charge (`ch`) and discharge (`dc`) flows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BessOperation {
    pub ch: Accounting,
    pub dc: Accounting,
}

/// Planned or realized operation of one participant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Operation {
    pub bess: BessOperation,
    pub res_generation: Accounting,
    pub default_demand: Accounting,
    pub conv_generation: Vec<f64>,
}

impl Operation {
    /// Whether no series in the operation holds a value.
    pub fn is_empty(&self) -> bool {
        self.bess.ch.is_empty()
            && self.bess.dc.is_empty()
            && self.res_generation.is_empty()
            && self.default_demand.is_empty()
            && self.conv_generation.is_empty()
    }
}
