//! Static technical parameters of a market participant.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{MarketError, Result};

/// Role of a participant in the local electricity market.
///
/// Discriminants match the numeric codes used by the market model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ParticipantType {
    /// Conventional energy retailer.
    Cer = 0,
    /// Renewable energy retailer.
    Rer = 1,
    /// Consumer without own generation.
    OrdinaryProsumer = 2,
    /// Prosumer with renewable generation.
    ResProsumer = 3,
    /// Prosumer trading on the local market.
    LocalProsumer = 4,
}

impl ParticipantType {
    pub const ALL: [Self; 5] = [
        Self::Cer,
        Self::Rer,
        Self::OrdinaryProsumer,
        Self::ResProsumer,
        Self::LocalProsumer,
    ];

    /// Numeric type code (0..=4).
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Consumer-side roles (code >= 2).
    pub fn is_prosumer(self) -> bool {
        self.code() >= 2
    }

    /// Supply-side roles (CER and RER).
    pub fn is_retailer(self) -> bool {
        !self.is_prosumer()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cer => "cer",
            Self::Rer => "rer",
            Self::OrdinaryProsumer => "ordinary_prosumer",
            Self::ResProsumer => "res_prosumer",
            Self::LocalProsumer => "local_prosumer",
        }
    }
}

impl TryFrom<u8> for ParticipantType {
    type Error = MarketError;

    fn try_from(code: u8) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or_else(|| MarketError::unknown_key("participant type", code.to_string()))
    }
}

impl FromStr for ParticipantType {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| MarketError::unknown_key("participant type", s))
    }
}

impl fmt::Display for ParticipantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sources a participant may attach a premium to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PremiumSource {
    /// Renewable energy.
    Res,
    /// Energy bought on the local market.
    Lem,
    /// Self-supplied energy.
    Own,
}

impl PremiumSource {
    pub const ALL: [Self; 3] = [Self::Res, Self::Lem, Self::Own];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Res => "res",
            Self::Lem => "lem",
            Self::Own => "self",
        }
    }
}

impl FromStr for PremiumSource {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|source| source.as_str() == s)
            .ok_or_else(|| MarketError::unknown_key("premium source", s))
    }
}

/// Premium rates by electricity source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Premium {
    pub res: f64,
    pub lem: f64,
    #[serde(rename = "self")]
    pub own: f64,
}

impl Premium {
    pub fn get(&self, source: PremiumSource) -> f64 {
        match source {
            PremiumSource::Res => self.res,
            PremiumSource::Lem => self.lem,
            PremiumSource::Own => self.own,
        }
    }
}

/// Initial battery state of charge split by accounting source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InitialSoc {
    #[serde(rename = "self")]
    pub own: f64,
    pub lem: f64,
    pub rer: f64,
    pub cer: f64,
}

impl InitialSoc {
    pub fn total(&self) -> f64 {
        self.own + self.lem + self.rer + self.cer
    }
}

/// Static battery energy storage system specification.
///
/// Only the parameters are modelled; dispatch is left to an external solver.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BessParameters {
    /// Energy rating.
    pub energy: f64,
    /// Power capacity.
    pub capacity: f64,
    /// Round-trip efficiency (0..=1).
    pub efficiency: f64,
    pub initial_soc: InitialSoc,
}

impl Default for BessParameters {
    fn default() -> Self {
        Self {
            energy: 0.0,
            capacity: 0.0,
            efficiency: 1.0,
            initial_soc: InitialSoc::default(),
        }
    }
}

/// Full parameter record of one participant.
///
/// The participant type is fixed when the record is built and has no setter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantParameters {
    participant_type: ParticipantType,
    pub premium: Premium,
    pub bess: BessParameters,
}

impl ParticipantParameters {
    /// Default parameters for `participant_type`: zero premiums and an empty,
    /// lossless battery.
    pub fn new(participant_type: ParticipantType) -> Self {
        Self {
            participant_type,
            premium: Premium::default(),
            bess: BessParameters::default(),
        }
    }

    pub fn with_premium(mut self, premium: Premium) -> Self {
        self.premium = premium;
        self
    }

    pub fn with_bess(mut self, bess: BessParameters) -> Self {
        self.bess = bess;
        self
    }

    pub fn participant_type(&self) -> ParticipantType {
        self.participant_type
    }
}
