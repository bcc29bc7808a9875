//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::information::DEFAULT_PRICE_INFLEX_DEMAND;
use crate::participant::{BessParameters, ParticipantParameters, ParticipantType, Premium};

/// Upper bound on the number of intervals of one time axis.
pub const MAX_INTERVALS: usize = 100_000;

/// Top-level scenario configuration parsed from TOML.
///
/// Missing sections fall back to the reference scenario. Load from TOML with
/// [`ScenarioConfig::from_toml_file`] or use [`ScenarioConfig::reference`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Time axis layout and price rule.
    pub time_axis: TimeAxisConfig,
    /// Market-wide scalar parameters.
    pub information: InformationConfig,
    /// Participants in construction order.
    pub participants: Vec<ParticipantConfig>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::reference()
    }
}

/// Two-resolution time axis: a short-range block spanning one hour followed
/// by one-hour intervals, priced at a constant rate.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeAxisConfig {
    /// Number of short-range intervals, each `1 / short_range_intervals` hours.
    pub short_range_intervals: usize,
    /// Number of one-hour intervals after the short-range block.
    pub long_range_intervals: usize,
    /// Electricity price applied to every interval.
    pub electricity_price: f64,
}

impl Default for TimeAxisConfig {
    fn default() -> Self {
        Self {
            short_range_intervals: 12,
            long_range_intervals: 23,
            electricity_price: 10.0,
        }
    }
}

impl TimeAxisConfig {
    /// Total number of intervals on the axis, or `None` on overflow.
    pub fn num_interval(&self) -> Option<usize> {
        self.short_range_intervals
            .checked_add(self.long_range_intervals)
    }
}

/// Market-wide scalar parameters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InformationConfig {
    /// Price elasticity breakpoint of inflexible demand.
    pub price_inflex_demand: f64,
}

impl Default for InformationConfig {
    fn default() -> Self {
        Self {
            price_inflex_demand: DEFAULT_PRICE_INFLEX_DEMAND,
        }
    }
}

/// One `[[participants]]` entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParticipantConfig {
    /// Participant role, e.g. `"ordinary_prosumer"`.
    #[serde(rename = "type")]
    pub participant_type: ParticipantType,
    #[serde(default)]
    pub premium: Premium,
    #[serde(default)]
    pub bess: BessParameters,
}

impl ParticipantConfig {
    /// Participant of `participant_type` with default premiums and battery.
    pub fn of_type(participant_type: ParticipantType) -> Self {
        Self {
            participant_type,
            premium: Premium::default(),
            bess: BessParameters::default(),
        }
    }

    pub fn parameters(&self) -> ParticipantParameters {
        ParticipantParameters::new(self.participant_type)
            .with_premium(self.premium)
            .with_bess(self.bess)
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"time_axis.electricity_price"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Returns the reference scenario: 12 five-minute and 23 hourly
    /// intervals at price 10, with an ordinary prosumer, a RER and a CER.
    pub fn reference() -> Self {
        Self {
            time_axis: TimeAxisConfig::default(),
            information: InformationConfig::default(),
            participants: vec![
                ParticipantConfig::of_type(ParticipantType::OrdinaryProsumer),
                ParticipantConfig::of_type(ParticipantType::Rer),
                ParticipantConfig::of_type(ParticipantType::Cer),
            ],
        }
    }

    /// Returns the retail-only preset: one CER and one RER over a full day
    /// of hourly intervals.
    pub fn retail_only() -> Self {
        Self {
            time_axis: TimeAxisConfig {
                short_range_intervals: 0,
                long_range_intervals: 24,
                ..TimeAxisConfig::default()
            },
            participants: vec![
                ParticipantConfig::of_type(ParticipantType::Cer),
                ParticipantConfig::of_type(ParticipantType::Rer),
            ],
            ..Self::reference()
        }
    }

    /// Returns the prosumer-community preset: every prosumer type plus both
    /// retailers, with a 15-minute short-range block. The RES prosumer owns a
    /// small battery and values self-supplied energy.
    pub fn prosumer_community() -> Self {
        let res_prosumer = ParticipantConfig {
            premium: Premium {
                own: 2.0,
                ..Premium::default()
            },
            bess: BessParameters {
                energy: 10.0,
                capacity: 5.0,
                efficiency: 0.95,
                ..BessParameters::default()
            },
            ..ParticipantConfig::of_type(ParticipantType::ResProsumer)
        };
        let local_prosumer = ParticipantConfig {
            premium: Premium {
                lem: 1.0,
                ..Premium::default()
            },
            ..ParticipantConfig::of_type(ParticipantType::LocalProsumer)
        };

        Self {
            time_axis: TimeAxisConfig {
                short_range_intervals: 4,
                long_range_intervals: 23,
                ..TimeAxisConfig::default()
            },
            information: InformationConfig::default(),
            participants: vec![
                ParticipantConfig::of_type(ParticipantType::OrdinaryProsumer),
                res_prosumer,
                local_prosumer,
                ParticipantConfig::of_type(ParticipantType::Rer),
                ParticipantConfig::of_type(ParticipantType::Cer),
            ],
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["reference", "retail_only", "prosumer_community"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "reference" => Ok(Self::reference()),
            "retail_only" => Ok(Self::retail_only()),
            "prosumer_community" => Ok(Self::prosumer_community()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let axis = &self.time_axis;
        match axis.num_interval() {
            Some(0) => errors.push(ConfigError::new(
                "time_axis",
                "short_range_intervals + long_range_intervals must be > 0",
            )),
            Some(n) if n <= MAX_INTERVALS => {}
            _ => errors.push(ConfigError::new(
                "time_axis",
                format!("short_range_intervals + long_range_intervals must be <= {MAX_INTERVALS}"),
            )),
        }
        if !axis.electricity_price.is_finite() {
            errors.push(ConfigError::new(
                "time_axis.electricity_price",
                "must be finite",
            ));
        }
        if !self.information.price_inflex_demand.is_finite() {
            errors.push(ConfigError::new(
                "information.price_inflex_demand",
                "must be finite",
            ));
        }

        if self.participants.is_empty() {
            errors.push(ConfigError::new("participants", "must not be empty"));
        }
        for (i, p) in self.participants.iter().enumerate() {
            let bess = &p.bess;
            if !(bess.efficiency > 0.0 && bess.efficiency <= 1.0) {
                errors.push(ConfigError::new(
                    format!("participants[{i}].bess.efficiency"),
                    "must be in (0.0, 1.0]",
                ));
            }
            if bess.energy < 0.0 || bess.capacity < 0.0 {
                errors.push(ConfigError::new(
                    format!("participants[{i}].bess"),
                    "energy and capacity must be >= 0",
                ));
            }
            let soc = &bess.initial_soc;
            if [soc.own, soc.lem, soc.rer, soc.cer].iter().any(|&v| v < 0.0) {
                errors.push(ConfigError::new(
                    format!("participants[{i}].bess.initial_soc"),
                    "must be >= 0",
                ));
            }
        }

        errors
    }
}
