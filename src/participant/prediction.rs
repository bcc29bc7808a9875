//! Type-driven prediction of participant demand and generation.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, instrument};

use super::types::ParticipantType;
use crate::error::{MarketError, Result};
use crate::information::MarketInformation;

/// Predicted series held by a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredictionSeries {
    DefaultDemand,
    ResGeneration,
    ConvGeneration,
}

impl PredictionSeries {
    pub const ALL: [Self; 3] = [
        Self::DefaultDemand,
        Self::ResGeneration,
        Self::ConvGeneration,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DefaultDemand => "default_demand",
            Self::ResGeneration => "res_generation",
            Self::ConvGeneration => "conv_generation",
        }
    }
}

impl FromStr for PredictionSeries {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| MarketError::unknown_key("participant prediction", s))
    }
}

impl fmt::Display for PredictionSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-hour rates a participant type demands or generates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyRates {
    pub demand: f64,
    pub conv_generation: f64,
    pub res_generation: f64,
}

impl HourlyRates {
    /// Prosumers consume one unit per hour, a CER supplies one conventional
    /// unit per hour and a RER supplies half a renewable unit per hour.
    pub fn for_type(participant_type: ParticipantType) -> Self {
        match participant_type {
            ParticipantType::Cer => Self {
                demand: 0.0,
                conv_generation: 1.0,
                res_generation: 0.0,
            },
            ParticipantType::Rer => Self {
                demand: 0.0,
                conv_generation: 0.0,
                res_generation: 0.5,
            },
            ParticipantType::OrdinaryProsumer
            | ParticipantType::ResProsumer
            | ParticipantType::LocalProsumer => Self {
                demand: 1.0,
                conv_generation: 0.0,
                res_generation: 0.0,
            },
        }
    }
}

/// The three predicted series of one participant, index-aligned to the
/// market time axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticipantPrediction {
    pub default_demand: Vec<f64>,
    pub res_generation: Vec<f64>,
    pub conv_generation: Vec<f64>,
}

impl ParticipantPrediction {
    /// Computes the predictions of a `participant_type` participant over
    /// `num_time` intervals of `information`'s time axis.
    ///
    /// Each value is the type's hourly rate scaled by the interval duration.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::PreconditionViolation`] if `information` has no
    /// time axis yet or `num_time` differs from its interval count.
    #[instrument(
        skip_all,
        name = "Generating participant prediction…",
        fields(participant_type = %participant_type, num_time = num_time),
    )]
    pub fn generate(
        participant_type: ParticipantType,
        num_time: usize,
        information: &MarketInformation,
    ) -> Result<Self> {
        if !information.is_generated() {
            return Err(MarketError::PreconditionViolation(
                "market information has no time axis".to_string(),
            ));
        }
        if num_time != information.num_interval() {
            return Err(MarketError::PreconditionViolation(format!(
                "num_time {num_time} does not match num_interval {}",
                information.num_interval()
            )));
        }

        let rates = HourlyRates::for_type(participant_type);
        let durations = &information.time_length()[..num_time];

        let prediction = Self {
            default_demand: durations.iter().map(|d| rates.demand * d).collect(),
            res_generation: durations.iter().map(|d| rates.res_generation * d).collect(),
            conv_generation: durations.iter().map(|d| rates.conv_generation * d).collect(),
        };
        debug!(
            len = num_time,
            demand = prediction.total(PredictionSeries::DefaultDemand),
            res_generation = prediction.total(PredictionSeries::ResGeneration),
            conv_generation = prediction.total(PredictionSeries::ConvGeneration),
            "Generated series",
        );
        Ok(prediction)
    }

    pub fn series(&self, key: PredictionSeries) -> &[f64] {
        match key {
            PredictionSeries::DefaultDemand => &self.default_demand,
            PredictionSeries::ResGeneration => &self.res_generation,
            PredictionSeries::ConvGeneration => &self.conv_generation,
        }
    }

    /// Sum of a series over the horizon (energy units).
    pub fn total(&self, key: PredictionSeries) -> f64 {
        self.series(key).iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeAxisConfig;

    fn reference_information() -> MarketInformation {
        let mut info = MarketInformation::new();
        info.generate_reference_scenario();
        info
    }

    #[test]
    fn prosumer_types_share_rates() {
        let ordinary = HourlyRates::for_type(ParticipantType::OrdinaryProsumer);
        assert_eq!(ordinary, HourlyRates::for_type(ParticipantType::ResProsumer));
        assert_eq!(ordinary, HourlyRates::for_type(ParticipantType::LocalProsumer));
        assert_eq!(ordinary.demand, 1.0);
    }

    #[test]
    fn cer_generates_conventional_energy() {
        let info = reference_information();
        let p = ParticipantPrediction::generate(ParticipantType::Cer, 35, &info)
            .expect("information is generated");
        for (t, &d) in info.time_length().iter().enumerate() {
            assert_eq!(p.conv_generation[t], d);
            assert_eq!(p.default_demand[t], 0.0);
            assert_eq!(p.res_generation[t], 0.0);
        }
    }

    #[test]
    fn rer_generates_half_unit_of_renewables() {
        let info = reference_information();
        let p = ParticipantPrediction::generate(ParticipantType::Rer, 35, &info)
            .expect("information is generated");
        for (t, &d) in info.time_length().iter().enumerate() {
            assert_eq!(p.res_generation[t], 0.5 * d);
            assert_eq!(p.default_demand[t], 0.0);
            assert_eq!(p.conv_generation[t], 0.0);
        }
        assert!((p.total(PredictionSeries::ResGeneration) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_information_without_time_axis() {
        let info = MarketInformation::new();
        let err = ParticipantPrediction::generate(ParticipantType::OrdinaryProsumer, 0, &info);
        assert!(matches!(err, Err(MarketError::PreconditionViolation(_))));
    }

    #[test]
    fn rejects_mismatched_num_time() {
        let info = reference_information();
        for num_time in [34, 36] {
            let err = ParticipantPrediction::generate(ParticipantType::Cer, num_time, &info);
            assert!(matches!(err, Err(MarketError::PreconditionViolation(_))));
        }
    }

    #[test]
    fn follows_custom_time_axis() {
        let mut info = MarketInformation::new();
        info.generate(&TimeAxisConfig {
            short_range_intervals: 2,
            long_range_intervals: 1,
            electricity_price: 1.0,
        })
        .expect("valid axis");
        let p = ParticipantPrediction::generate(ParticipantType::LocalProsumer, 3, &info)
            .expect("information is generated");
        assert_eq!(p.default_demand, vec![0.5, 0.5, 1.0]);
    }

    #[test]
    fn series_keys_parse() {
        assert_eq!(
            "res_generation".parse::<PredictionSeries>(),
            Ok(PredictionSeries::ResGeneration)
        );
        assert!(matches!(
            "demand".parse::<PredictionSeries>(),
            Err(MarketError::UnknownKey { .. })
        ));
    }
}
