//! Local electricity market participants.

/// Schedule and actual operation containers.
pub mod operation;
/// Type-driven demand and generation prediction.
pub mod prediction;
pub mod types;

pub use operation::{Accounting, AccountingSource, BessOperation, Operation};
pub use prediction::{HourlyRates, ParticipantPrediction, PredictionSeries};
pub use types::{
    BessParameters, InitialSoc, ParticipantParameters, ParticipantType, Premium, PremiumSource,
};

use crate::error::{MarketError, Result};
use crate::information::MarketInformation;

/// One participant: static parameters, predictions, and the schedule/actual
/// containers a dispatch solver fills in.
///
/// # Examples
///
/// ```
/// use lem_sim::information::MarketInformation;
/// use lem_sim::participant::{MarketParticipant, ParticipantType, PredictionSeries};
///
/// let mut info = MarketInformation::new();
/// info.generate_reference_scenario();
///
/// let mut rer = MarketParticipant::new(ParticipantType::Rer);
/// rer.generate_reference_scenario(info.num_interval(), &info).unwrap();
///
/// let first = rer.get_prediction_value(PredictionSeries::ResGeneration, 0).unwrap();
/// assert!((first - 1.0 / 24.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MarketParticipant {
    parameters: ParticipantParameters,
    prediction: ParticipantPrediction,
    schedule: Operation,
    actual: Operation,
}

impl MarketParticipant {
    /// Creates a participant of `participant_type` with default parameters.
    pub fn new(participant_type: ParticipantType) -> Self {
        Self::with_parameters(ParticipantParameters::new(participant_type))
    }

    /// Creates a participant from a full parameter record.
    pub fn with_parameters(parameters: ParticipantParameters) -> Self {
        Self {
            parameters,
            prediction: ParticipantPrediction::default(),
            schedule: Operation::default(),
            actual: Operation::default(),
        }
    }

    pub fn participant_type(&self) -> ParticipantType {
        self.parameters.participant_type()
    }

    pub fn get_parameters(&self) -> &ParticipantParameters {
        &self.parameters
    }

    /// Returns the predicted series for `key` (empty until generated).
    pub fn get_prediction(&self, key: PredictionSeries) -> &[f64] {
        self.prediction.series(key)
    }

    pub fn prediction(&self) -> &ParticipantPrediction {
        &self.prediction
    }

    /// Returns the value of series `key` at interval `tick`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::IndexOutOfRange`] if the series has not been
    /// generated or `tick` is past its end.
    pub fn get_prediction_value(&self, key: PredictionSeries, tick: usize) -> Result<f64> {
        let series = self.prediction.series(key);
        series
            .get(tick)
            .copied()
            .ok_or(MarketError::IndexOutOfRange {
                series: key.as_str(),
                tick,
                len: series.len(),
            })
    }

    /// Whether all three prediction series have been populated.
    pub fn has_prediction(&self) -> bool {
        PredictionSeries::ALL
            .into_iter()
            .all(|key| !self.prediction.series(key).is_empty())
    }

    /// Generates the type-driven predictions over `num_time` intervals of
    /// `information` and stores them.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::PreconditionViolation`] if `information` has
    /// no time axis or `num_time` differs from its interval count. The
    /// current prediction is left untouched on error.
    pub fn generate_reference_scenario(
        &mut self,
        num_time: usize,
        information: &MarketInformation,
    ) -> Result<()> {
        self.prediction =
            ParticipantPrediction::generate(self.participant_type(), num_time, information)?;
        Ok(())
    }

    /// Planned operation, reserved for a dispatch solver.
    pub fn schedule(&self) -> &Operation {
        &self.schedule
    }

    pub fn schedule_mut(&mut self) -> &mut Operation {
        &mut self.schedule
    }

    /// Realized operation, reserved for a dispatch solver.
    pub fn actual(&self) -> &Operation {
        &self.actual
    }

    pub fn actual_mut(&mut self) -> &mut Operation {
        &mut self.actual
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_information() -> MarketInformation {
        let mut info = MarketInformation::new();
        info.generate_reference_scenario();
        info
    }

    #[test]
    fn new_participant_has_defaults_and_empty_state() {
        let p = MarketParticipant::new(ParticipantType::LocalProsumer);
        assert_eq!(p.participant_type(), ParticipantType::LocalProsumer);
        assert_eq!(p.get_parameters().bess.efficiency, 1.0);
        assert!(!p.has_prediction());
        assert!(p.schedule().is_empty());
        assert!(p.actual().is_empty());
    }

    #[test]
    fn prosumer_demand_tracks_interval_duration() {
        let info = reference_information();
        let mut p = MarketParticipant::new(ParticipantType::ResProsumer);
        p.generate_reference_scenario(info.num_interval(), &info)
            .expect("information is generated");

        for (t, &d) in info.time_length().iter().enumerate() {
            assert_eq!(p.get_prediction_value(PredictionSeries::DefaultDemand, t), Ok(d));
            assert_eq!(p.get_prediction_value(PredictionSeries::ResGeneration, t), Ok(0.0));
            assert_eq!(p.get_prediction_value(PredictionSeries::ConvGeneration, t), Ok(0.0));
        }
    }

    #[test]
    fn value_before_generation_is_out_of_range() {
        let p = MarketParticipant::new(ParticipantType::Cer);
        let err = p.get_prediction_value(PredictionSeries::ConvGeneration, 0);
        assert_eq!(
            err,
            Err(MarketError::IndexOutOfRange {
                series: "conv_generation",
                tick: 0,
                len: 0,
            })
        );
    }

    #[test]
    fn value_past_horizon_is_out_of_range() {
        let info = reference_information();
        let mut p = MarketParticipant::new(ParticipantType::Cer);
        p.generate_reference_scenario(35, &info)
            .expect("information is generated");
        assert!(p.get_prediction_value(PredictionSeries::ConvGeneration, 34).is_ok());
        assert!(matches!(
            p.get_prediction_value(PredictionSeries::ConvGeneration, 35),
            Err(MarketError::IndexOutOfRange { tick: 35, len: 35, .. })
        ));
    }

    #[test]
    fn failed_generation_keeps_previous_prediction() {
        let info = reference_information();
        let mut p = MarketParticipant::new(ParticipantType::Rer);
        p.generate_reference_scenario(35, &info)
            .expect("information is generated");
        let before = p.prediction().clone();

        let err = p.generate_reference_scenario(35, &MarketInformation::new());
        assert!(matches!(err, Err(MarketError::PreconditionViolation(_))));
        assert_eq!(p.prediction(), &before);
    }

    #[test]
    fn regeneration_is_reproducible() {
        let info = reference_information();
        let mut p = MarketParticipant::new(ParticipantType::OrdinaryProsumer);
        p.generate_reference_scenario(35, &info)
            .expect("information is generated");
        let first = p.prediction().clone();
        p.generate_reference_scenario(35, &info)
            .expect("information is generated");
        assert_eq!(p.prediction(), &first);
    }

    #[test]
    fn generation_does_not_touch_schedule_or_actual() {
        let info = reference_information();
        let mut p = MarketParticipant::new(ParticipantType::Cer);
        p.generate_reference_scenario(35, &info)
            .expect("information is generated");
        assert!(p.schedule().is_empty());
        assert!(p.actual().is_empty());
    }

    #[test]
    fn schedule_is_writable_by_a_solver() {
        let mut p = MarketParticipant::new(ParticipantType::LocalProsumer);
        p.schedule_mut().conv_generation.push(1.0);
        p.actual_mut()
            .bess
            .ch
            .get_mut(AccountingSource::Own)
            .push(0.2);
        assert_eq!(p.schedule().conv_generation, vec![1.0]);
        assert_eq!(p.actual().bess.ch.own, vec![0.2]);
    }
}
