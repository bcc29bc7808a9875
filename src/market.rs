//! Market orchestration: information first, then participant predictions.

use tracing::{info, instrument, warn};

use crate::config::ScenarioConfig;
use crate::error::{MarketError, Result};
use crate::information::MarketInformation;
use crate::participant::{MarketParticipant, ParticipantType};

/// A local electricity market owning its information and an ordered
/// participant collection.
///
/// Participant predictions are always generated after the information's
/// time axis is final, since they read it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Market {
    information: MarketInformation,
    participants: Vec<MarketParticipant>,
}

impl Market {
    /// Creates an empty market with no time axis and no participants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds and initializes a market from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::InvalidConfig`] if `config` fails validation,
    /// otherwise propagates the first generation error.
    pub fn from_config(config: &ScenarioConfig) -> Result<Self> {
        let mut market = Self::new();
        market.initialize(config)?;
        Ok(market)
    }

    /// Initializes the reference scenario: a 35-interval day and an
    /// ordinary prosumer, a RER and a CER, in that order.
    ///
    /// # Errors
    ///
    /// Propagates any participant generation error. On error the market is
    /// unchanged.
    #[instrument(skip_all, name = "Initializing the reference scenario…")]
    pub fn initialize_reference_scenario(&mut self) -> Result<()> {
        let mut information = MarketInformation::new();
        information.generate_reference_scenario();

        let participants = [
            ParticipantType::OrdinaryProsumer,
            ParticipantType::Rer,
            ParticipantType::Cer,
        ]
        .into_iter()
        .map(MarketParticipant::new)
        .collect();

        self.commit(information, participants)
    }

    /// Initializes the market from `config`, replacing any previous state.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::InvalidConfig`] with every validation error if
    /// `config` is invalid. On error the market is unchanged.
    #[instrument(
        skip_all,
        name = "Initializing the market…",
        fields(n_participants = config.participants.len()),
    )]
    pub fn initialize(&mut self, config: &ScenarioConfig) -> Result<()> {
        let errors = config.validate();
        if !errors.is_empty() {
            warn!(n_errors = errors.len(), "Rejected scenario configuration");
            return Err(MarketError::InvalidConfig(errors));
        }

        let mut information = MarketInformation::new()
            .with_price_inflex_demand(config.information.price_inflex_demand);
        information.generate(&config.time_axis)?;

        let participants = config
            .participants
            .iter()
            .map(|p| MarketParticipant::with_parameters(p.parameters()))
            .collect();

        self.commit(information, participants)
    }

    /// Generates predictions for `participants` against the finalized
    /// `information` and stores both only if every generation succeeds.
    fn commit(
        &mut self,
        information: MarketInformation,
        mut participants: Vec<MarketParticipant>,
    ) -> Result<()> {
        let num_interval = information.num_interval();
        for participant in &mut participants {
            participant.generate_reference_scenario(num_interval, &information)?;
        }
        self.information = information;
        self.participants = participants;
        info!(
            num_interval,
            n_participants = self.participants.len(),
            "Market initialized",
        );
        Ok(())
    }

    pub fn information(&self) -> &MarketInformation {
        &self.information
    }

    /// Participants in construction order.
    pub fn participants(&self) -> &[MarketParticipant] {
        &self.participants
    }

    pub fn participant(&self, index: usize) -> Option<&MarketParticipant> {
        self.participants.get(index)
    }

    /// Mutable access for a dispatch solver filling schedules.
    pub fn participant_mut(&mut self, index: usize) -> Option<&mut MarketParticipant> {
        self.participants.get_mut(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeAxisConfig;
    use crate::participant::PredictionSeries;

    #[test]
    fn new_market_is_empty() {
        let market = Market::new();
        assert!(market.participants().is_empty());
        assert!(!market.information().is_generated());
    }

    #[test]
    fn reference_scenario_order_and_types() {
        let mut market = Market::new();
        market
            .initialize_reference_scenario()
            .expect("reference scenario initializes");
        let types: Vec<_> = market
            .participants()
            .iter()
            .map(MarketParticipant::participant_type)
            .collect();
        assert_eq!(
            types,
            vec![
                ParticipantType::OrdinaryProsumer,
                ParticipantType::Rer,
                ParticipantType::Cer,
            ]
        );
        assert!(market.participants().iter().all(MarketParticipant::has_prediction));
    }

    #[test]
    fn reinitialization_replaces_participants() {
        let mut market = Market::new();
        market
            .initialize_reference_scenario()
            .expect("reference scenario initializes");
        market
            .initialize_reference_scenario()
            .expect("reference scenario initializes");
        assert_eq!(market.participants().len(), 3);
        assert_eq!(market.information().num_interval(), 35);
    }

    #[test]
    fn invalid_config_leaves_market_unchanged() {
        let mut market = Market::new();
        market
            .initialize_reference_scenario()
            .expect("reference scenario initializes");
        let before = market.clone();

        let mut cfg = ScenarioConfig::reference();
        cfg.time_axis = TimeAxisConfig {
            short_range_intervals: 0,
            long_range_intervals: 0,
            ..TimeAxisConfig::default()
        };
        let err = market.initialize(&cfg);
        assert!(matches!(err, Err(MarketError::InvalidConfig(_))));
        assert_eq!(market, before);
    }

    #[test]
    fn config_market_carries_information_parameters() {
        let mut cfg = ScenarioConfig::retail_only();
        cfg.information.price_inflex_demand = 1234.0;
        let market = Market::from_config(&cfg).expect("valid config");
        assert_eq!(market.information().price_inflex_demand(), 1234.0);
        assert_eq!(market.information().num_interval(), 24);
        let cer = market.participant(0).expect("cer exists");
        assert_eq!(
            cer.get_prediction_value(PredictionSeries::ConvGeneration, 23),
            Ok(1.0)
        );
        assert!(market.participant(2).is_none());
    }

    #[test]
    fn from_config_rejects_bad_efficiency() {
        let mut cfg = ScenarioConfig::reference();
        cfg.participants[0].bess.efficiency = -5.0;
        cfg.information.price_inflex_demand = f64::NAN;
        let Err(MarketError::InvalidConfig(errors)) = Market::from_config(&cfg) else {
            panic!("invalid config must be rejected");
        };
        assert_eq!(errors, cfg.validate());
        assert!(
            errors
                .iter()
                .any(|e| e.field == "participants[0].bess.efficiency")
        );
        assert!(
            errors
                .iter()
                .any(|e| e.field == "information.price_inflex_demand")
        );
    }

    #[test]
    fn from_config_rejects_oversized_axis_without_allocating() {
        let mut cfg = ScenarioConfig::reference();
        cfg.time_axis.short_range_intervals = 9_223_372_036_854_775_807;
        let err = Market::from_config(&cfg);
        assert!(matches!(err, Err(MarketError::InvalidConfig(_))));
    }

    #[test]
    fn failed_commit_keeps_information_and_participants_together() {
        let mut market = Market::from_config(&ScenarioConfig::retail_only()).expect("valid config");
        let before = market.clone();

        let err = market.commit(
            MarketInformation::new(),
            vec![MarketParticipant::new(ParticipantType::Cer)],
        );
        assert!(matches!(err, Err(MarketError::PreconditionViolation(_))));
        assert_eq!(market, before);
    }

    #[test]
    fn reference_scenario_replaces_configured_market_consistently() {
        let mut market = Market::from_config(&ScenarioConfig::retail_only()).expect("valid config");
        market
            .initialize_reference_scenario()
            .expect("reference scenario initializes");
        let n = market.information().num_interval();
        assert_eq!(n, 35);
        for p in market.participants() {
            for key in PredictionSeries::ALL {
                assert_eq!(p.get_prediction(key).len(), n);
            }
        }
    }
}
