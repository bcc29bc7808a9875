//! Market-wide configuration and predicted series shared by all participants.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, instrument};

use crate::config::{MAX_INTERVALS, TimeAxisConfig};
use crate::error::{MarketError, Result};

/// Default price elasticity breakpoint of inflexible demand.
pub const DEFAULT_PRICE_INFLEX_DEMAND: f64 = 3000.0;

/// Scalar parameters stored by [`MarketInformation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InformationParameter {
    /// Number of intervals on the time axis.
    NumInterval,
    /// Price elasticity breakpoint of inflexible demand.
    PriceInflexDemand,
}

impl InformationParameter {
    pub const ALL: [Self; 2] = [Self::NumInterval, Self::PriceInflexDemand];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NumInterval => "num_interval",
            Self::PriceInflexDemand => "price_inflex_demand",
        }
    }
}

impl FromStr for InformationParameter {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| MarketError::unknown_key("market parameter", s))
    }
}

impl fmt::Display for InformationParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scalar parameter value: either an interval count or a real number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Count(usize),
    Value(f64),
}

impl Scalar {
    /// Returns the count, if this is a [`Scalar::Count`].
    pub fn as_count(self) -> Option<usize> {
        match self {
            Self::Count(n) => Some(n),
            Self::Value(_) => None,
        }
    }

    /// Returns the real value, if this is a [`Scalar::Value`].
    pub fn as_value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::Count(_) => None,
        }
    }
}

/// Market-wide predicted series, index-aligned to the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InformationSeries {
    /// Duration of each interval in hours.
    TimeLength,
    /// Electricity price per interval.
    ElectricityPrice,
}

impl InformationSeries {
    pub const ALL: [Self; 2] = [Self::TimeLength, Self::ElectricityPrice];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TimeLength => "time_length",
            Self::ElectricityPrice => "electricity_price",
        }
    }
}

impl FromStr for InformationSeries {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| MarketError::unknown_key("market prediction", s))
    }
}

impl fmt::Display for InformationSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The bundle of market-wide predictions produced by one generation step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InformationPrediction {
    /// Duration of each interval (hours).
    pub time_length: Vec<f64>,
    /// Electricity price of each interval.
    pub electricity_price: Vec<f64>,
}

impl InformationPrediction {
    /// Builds a two-resolution time axis with a constant price.
    ///
    /// The short-range block holds `short_range_intervals` intervals of
    /// `1 / short_range_intervals` hours each and is followed by
    /// `long_range_intervals` one-hour intervals.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::PreconditionViolation`] if the axis has no
    /// intervals, more than [`MAX_INTERVALS`], or a non-finite price.
    ///
    /// # Examples
    ///
    /// ```
    /// use lem_sim::config::TimeAxisConfig;
    /// use lem_sim::information::InformationPrediction;
    ///
    /// let prediction = InformationPrediction::generate(&TimeAxisConfig::default()).unwrap();
    /// assert_eq!(prediction.time_length.len(), 35);
    /// assert_eq!(prediction.electricity_price[0], 10.0);
    /// ```
    pub fn generate(axis: &TimeAxisConfig) -> Result<Self> {
        match axis.num_interval() {
            Some(0) => {
                return Err(MarketError::PreconditionViolation(
                    "time axis must contain at least one interval".to_string(),
                ));
            }
            Some(n) if n <= MAX_INTERVALS => {}
            _ => {
                return Err(MarketError::PreconditionViolation(format!(
                    "time axis must contain at most {MAX_INTERVALS} intervals"
                )));
            }
        }
        if !axis.electricity_price.is_finite() {
            return Err(MarketError::PreconditionViolation(format!(
                "electricity price must be finite, got {}",
                axis.electricity_price
            )));
        }
        Ok(Self::build(axis))
    }

    /// Builds the axis of an already checked `axis`.
    fn build(axis: &TimeAxisConfig) -> Self {
        let short = axis.short_range_intervals;
        let long = axis.long_range_intervals;

        let mut time_length = Vec::with_capacity(short + long);
        if short > 0 {
            let short_hours = 1.0 / short as f64;
            time_length.extend(std::iter::repeat_n(short_hours, short));
        }
        time_length.extend(std::iter::repeat_n(1.0, long));

        let electricity_price = vec![axis.electricity_price; time_length.len()];

        Self {
            time_length,
            electricity_price,
        }
    }

    /// Returns the series stored under `key`.
    pub fn series(&self, key: InformationSeries) -> &[f64] {
        match key {
            InformationSeries::TimeLength => &self.time_length,
            InformationSeries::ElectricityPrice => &self.electricity_price,
        }
    }
}

/// Global market configuration and market-wide predictions.
///
/// Constructed empty, then finalized once by [`MarketInformation::generate`]
/// (or [`MarketInformation::generate_reference_scenario`]). Participants only
/// ever borrow a finalized instance.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketInformation {
    num_interval: usize,
    price_inflex_demand: f64,
    prediction: InformationPrediction,
}

impl Default for MarketInformation {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketInformation {
    /// Creates market information with no time axis.
    pub fn new() -> Self {
        Self {
            num_interval: 0,
            price_inflex_demand: DEFAULT_PRICE_INFLEX_DEMAND,
            prediction: InformationPrediction::default(),
        }
    }

    /// Overrides the inflexible-demand price breakpoint.
    pub fn with_price_inflex_demand(mut self, price_inflex_demand: f64) -> Self {
        self.price_inflex_demand = price_inflex_demand;
        self
    }

    /// Returns the stored scalar parameter for `key`.
    ///
    /// String keys are parsed with [`str::parse`], which rejects anything
    /// outside the schema with [`MarketError::UnknownKey`].
    pub fn get_parameter(&self, key: InformationParameter) -> Scalar {
        match key {
            InformationParameter::NumInterval => Scalar::Count(self.num_interval),
            InformationParameter::PriceInflexDemand => Scalar::Value(self.price_inflex_demand),
        }
    }

    /// Returns the stored series for `key` (empty until generated).
    pub fn get_prediction(&self, key: InformationSeries) -> &[f64] {
        self.prediction.series(key)
    }

    pub fn num_interval(&self) -> usize {
        self.num_interval
    }

    pub fn price_inflex_demand(&self) -> f64 {
        self.price_inflex_demand
    }

    pub fn time_length(&self) -> &[f64] {
        &self.prediction.time_length
    }

    pub fn electricity_price(&self) -> &[f64] {
        &self.prediction.electricity_price
    }

    /// Whether the time axis has been populated.
    pub fn is_generated(&self) -> bool {
        self.num_interval > 0 && self.prediction.time_length.len() == self.num_interval
    }

    /// Fixes the time axis and price series from `axis`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::PreconditionViolation`] if the axis has no
    /// intervals, more than [`MAX_INTERVALS`], or a non-finite price. The
    /// existing state is kept.
    #[instrument(
        skip_all,
        name = "Generating market information…",
        fields(
            short = axis.short_range_intervals,
            long = axis.long_range_intervals,
        ),
    )]
    pub fn generate(&mut self, axis: &TimeAxisConfig) -> Result<()> {
        let prediction = InformationPrediction::generate(axis)?;
        self.apply(prediction);
        Ok(())
    }

    /// Generates the reference scenario: 12 five-minute intervals followed by
    /// 23 one-hour intervals at a constant price of 10.
    pub fn generate_reference_scenario(&mut self) {
        self.apply(InformationPrediction::build(&TimeAxisConfig::default()));
    }

    fn apply(&mut self, prediction: InformationPrediction) {
        self.num_interval = prediction.time_length.len();
        debug!(
            num_interval = self.num_interval,
            horizon_hours = prediction.time_length.iter().sum::<f64>(),
            "Time axis fixed",
        );
        self.prediction = prediction;
    }
}
