//! Error taxonomy shared by market information, participants, and the market.

use crate::config::ConfigError;

/// Errors raised by lookups and prediction generation.
///
/// Every variant is detected at the point of violation and returned to the
/// caller; nothing in the crate recovers from them silently.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MarketError {
    /// A parameter, prediction, or enumeration key outside the known schema.
    #[error("unknown {kind} key \"{key}\"")]
    UnknownKey {
        /// What kind of key was looked up (e.g. `"participant prediction"`).
        kind: &'static str,
        /// The offending key as given by the caller.
        key: String,
    },

    /// Generation invoked before its inputs were ready or with inconsistent inputs.
    #[error("precondition violated: {0}")]
    PreconditionViolation(String),

    /// A scenario configuration rejected by [`crate::config::ScenarioConfig::validate`].
    #[error(
        "invalid scenario configuration: {}",
        .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
    )]
    InvalidConfig(Vec<ConfigError>),

    /// Series access past the end of the series, or against an empty series.
    #[error("tick {tick} out of range for series \"{series}\" of length {len}")]
    IndexOutOfRange {
        /// Series name.
        series: &'static str,
        /// Requested index.
        tick: usize,
        /// Current length of the series.
        len: usize,
    },
}

impl MarketError {
    pub(crate) fn unknown_key(kind: &'static str, key: impl Into<String>) -> Self {
        Self::UnknownKey {
            kind,
            key: key.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MarketError>;
