//! Shared test fixtures for integration tests.

use lem_sim::Market;
use lem_sim::information::MarketInformation;

/// Tolerance for comparing derived energy values.
pub const EPS: f64 = 1e-12;

/// Market initialized with the reference scenario.
pub fn reference_market() -> Market {
    let mut market = Market::new();
    market
        .initialize_reference_scenario()
        .expect("reference scenario should initialize");
    market
}

/// Market information with the reference time axis.
pub fn reference_information() -> MarketInformation {
    let mut info = MarketInformation::new();
    info.generate_reference_scenario();
    info
}

/// Routes `tracing` output through the test harness writer.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
