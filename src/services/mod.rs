//! Traits for the remote data sources the calculator and forecaster read from.
//!
//! [`Co2FactorSource`] yields transport-mode records carrying CO2 factors.
//! [`StationDirectory`] yields bike-share station metadata.

mod stations;
mod transport_modes;

pub use stations::StationDirectory;
pub use transport_modes::{Co2FactorSource, TransportModeRecord};
