use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A transport-mode row as stored remotely.
///
/// `name` is free text in whatever language the store was filled in, so it
/// has to be matched to a canonical key before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportModeRecord {
    pub name: String,
    pub co2_factor_per_km: Option<f64>,
}

impl TransportModeRecord {
    pub fn new(name: impl Into<String>, co2_factor_per_km: f64) -> Self {
        Self {
            name: name.into(),
            co2_factor_per_km: Some(co2_factor_per_km),
        }
    }
}

/// Abstraction over the store holding per-mode CO2 factors (e.g., Supabase).
#[async_trait::async_trait]
pub trait Co2FactorSource: Send + Sync {
    /// Returns every transport-mode record the store knows about.
    async fn get_transport_modes(&self) -> Result<Vec<TransportModeRecord>>;
}
