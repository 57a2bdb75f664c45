//! Data types produced by the carbon calculator.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::distance::GeoPoint;

/// Raw intermediate values behind a [`TransportOption`], kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteDetails {
    pub actual_distance_km: f64,
    /// Human-readable duration, e.g. `"15min"`.
    pub estimated_time: String,
    pub co2_factor_per_km: f64,
    pub comfort_level: f64,
}

/// One way of making the trip, with its costs and benefits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportOption {
    /// Canonical mode key.
    pub mode: String,
    pub display_name: String,
    pub distance_km: f64,
    pub duration_minutes: u32,
    pub co2_kg: f64,
    pub calories_burned: u32,
    pub cost_euros: f64,
    pub eco_score: u8,
    pub route_details: RouteDetails,
}

/// CO2 avoided by taking the best option instead of the car.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CarbonSavings {
    pub vs_car_kg: f64,
    pub vs_car_percent: f64,
    pub trees_equivalent: f64,
}

/// Complete answer for one origin/destination pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarbonCalculationResult {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    pub straight_line_km: f64,
    /// Sorted by descending eco-score.
    pub transport_options: Vec<TransportOption>,
    pub best_eco_option: Option<TransportOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbon_savings: Option<CarbonSavings>,
    pub recommendations: Vec<String>,
    pub generated_at: DateTime<Utc>,
}
