//! Bike-share station availability forecasting.
//!
//! [`AvailabilityForecaster`] is the seam a trained model plugs into. Until
//! one exists, [`TimeOfDayBaseline`] answers with a fixed daily profile:
//! rush hours are scarce, nights are quiet.

use chrono::{Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Longest horizon a forecast may cover, one week.
pub const MAX_HORIZON_HOURS: u32 = 168;
/// At or below this many bikes an hour is flagged as low availability.
pub const LOW_AVAILABILITY_BIKES: u32 = 3;

/// A bike-share station as the forecaster needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub code: String,
    pub name: String,
    /// Total docks; `0` when unknown.
    pub capacity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyPrediction {
    /// Offset from the forecast start, in hours.
    pub hour: u32,
    pub predicted_bikes: u32,
    pub predicted_docks: u32,
    pub confidence_bikes: f64,
    pub confidence_docks: f64,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationForecast {
    pub station_code: String,
    pub station_name: String,
    pub predictions: Vec<HourlyPrediction>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSummary {
    pub total_stations: usize,
    pub prediction_horizon: u32,
    pub high_risk_periods: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityForecast {
    pub stations: Vec<StationForecast>,
    pub summary: ForecastSummary,
}

/// Predicts hourly bike and dock availability for a station.
pub trait AvailabilityForecaster {
    /// One prediction per hour starting at `start` (station local time).
    fn predict(&self, station: &Station, horizon_hours: u32, start: NaiveDateTime) -> Vec<HourlyPrediction>;
}

/// Fixed daily profile; no learned parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeOfDayBaseline;

impl TimeOfDayBaseline {
    fn profile(hour_of_day: u32) -> (u32, u32, RiskLevel) {
        match hour_of_day {
            7..=9 | 17..=19 => (5, 10, RiskLevel::High),
            22..=23 | 0..=6 => (15, 13, RiskLevel::Low),
            _ => (10, 14, RiskLevel::Medium),
        }
    }
}

impl AvailabilityForecaster for TimeOfDayBaseline {
    fn predict(&self, station: &Station, horizon_hours: u32, start: NaiveDateTime) -> Vec<HourlyPrediction> {
        let horizon = horizon_hours.clamp(1, MAX_HORIZON_HOURS);

        (0..horizon)
            .map(|hour| {
                let at = start + Duration::hours(i64::from(hour));
                let (mut bikes, mut docks, risk_level) = Self::profile(at.hour());
                if station.capacity > 0 {
                    bikes = bikes.min(station.capacity);
                    docks = docks.min(station.capacity - bikes);
                }
                HourlyPrediction {
                    hour,
                    predicted_bikes: bikes,
                    predicted_docks: docks,
                    confidence_bikes: 0.85,
                    confidence_docks: 0.83,
                    risk_level,
                }
            })
            .collect()
    }
}

/// Advice for riders planning to use `station_name`.
pub fn station_recommendations(predictions: &[HourlyPrediction], station_name: &str) -> Vec<String> {
    let low_hours = predictions
        .iter()
        .filter(|p| p.predicted_bikes <= LOW_AVAILABILITY_BIKES)
        .count();
    let high_demand_hours = predictions
        .iter()
        .filter(|p| p.risk_level == RiskLevel::High)
        .count();

    let mut out = Vec::new();
    if low_hours > 0 {
        out.push(format!(
            "Low availability expected at {station_name} during {low_hours} hour(s)"
        ));
    }
    if high_demand_hours > 0 {
        out.push(format!(
            "High demand expected during {high_demand_hours} hour(s), consider alternatives"
        ));
    }
    if out.is_empty() {
        out.push(format!("Stable availability expected at {station_name}"));
    }
    out
}

/// Runs `forecaster` over every station and aggregates the result.
pub fn forecast_stations<F>(
    forecaster: &F,
    stations: &[Station],
    horizon_hours: u32,
    start: NaiveDateTime,
) -> AvailabilityForecast
where
    F: AvailabilityForecaster + ?Sized,
{
    let horizon = horizon_hours.clamp(1, MAX_HORIZON_HOURS);

    let stations: Vec<_> = stations
        .iter()
        .map(|station| {
            let predictions = forecaster.predict(station, horizon, start);
            let recommendations = station_recommendations(&predictions, &station.name);
            StationForecast {
                station_code: station.code.clone(),
                station_name: station.name.clone(),
                predictions,
                recommendations,
            }
        })
        .collect();

    let high_risk_periods = stations
        .iter()
        .flat_map(|s| &s.predictions)
        .filter(|p| p.risk_level == RiskLevel::High)
        .count();

    AvailabilityForecast {
        summary: ForecastSummary {
            total_stations: stations.len(),
            prediction_horizon: horizon,
            high_risk_periods,
        },
        stations,
    }
}
