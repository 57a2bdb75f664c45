use std::cmp::Ordering;

use crate::carbon::score::eco_score;
use crate::carbon::types::{RouteDetails, TransportOption};
use crate::co2::Co2FactorTable;
use crate::modes::{ModeCatalog, TransportMode};

/// Builds one option per catalog mode for a trip of `straight_line_km`,
/// ranked with [`rank`].
pub fn synthesize(
    straight_line_km: f64,
    catalog: &ModeCatalog,
    factors: &Co2FactorTable,
) -> Vec<TransportOption> {
    let mut options: Vec<_> = catalog
        .iter()
        .map(|mode| option_for(mode, straight_line_km, factors))
        .collect();
    rank(&mut options);
    options
}

fn option_for(mode: &TransportMode, straight_line_km: f64, factors: &Co2FactorTable) -> TransportOption {
    let co2_factor = factors
        .factor(&mode.key)
        .unwrap_or(mode.default_co2_kg_per_km);

    let actual_distance = straight_line_km * mode.distance_multiplier;
    let duration_minutes = (actual_distance / mode.speed_kmh * 60.0).floor() as u32;
    let co2_kg = actual_distance * co2_factor;
    let calories_burned = (actual_distance * mode.calories_per_km).floor() as u32;
    let cost_euros = actual_distance * mode.cost_base_per_km;

    let eco_score = eco_score(co2_kg, calories_burned, cost_euros, mode.comfort_factor);

    TransportOption {
        mode: mode.key.clone(),
        display_name: mode.display_name.clone(),
        distance_km: round_to(actual_distance, 2),
        duration_minutes,
        co2_kg: round_to(co2_kg, 3),
        calories_burned,
        cost_euros: round_to(cost_euros, 2),
        eco_score,
        route_details: RouteDetails {
            actual_distance_km: round_to(actual_distance, 2),
            estimated_time: format!("{duration_minutes}min"),
            co2_factor_per_km: co2_factor,
            comfort_level: mode.comfort_factor,
        },
    }
}

/// Sorts by eco-score descending, then CO2 ascending, then cost ascending.
/// The sort is stable, so remaining ties keep catalog order.
pub fn rank(options: &mut [TransportOption]) {
    options.sort_by(|a, b| {
        b.eco_score
            .cmp(&a.eco_score)
            .then_with(|| a.co2_kg.partial_cmp(&b.co2_kg).unwrap_or(Ordering::Equal))
            .then_with(|| a.cost_euros.partial_cmp(&b.cost_euros).unwrap_or(Ordering::Equal))
    });
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
