use std::cmp::Ordering;

use crate::carbon::savings::car_option;
use crate::carbon::types::TransportOption;

/// Calories above which an option counts as physically active.
pub const ACTIVE_CALORIES_THRESHOLD: u32 = 50;
/// Costs below this are presented as free.
pub const FREE_COST_THRESHOLD_EUROS: f64 = 1.0;

pub const NO_OPTIONS_MESSAGE: &str = "No transport options available";

/// Human-readable advice derived from ranked options, best option first.
pub fn recommendations(options: &[TransportOption]) -> Vec<String> {
    let Some(best) = options.first() else {
        return vec![NO_OPTIONS_MESSAGE.to_string()];
    };

    let mut out = vec![format!(
        "Best eco choice: {} (eco-score {}/100)",
        best.display_name, best.eco_score
    )];

    if let Some(car) = car_option(options).filter(|car| car.mode != best.mode) {
        out.push(format!(
            "Save {:.2} kg of CO2 compared to the car",
            car.co2_kg - best.co2_kg
        ));
    }

    // max_by_key keeps the last maximum; reverse so the best-ranked wins ties
    if let Some(active) = options
        .iter()
        .rev()
        .filter(|o| o.calories_burned > ACTIVE_CALORIES_THRESHOLD)
        .max_by_key(|o| o.calories_burned)
    {
        out.push(format!(
            "Most active option: {} ({} calories)",
            active.display_name, active.calories_burned
        ));
    }

    if let Some(cheapest) = options.iter().min_by(|a, b| {
        a.cost_euros
            .partial_cmp(&b.cost_euros)
            .unwrap_or(Ordering::Equal)
    }) {
        if cheapest.cost_euros < FREE_COST_THRESHOLD_EUROS {
            out.push(format!("Free option: {}", cheapest.display_name));
        } else {
            out.push(format!(
                "Cheapest option: {} ({:.2} €)",
                cheapest.display_name, cheapest.cost_euros
            ));
        }
    }

    out
}
