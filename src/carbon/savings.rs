use crate::carbon::options::round_to;
use crate::carbon::types::{CarbonSavings, TransportOption};

/// kg of CO2 a mature tree absorbs in a year.
pub const KG_CO2_PER_TREE_YEAR: f64 = 21.77;

/// The driving baseline: the first ranked option whose key contains "car".
pub fn car_option(options: &[TransportOption]) -> Option<&TransportOption> {
    options
        .iter()
        .find(|o| o.mode.to_lowercase().contains("car"))
}

/// Savings of `best` over the car baseline.
///
/// `None` when there is no car option or when the car is itself the best.
pub fn carbon_savings(best: &TransportOption, options: &[TransportOption]) -> Option<CarbonSavings> {
    let car = car_option(options)?;
    if car.mode == best.mode {
        return None;
    }

    let vs_car_kg = car.co2_kg - best.co2_kg;
    let vs_car_percent = if car.co2_kg > 0.0 {
        vs_car_kg / car.co2_kg * 100.0
    } else {
        0.0
    };

    Some(CarbonSavings {
        vs_car_kg: round_to(vs_car_kg, 3),
        vs_car_percent: round_to(vs_car_percent, 1),
        trees_equivalent: round_to(vs_car_kg / KG_CO2_PER_TREE_YEAR, 2),
    })
}
