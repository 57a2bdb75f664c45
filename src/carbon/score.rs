/// Weight of the CO2 term in the eco-score.
pub const CO2_WEIGHT: f64 = 0.4;
/// Weight of the calorie (health) term.
pub const HEALTH_WEIGHT: f64 = 0.3;
/// Weight of the monetary cost term.
pub const COST_WEIGHT: f64 = 0.2;
/// Weight of the comfort term.
pub const COMFORT_WEIGHT: f64 = 0.1;

/// Combines a trip's CO2, calories, cost and comfort into a score in `0..=100`.
///
/// | term    | raw                  | weight |
/// |---------|----------------------|--------|
/// | CO2     | `100 - co2_kg * 500` | 40 %   |
/// | health  | `calories / 2`       | 30 %   |
/// | cost    | `100 - euros * 20`   | 20 %   |
/// | comfort | `comfort * 100`      | 10 %   |
///
/// Each term is clamped to `[0, 100]` before weighting so one extreme
/// dimension cannot drag the others down.
pub fn eco_score(co2_kg: f64, calories_burned: u32, cost_euros: f64, comfort_factor: f64) -> u8 {
    let co2_score = clamp_pct(100.0 - co2_kg * 500.0);
    let health_score = clamp_pct(f64::from(calories_burned) / 2.0);
    let cost_score = clamp_pct(100.0 - cost_euros * 20.0);
    let comfort_score = clamp_pct(comfort_factor * 100.0);

    let score = co2_score * CO2_WEIGHT
        + health_score * HEALTH_WEIGHT
        + cost_score * COST_WEIGHT
        + comfort_score * COMFORT_WEIGHT;

    clamp_pct(score).floor() as u8
}

fn clamp_pct(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) }
}
