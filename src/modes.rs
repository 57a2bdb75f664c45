//! The transport-mode catalog: physical and cost characteristics per mode.

use anyhow::{Result, bail, ensure};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Static characteristics of a single transport mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportMode {
    /// Canonical key, e.g. `"bike"`. Unique within a catalog.
    pub key: String,
    pub display_name: String,
    pub speed_kmh: f64,
    pub calories_per_km: f64,
    pub cost_base_per_km: f64,
    /// Normalized comfort in `[0, 1]`.
    pub comfort_factor: f64,
    /// Route indirection relative to the straight line.
    #[serde(default = "default_distance_multiplier")]
    pub distance_multiplier: f64,
    /// kg CO2 per km used when no external factor matches this mode.
    pub default_co2_kg_per_km: f64,
}

fn default_distance_multiplier() -> f64 {
    1.0
}

impl TransportMode {
    fn validate(&self) -> Result<()> {
        let key = &self.key;
        ensure!(!key.trim().is_empty(), "transport mode key must not be empty");

        for (field, value) in [
            ("speed_kmh", self.speed_kmh),
            ("calories_per_km", self.calories_per_km),
            ("cost_base_per_km", self.cost_base_per_km),
            ("comfort_factor", self.comfort_factor),
            ("distance_multiplier", self.distance_multiplier),
            ("default_co2_kg_per_km", self.default_co2_kg_per_km),
        ] {
            ensure!(value.is_finite(), "mode '{key}': {field} is not finite");
        }

        ensure!(
            self.speed_kmh > 0.0,
            "mode '{key}': speed_kmh must be > 0 (got {})",
            self.speed_kmh
        );
        ensure!(
            self.calories_per_km >= 0.0,
            "mode '{key}': calories_per_km must be >= 0"
        );
        ensure!(
            self.cost_base_per_km >= 0.0,
            "mode '{key}': cost_base_per_km must be >= 0"
        );
        ensure!(
            (0.0..=1.0).contains(&self.comfort_factor),
            "mode '{key}': comfort_factor must be within [0, 1] (got {})",
            self.comfort_factor
        );
        ensure!(
            self.distance_multiplier > 0.0,
            "mode '{key}': distance_multiplier must be > 0"
        );
        ensure!(
            self.default_co2_kg_per_km >= 0.0,
            "mode '{key}': default_co2_kg_per_km must be >= 0"
        );
        Ok(())
    }
}

/// A validated, ordered set of transport modes.
///
/// Construction is the only place the catalog invariants are checked, so a
/// `ModeCatalog` in hand always has strictly positive speeds, non-negative
/// rates and comfort within `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeCatalog {
    modes: Vec<TransportMode>,
}

impl ModeCatalog {
    pub fn new(modes: Vec<TransportMode>) -> Result<Self> {
        let mut seen = HashSet::new();
        for mode in &modes {
            mode.validate()?;
            if !seen.insert(mode.key.as_str()) {
                bail!("duplicate transport mode key '{}'", mode.key);
            }
        }
        Ok(Self { modes })
    }

    /// Walk, bike, e-bike, metro, bus and car, with urban averages.
    pub fn builtin() -> Self {
        #[allow(clippy::too_many_arguments)]
        fn mode(
            key: &str,
            display_name: &str,
            speed_kmh: f64,
            calories_per_km: f64,
            cost_base_per_km: f64,
            comfort_factor: f64,
            distance_multiplier: f64,
            default_co2_kg_per_km: f64,
        ) -> TransportMode {
            TransportMode {
                key: key.to_string(),
                display_name: display_name.to_string(),
                speed_kmh,
                calories_per_km,
                cost_base_per_km,
                comfort_factor,
                distance_multiplier,
                default_co2_kg_per_km,
            }
        }

        Self {
            modes: vec![
                mode("walk", "Walk", 5.0, 50.0, 0.0, 0.7, 1.0, 0.0),
                mode("bike", "Bike", 15.0, 40.0, 0.0, 0.8, 1.0, 0.0),
                // electricity only
                mode("ebike", "E-bike", 25.0, 25.0, 0.1, 0.9, 1.0, 0.01),
                // transit lines rarely follow the straight line
                mode("metro", "Metro", 30.0, 5.0, 1.9, 0.6, 1.2, 0.05),
                mode("bus", "Bus", 20.0, 5.0, 1.9, 0.5, 1.2, 0.08),
                // city average speed, fuel plus wear
                mode("car", "Car", 25.0, 0.0, 0.5, 0.9, 1.1, 0.195),
            ],
        }
    }

    pub fn empty() -> Self {
        Self { modes: Vec::new() }
    }

    pub fn get(&self, key: &str) -> Option<&TransportMode> {
        self.modes.iter().find(|m| m.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransportMode> {
        self.modes.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.modes.iter().map(|m| m.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}

impl Default for ModeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk() -> TransportMode {
        ModeCatalog::builtin().get("walk").unwrap().clone()
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        let builtin = ModeCatalog::builtin();
        let rebuilt = ModeCatalog::new(builtin.iter().cloned().collect()).unwrap();
        assert_eq!(rebuilt, builtin);
        assert_eq!(
            builtin.keys().collect::<Vec<_>>(),
            vec!["walk", "bike", "ebike", "metro", "bus", "car"]
        );
    }

    #[test]
    fn test_builtin_multipliers() {
        let catalog = ModeCatalog::builtin();
        assert_eq!(catalog.get("metro").unwrap().distance_multiplier, 1.2);
        assert_eq!(catalog.get("bus").unwrap().distance_multiplier, 1.2);
        assert_eq!(catalog.get("car").unwrap().distance_multiplier, 1.1);
        assert_eq!(catalog.get("bike").unwrap().distance_multiplier, 1.0);
    }

    #[test]
    fn test_rejects_zero_speed() {
        let mut mode = walk();
        mode.speed_kmh = 0.0;
        let err = ModeCatalog::new(vec![mode]).unwrap_err();
        assert!(err.to_string().contains("speed_kmh"));
    }

    #[test]
    fn test_rejects_comfort_out_of_range() {
        let mut mode = walk();
        mode.comfort_factor = 1.5;
        assert!(ModeCatalog::new(vec![mode]).is_err());
    }

    #[test]
    fn test_rejects_negative_cost() {
        let mut mode = walk();
        mode.cost_base_per_km = -0.1;
        assert!(ModeCatalog::new(vec![mode]).is_err());
    }

    #[test]
    fn test_rejects_nan() {
        let mut mode = walk();
        mode.calories_per_km = f64::NAN;
        assert!(ModeCatalog::new(vec![mode]).is_err());
    }

    #[test]
    fn test_rejects_duplicate_keys() {
        let err = ModeCatalog::new(vec![walk(), walk()]).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_empty_catalog_is_allowed() {
        assert!(ModeCatalog::new(Vec::new()).unwrap().is_empty());
    }
}
