use anyhow::{Context, Result};
use serde::Deserialize;

use crate::co2::{AliasTable, ModeAlias};
use crate::modes::{ModeCatalog, TransportMode};

/// Catalog override loaded from disk.
///
/// Stored as JSON; `aliases` is optional and defaults to the builtin table:
/// ```json
/// {
///   "modes": [
///     { "key": "walk", "display_name": "Walk", "speed_kmh": 5.0,
///       "calories_per_km": 50.0, "cost_base_per_km": 0.0,
///       "comfort_factor": 0.7, "default_co2_kg_per_km": 0.0 }
///   ],
///   "aliases": [ { "language": "fr", "term": "marche", "key": "walk" } ]
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CatalogConfig {
    modes: Vec<TransportMode>,
    #[serde(default)]
    aliases: Option<Vec<ModeAlias>>,
}

impl CatalogConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("cannot read catalog '{path}'"))?;
        Self::from_json(&content).with_context(|| format!("invalid catalog '{path}'"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Validates and splits into the catalog and alias table.
    pub fn build(self) -> Result<(ModeCatalog, AliasTable)> {
        let catalog = ModeCatalog::new(self.modes)?;
        let aliases = match self.aliases {
            Some(aliases) => AliasTable::new(aliases)?,
            None => AliasTable::builtin(),
        };
        Ok((catalog, aliases))
    }
}

/// Builtin catalog and aliases, or the ones from `path` when given.
pub fn load_catalog(path: Option<&str>) -> Result<(ModeCatalog, AliasTable)> {
    match path {
        Some(path) => CatalogConfig::load(path)?.build(),
        None => Ok((ModeCatalog::builtin(), AliasTable::builtin())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRAM_CATALOG: &str = r#"{
        "modes": [
            { "key": "tram", "display_name": "Tram", "speed_kmh": 18.0,
              "calories_per_km": 5.0, "cost_base_per_km": 1.5,
              "comfort_factor": 0.7, "distance_multiplier": 1.15,
              "default_co2_kg_per_km": 0.004 },
            { "key": "walk", "display_name": "Walk", "speed_kmh": 5.0,
              "calories_per_km": 50.0, "cost_base_per_km": 0.0,
              "comfort_factor": 0.7, "default_co2_kg_per_km": 0.0 }
        ],
        "aliases": [ { "language": "fr", "term": "Tramway", "key": "tram" } ]
    }"#;

    #[test]
    fn test_builtin_when_no_path() {
        let (catalog, aliases) = load_catalog(None).unwrap();
        assert_eq!(catalog, ModeCatalog::builtin());
        assert_eq!(aliases, AliasTable::builtin());
    }

    #[test]
    fn test_parse_custom_catalog() {
        let (catalog, aliases) = CatalogConfig::from_json(TRAM_CATALOG)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("tram").unwrap().distance_multiplier, 1.15);
        // omitted multiplier defaults to a direct route
        assert_eq!(catalog.get("walk").unwrap().distance_multiplier, 1.0);
        assert_eq!(aliases.match_key("Tramway T3"), Some("tram"));
        assert_eq!(aliases.match_key("Voiture"), None);
    }

    #[test]
    fn test_invalid_mode_fails_at_load() {
        let json = TRAM_CATALOG.replace("\"speed_kmh\": 18.0", "\"speed_kmh\": 0.0");
        let err = CatalogConfig::from_json(&json).unwrap().build().unwrap_err();
        assert!(err.to_string().contains("tram"));
    }

    #[test]
    fn test_missing_file() {
        assert!(load_catalog(Some("/nonexistent/catalog.json")).is_err());
    }
}
