use anyhow::{Result, anyhow};
use chrono::Utc;
use ecotrajet::carbon::CarbonCalculator;
use ecotrajet::co2::{AliasTable, FactorCache, load_factors};
use ecotrajet::config::CatalogConfig;
use ecotrajet::distance::GeoPoint;
use ecotrajet::modes::ModeCatalog;
use ecotrajet::services::{Co2FactorSource, TransportModeRecord};

struct FrenchStore;

#[async_trait::async_trait]
impl Co2FactorSource for FrenchStore {
    async fn get_transport_modes(&self) -> Result<Vec<TransportModeRecord>> {
        Ok(vec![
            TransportModeRecord::new("Voiture thermique", 0.218),
            TransportModeRecord::new("Métro", 0.0025),
            TransportModeRecord::new("Bus", 0.104),
            TransportModeRecord::new("Vélo", 0.0),
            TransportModeRecord::new("Marche", 0.0),
            TransportModeRecord::new("Trottinette", 0.025),
        ])
    }
}

struct DownStore;

#[async_trait::async_trait]
impl Co2FactorSource for DownStore {
    async fn get_transport_modes(&self) -> Result<Vec<TransportModeRecord>> {
        Err(anyhow!("503 Service Unavailable"))
    }
}

const PARIS_CENTER: GeoPoint = GeoPoint {
    lat: 48.8566,
    lng: 2.3522,
};
const LOUVRE: GeoPoint = GeoPoint {
    lat: 48.8606,
    lng: 2.3376,
};

#[tokio::test]
async fn test_full_pipeline_with_remote_factors() {
    let catalog = ModeCatalog::builtin();
    let factors = load_factors(&FrenchStore, &catalog, &AliasTable::builtin()).await;

    assert_eq!(factors.factor("car"), Some(0.218));
    assert_eq!(factors.factor("metro"), Some(0.0025));
    // no remote e-bike row: default
    assert_eq!(factors.factor("ebike"), Some(0.01));
    assert_eq!(factors.extras().collect::<Vec<_>>(), vec![("Trottinette", 0.025)]);

    let result = CarbonCalculator::new(&catalog, &factors).calculate(PARIS_CENTER, LOUVRE, Utc::now());

    let car = result
        .transport_options
        .iter()
        .find(|o| o.mode == "car")
        .unwrap();
    let expected = result.straight_line_km * 1.1 * 0.218;
    assert!((car.co2_kg - expected).abs() < 0.001);

    assert!(
        result
            .transport_options
            .windows(2)
            .all(|w| w[0].eco_score >= w[1].eco_score)
    );
    assert!(result.carbon_savings.unwrap().vs_car_kg > 0.0);
}

#[tokio::test]
async fn test_source_outage_uses_defaults() {
    let catalog = ModeCatalog::builtin();
    let cache = FactorCache::new(load_factors(&FrenchStore, &catalog, &AliasTable::builtin()).await);
    assert_eq!(cache.snapshot().factor("car"), Some(0.218));

    let factors = cache.refresh(&DownStore, &catalog, &AliasTable::builtin()).await;
    assert_eq!(factors.factor("car"), Some(0.195));
    assert_eq!(factors.remote_count(), 0);

    let result = CarbonCalculator::new(&catalog, &factors).calculate(PARIS_CENTER, LOUVRE, Utc::now());
    assert_eq!(result.transport_options.len(), 6);
}

#[test]
fn test_result_json_shape() {
    let catalog = ModeCatalog::builtin();
    let factors = ecotrajet::co2::Co2FactorTable::defaults(&catalog);
    let result = CarbonCalculator::new(&catalog, &factors).calculate(PARIS_CENTER, LOUVRE, Utc::now());

    let json = serde_json::to_value(&result).unwrap();
    for key in [
        "origin",
        "destination",
        "transport_options",
        "best_eco_option",
        "carbon_savings",
        "recommendations",
        "generated_at",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert_eq!(json["origin"]["lat"], 48.8566);
    assert_eq!(json["transport_options"][0]["mode"], "walk");
    assert!(json["transport_options"][0]["route_details"]["estimated_time"].is_string());
}

#[test]
fn test_custom_catalog_without_car() {
    let config = CatalogConfig::from_json(
        r#"{ "modes": [
            { "key": "bike", "display_name": "Bike", "speed_kmh": 15.0,
              "calories_per_km": 40.0, "cost_base_per_km": 0.0,
              "comfort_factor": 0.8, "default_co2_kg_per_km": 0.0 },
            { "key": "tram", "display_name": "Tram", "speed_kmh": 18.0,
              "calories_per_km": 5.0, "cost_base_per_km": 1.5,
              "comfort_factor": 0.7, "distance_multiplier": 1.2,
              "default_co2_kg_per_km": 0.004 }
        ] }"#,
    )
    .unwrap();
    let (catalog, _aliases) = config.build().unwrap();
    let factors = ecotrajet::co2::Co2FactorTable::defaults(&catalog);
    let result = CarbonCalculator::new(&catalog, &factors).calculate(PARIS_CENTER, LOUVRE, Utc::now());

    assert_eq!(result.transport_options.len(), 2);
    assert!(result.carbon_savings.is_none());
    assert_eq!(result.best_eco_option.unwrap().mode, "bike");
}
