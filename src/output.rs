//! Output formatting and persistence for calculation results.
//!
//! Supports pretty-printing, JSON to stdout, and a CSV trip log.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::carbon::CarbonCalculationResult;

/// One line of the trip log, summarizing a [`CarbonCalculationResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    pub timestamp: DateTime<Utc>,
    pub origin_lat: f64,
    pub origin_lng: f64,
    pub destination_lat: f64,
    pub destination_lng: f64,
    pub straight_line_km: f64,
    pub best_mode: Option<String>,
    pub best_eco_score: Option<u8>,
    pub best_co2_kg: Option<f64>,
    pub co2_saved_vs_car_kg: Option<f64>,
}

impl TripRecord {
    pub fn from_result(result: &CarbonCalculationResult) -> Self {
        let best = result.best_eco_option.as_ref();
        TripRecord {
            timestamp: result.generated_at,
            origin_lat: result.origin.lat,
            origin_lng: result.origin.lng,
            destination_lat: result.destination.lat,
            destination_lng: result.destination.lng,
            straight_line_km: result.straight_line_km,
            best_mode: best.map(|o| o.mode.clone()),
            best_eco_score: best.map(|o| o.eco_score),
            best_co2_kg: best.map(|o| o.co2_kg),
            co2_saved_vs_car_kg: result.carbon_savings.map(|s| s.vs_car_kg),
        }
    }
}

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Writes a value as pretty-printed JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// Appends a [`TripRecord`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, record: &TripRecord) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carbon::CarbonCalculator;
    use crate::co2::Co2FactorTable;
    use crate::distance::GeoPoint;
    use crate::modes::ModeCatalog;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample_result() -> CarbonCalculationResult {
        let catalog = ModeCatalog::builtin();
        let factors = Co2FactorTable::defaults(&catalog);
        CarbonCalculator::new(&catalog, &factors).calculate(
            GeoPoint::new(48.8566, 2.3522),
            GeoPoint::new(48.8606, 2.3376),
            Utc::now(),
        )
    }

    #[test]
    fn test_record_from_result() {
        let result = sample_result();
        let record = TripRecord::from_result(&result);

        assert_eq!(record.origin_lat, 48.8566);
        assert_eq!(record.best_mode.as_deref(), Some("walk"));
        assert_eq!(
            record.co2_saved_vs_car_kg,
            result.carbon_savings.map(|s| s.vs_car_kg)
        );
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&sample_result());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&sample_result()).unwrap();
    }

    #[test]
    fn test_append_record_creates_file() {
        let path = temp_path("ecotrajet_test_create.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        let record = TripRecord::from_result(&sample_result());
        append_record(&path, &record).unwrap();

        assert!(Path::new(&path).exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("walk"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let path = temp_path("ecotrajet_test_header.csv");
        let _ = fs::remove_file(&path);

        let record = TripRecord::from_result(&sample_result());
        append_record(&path, &record).unwrap();
        append_record(&path, &record).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.contains("timestamp")).count();
        assert_eq!(header_count, 1);
        // 1 header + 2 data rows
        assert_eq!(content.lines().count(), 3);

        fs::remove_file(&path).unwrap();
    }
}
