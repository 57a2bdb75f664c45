//! Carbon-footprint comparison of transport options.
//!
//! Given an origin and a destination, [`CarbonCalculator`] derives the
//! straight-line distance, synthesizes one option per catalog mode, scores
//! and ranks them, and summarizes savings and advice. The calculator only
//! borrows an immutable catalog and factor table, so a computation is pure.

pub mod options;
pub mod recommend;
pub mod savings;
pub mod score;
pub mod types;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::co2::Co2FactorTable;
use crate::distance::{GeoPoint, haversine_km};
use crate::modes::ModeCatalog;

pub use types::{CarbonCalculationResult, CarbonSavings, RouteDetails, TransportOption};

/// A calculation bound to one snapshot of the catalog and CO2 factors.
#[derive(Debug, Clone, Copy)]
pub struct CarbonCalculator<'a> {
    catalog: &'a ModeCatalog,
    factors: &'a Co2FactorTable,
}

impl<'a> CarbonCalculator<'a> {
    pub fn new(catalog: &'a ModeCatalog, factors: &'a Co2FactorTable) -> Self {
        Self { catalog, factors }
    }

    /// Ranked options only, without the summary.
    pub fn route_options(&self, origin: &GeoPoint, destination: &GeoPoint) -> Vec<TransportOption> {
        options::synthesize(haversine_km(origin, destination), self.catalog, self.factors)
    }

    /// Full comparison. `generated_at` is stamped on the result as-is.
    pub fn calculate(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        generated_at: DateTime<Utc>,
    ) -> CarbonCalculationResult {
        let straight_line_km = haversine_km(&origin, &destination);
        let transport_options = options::synthesize(straight_line_km, self.catalog, self.factors);

        let best_eco_option = transport_options.first().cloned();
        let carbon_savings = best_eco_option
            .as_ref()
            .and_then(|best| savings::carbon_savings(best, &transport_options));
        let recommendations = recommend::recommendations(&transport_options);

        debug!(
            %origin,
            %destination,
            straight_line_km,
            options = transport_options.len(),
            best = best_eco_option.as_ref().map(|o| o.mode.as_str()),
            "Carbon calculation done"
        );

        CarbonCalculationResult {
            origin,
            destination,
            straight_line_km: options::round_to(straight_line_km, 3),
            transport_options,
            best_eco_option,
            carbon_savings,
            recommendations,
            generated_at,
        }
    }
}
