use anyhow::Result;

use crate::forecast::Station;

/// Abstraction over a bike-share station registry.
#[async_trait::async_trait]
pub trait StationDirectory: Send + Sync {
    /// Returns the stations whose code is in `codes`, or every station when
    /// `codes` is empty.
    async fn list_stations(&self, codes: &[String]) -> Result<Vec<Station>>;
}
