//! CO2 emission factors per transport mode.
//!
//! Factors come preferentially from a [`Co2FactorSource`]. Remote records are
//! free-text named, so they are mapped onto catalog keys through an
//! [`AliasTable`]; any catalog key left unmatched falls back to the mode's
//! `default_co2_kg_per_km`.

use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

use crate::modes::ModeCatalog;
use crate::services::{Co2FactorSource, TransportModeRecord};

/// Maps a lowercase search term found in a remote mode name to a canonical key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeAlias {
    pub language: String,
    pub term: String,
    pub key: String,
}

/// Ordered list of [`ModeAlias`]es. The first alias whose term is contained in
/// a name wins, so more specific terms must come first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    aliases: Vec<ModeAlias>,
}

impl AliasTable {
    pub fn new(aliases: Vec<ModeAlias>) -> Result<Self> {
        let aliases = aliases
            .into_iter()
            .map(|a| {
                ensure!(
                    !a.term.trim().is_empty(),
                    "alias for '{}' has an empty term",
                    a.key
                );
                Ok(ModeAlias {
                    term: a.term.to_lowercase(),
                    ..a
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { aliases })
    }

    /// English and French names for the builtin modes.
    pub fn builtin() -> Self {
        let aliases = [
            ("en", "bike", "bike"),
            ("fr", "velo", "bike"),
            ("fr", "vélo", "bike"),
            ("en", "metro", "metro"),
            ("fr", "métro", "metro"),
            ("en", "subway", "metro"),
            ("fr", "bus", "bus"),
            ("en", "car", "car"),
            ("fr", "voiture", "car"),
            ("en", "walk", "walk"),
            ("fr", "marche", "walk"),
        ]
        .into_iter()
        .map(|(language, term, key)| ModeAlias {
            language: language.to_string(),
            term: term.to_string(),
            key: key.to_string(),
        })
        .collect();

        Self { aliases }
    }

    /// Returns the canonical key `name` refers to, if any alias matches.
    pub fn match_key(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.aliases
            .iter()
            .find(|a| name.contains(a.term.as_str()))
            .map(|a| a.key.as_str())
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Where a resolved factor came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorOrigin {
    Remote,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedFactor {
    pub kg_per_km: f64,
    pub origin: FactorOrigin,
}

/// kg CO2 per km for every key of the catalog it was resolved against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Co2FactorTable {
    factors: BTreeMap<String, ResolvedFactor>,
    /// Remote records that matched no catalog key, by raw name.
    extras: BTreeMap<String, f64>,
}

impl Co2FactorTable {
    /// Every catalog mode at its default factor.
    pub fn defaults(catalog: &ModeCatalog) -> Self {
        Self::resolve(&[], catalog, &AliasTable::builtin())
    }

    pub fn resolve(
        records: &[TransportModeRecord],
        catalog: &ModeCatalog,
        aliases: &AliasTable,
    ) -> Self {
        let mut factors = BTreeMap::new();
        let mut extras = BTreeMap::new();

        for record in records {
            let kg_per_km = match record.co2_factor_per_km {
                Some(f) if f.is_finite() && f >= 0.0 => f,
                other => {
                    warn!(name = %record.name, factor = ?other, "Skipping transport mode with unusable CO2 factor");
                    continue;
                }
            };

            match aliases
                .match_key(&record.name)
                .filter(|key| catalog.get(key).is_some())
            {
                Some(key) => {
                    if factors.contains_key(key) {
                        debug!(name = %record.name, key, "Key already resolved, ignoring record");
                        continue;
                    }
                    factors.insert(
                        key.to_string(),
                        ResolvedFactor {
                            kg_per_km,
                            origin: FactorOrigin::Remote,
                        },
                    );
                }
                None => {
                    extras.entry(record.name.clone()).or_insert(kg_per_km);
                }
            }
        }

        for mode in catalog.iter() {
            factors
                .entry(mode.key.clone())
                .or_insert(ResolvedFactor {
                    kg_per_km: mode.default_co2_kg_per_km,
                    origin: FactorOrigin::Default,
                });
        }

        Self { factors, extras }
    }

    /// kg CO2 per km for `key`.
    pub fn factor(&self, key: &str) -> Option<f64> {
        self.factors.get(key).map(|f| f.kg_per_km)
    }

    pub fn get(&self, key: &str) -> Option<&ResolvedFactor> {
        self.factors.get(key)
    }

    pub fn extras(&self) -> impl Iterator<Item = (&str, f64)> {
        self.extras.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn remote_count(&self) -> usize {
        self.factors
            .values()
            .filter(|f| f.origin == FactorOrigin::Remote)
            .count()
    }
}

/// Fetches records from `source` and resolves them against `catalog`.
///
/// A failing source is logged and treated as empty, so the result always
/// holds the catalog defaults at worst.
#[tracing::instrument(skip_all, fields(modes = catalog.len()))]
pub async fn load_factors<S>(source: &S, catalog: &ModeCatalog, aliases: &AliasTable) -> Co2FactorTable
where
    S: Co2FactorSource + ?Sized,
{
    let records = match source.get_transport_modes().await {
        Ok(records) => records,
        Err(e) => {
            warn!(error = %e, "CO2 factor source failed, falling back to defaults");
            Vec::new()
        }
    };

    let table = Co2FactorTable::resolve(&records, catalog, aliases);
    info!(
        records = records.len(),
        remote = table.remote_count(),
        extras = table.extras.len(),
        "CO2 factors resolved"
    );
    table
}

/// Holds the current [`Co2FactorTable`] for concurrent readers.
///
/// Readers take an `Arc` snapshot; a refresh builds a full table and swaps
/// the pointer, so no reader ever sees a half-updated table.
#[derive(Debug)]
pub struct FactorCache {
    current: RwLock<Arc<Co2FactorTable>>,
}

impl FactorCache {
    pub fn new(table: Co2FactorTable) -> Self {
        Self {
            current: RwLock::new(Arc::new(table)),
        }
    }

    pub fn snapshot(&self) -> Arc<Co2FactorTable> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn replace(&self, table: Co2FactorTable) {
        let table = Arc::new(table);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = table;
    }

    /// Reloads from `source` and swaps the result in.
    pub async fn refresh<S>(
        &self,
        source: &S,
        catalog: &ModeCatalog,
        aliases: &AliasTable,
    ) -> Arc<Co2FactorTable>
    where
        S: Co2FactorSource + ?Sized,
    {
        let table = load_factors(source, catalog, aliases).await;
        self.replace(table);
        self.snapshot()
    }
}
