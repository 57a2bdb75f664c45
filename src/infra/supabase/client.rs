use anyhow::{Context, Result};
use async_trait::async_trait;
use ecotrajet::fetch::auth::ApiKey;
use ecotrajet::fetch::{BasicClient, HttpClient, fetch_json};
use ecotrajet::forecast::Station;
use ecotrajet::services::{Co2FactorSource, StationDirectory, TransportModeRecord};
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

type AuthedClient = ApiKey<ApiKey<BasicClient>>;

pub struct SupabaseClient<C = AuthedClient> {
    base_url: String,
    http: C,
}

impl SupabaseClient {
    /// Client authenticated with the project's anon key, sent both as the
    /// `apikey` header and as a bearer token.
    pub fn new(base_url: &str, anon_key: &str) -> Result<Self> {
        let basic = BasicClient::with_timeouts(Duration::from_secs(30), Duration::from_secs(10))?;
        let http = ApiKey::bearer(ApiKey::new(basic, "apikey", anon_key)?, anon_key)?;
        Ok(Self::with_client(base_url, http))
    }

    /// Reads `SUPABASE_URL` and `SUPABASE_ANON_KEY`; `None` if either is unset.
    pub fn from_env() -> Result<Option<Self>> {
        match (
            std::env::var("SUPABASE_URL").ok(),
            std::env::var("SUPABASE_ANON_KEY").ok(),
        ) {
            (Some(url), Some(key)) => Ok(Some(Self::new(&url, &key)?)),
            _ => Ok(None),
        }
    }
}

impl<C: HttpClient> SupabaseClient<C> {
    pub fn with_client(base_url: &str, http: C) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    fn table_url(&self, table: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/rest/v1/{}", self.base_url, table))
            .with_context(|| format!("invalid Supabase URL '{}'", self.base_url))?;
        url.query_pairs_mut().extend_pairs(params);
        Ok(url)
    }

    async fn select(&self, table: &str, params: &[(&str, &str)]) -> Result<Vec<Value>> {
        let url = self.table_url(table, params)?;
        let rows: Vec<Value> = fetch_json(&self.http, url.as_str())
            .await
            .with_context(|| format!("failed to load '{table}'"))?;
        debug!(table, rows = rows.len(), "Supabase rows fetched");
        Ok(rows)
    }
}

#[async_trait]
impl<C: HttpClient> Co2FactorSource for SupabaseClient<C> {
    #[tracing::instrument(skip(self))]
    async fn get_transport_modes(&self) -> Result<Vec<TransportModeRecord>> {
        let rows = self
            .select("transport_modes", &[("select", "name,co2_factor_per_km")])
            .await?;
        Ok(parse_transport_modes(rows))
    }
}

#[async_trait]
impl<C: HttpClient> StationDirectory for SupabaseClient<C> {
    #[tracing::instrument(skip(self), fields(requested = codes.len()))]
    async fn list_stations(&self, codes: &[String]) -> Result<Vec<Station>> {
        let filter = format!("in.({})", codes.join(","));
        let mut params = vec![("select", "stationcode,name,capacity")];
        if !codes.is_empty() {
            params.push(("stationcode", filter.as_str()));
        }
        let rows = self.select("velib_stations", &params).await?;
        Ok(parse_stations(rows))
    }
}

/// Rows without a name are dropped; a missing factor is kept as `None`.
fn parse_transport_modes(rows: Vec<Value>) -> Vec<TransportModeRecord> {
    rows.into_iter()
        .filter_map(|row| {
            let name = row["name"].as_str()?.trim().to_string();
            if name.is_empty() {
                return None;
            }
            let co2_factor_per_km = number(&row["co2_factor_per_km"]);
            Some(TransportModeRecord {
                name,
                co2_factor_per_km,
            })
        })
        .collect()
}

/// Rows without a station code are dropped.
fn parse_stations(rows: Vec<Value>) -> Vec<Station> {
    rows.into_iter()
        .filter_map(|row| {
            let code = match &row["stationcode"] {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => return None,
            };
            let name = row["name"].as_str().unwrap_or(&code).to_string();
            let capacity = number(&row["capacity"])
                .filter(|c| *c >= 0.0)
                .map(|c| c as u32)
                .unwrap_or(0);
            Some(Station {
                code,
                name,
                capacity,
            })
        })
        .collect()
}

/// PostgREST serializes `numeric` columns as strings, so accept both.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_transport_modes() {
        let rows = vec![
            json!({ "name": "Voiture", "co2_factor_per_km": 0.193 }),
            json!({ "name": "Métro", "co2_factor_per_km": "0.0038" }),
            json!({ "name": "Marche", "co2_factor_per_km": null }),
            json!({ "co2_factor_per_km": 0.1 }),
            json!({ "name": "  ", "co2_factor_per_km": 0.1 }),
        ];
        let records = parse_transport_modes(rows);

        assert_eq!(
            records,
            vec![
                TransportModeRecord::new("Voiture", 0.193),
                TransportModeRecord::new("Métro", 0.0038),
                TransportModeRecord {
                    name: "Marche".into(),
                    co2_factor_per_km: None,
                },
            ]
        );
    }

    #[test]
    fn test_parse_stations() {
        let rows = vec![
            json!({ "stationcode": "16107", "name": "Benjamin Godard", "capacity": 35 }),
            json!({ "stationcode": 6015, "capacity": "22" }),
            json!({ "name": "No code" }),
        ];
        let stations = parse_stations(rows);

        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].capacity, 35);
        assert_eq!(stations[1].code, "6015");
        assert_eq!(stations[1].name, "6015");
        assert_eq!(stations[1].capacity, 22);
    }

    #[test]
    fn test_table_url() {
        let client = SupabaseClient::with_client("https://demo.supabase.co/", BasicClient::new());
        let url = client
            .table_url("velib_stations", &[("select", "stationcode,name"), ("stationcode", "in.(1,2)")])
            .unwrap();

        assert_eq!(url.path(), "/rest/v1/velib_stations");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("select".to_string(), "stationcode,name".to_string()),
                ("stationcode".to_string(), "in.(1,2)".to_string()),
            ]
        );
    }
}
