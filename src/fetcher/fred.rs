use async_trait::async_trait;
use crate::config::Config;
use crate::models::DataPoint;
use super::DataSource;
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

pub struct FredFetcher {
    api_key: String,
    base_url: String,
    client: Client,
    observation_start: Option<NaiveDate>,
}

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

impl FredFetcher {
    /// The key is expected to be validated already (see `Config::from_env`).
    pub fn new(config: &Config) -> crate::error::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("FxBiasScorecard/0.1"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.fetch_timeout)
            .build()?;

        Ok(Self {
            api_key: config.fred_api_key.clone(),
            base_url: config.fred_base_url.clone(),
            client,
            observation_start: config.observation_start,
        })
    }
}

#[async_trait]
impl DataSource for FredFetcher {
    fn name(&self) -> &str {
        "fred"
    }

    async fn fetch_data(&self, series_id: &str) -> Result<Vec<DataPoint>> {
        let url = format!("{}/series/observations", self.base_url);

        let mut query: Vec<(&str, String)> = vec![
            ("series_id", series_id.to_string()),
            ("api_key", self.api_key.clone()),
            ("file_type", "json".to_string()),
        ];
        if let Some(start) = self.observation_start {
            query.push(("observation_start", start.format("%Y-%m-%d").to_string()));
        }

        // never log the key itself
        debug!(series_id, key_len = self.api_key.len(), "FRED request");

        // reqwest errors print the request URL, which carries the key
        let resp = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| anyhow!(e.without_url()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body: Value = resp.json().await.unwrap_or(Value::Null);
            let message = body["error_message"].as_str().unwrap_or("no error message");
            return Err(anyhow!("FRED API Error: {} - {}", status, message));
        }

        let json: Value = resp.json().await.map_err(|e| anyhow!(e.without_url()))?;
        let points = Self::parse_observations(&json)?;

        if points.is_empty() {
            return Err(anyhow!("FRED returned no observations for {}", series_id));
        }
        Ok(points)
    }
}

impl FredFetcher {
    /// Parses the `observations` array. FRED's "." marks a gap and is kept
    /// as a missing value; unparsable values are treated the same way.
    fn parse_observations(json: &Value) -> Result<Vec<DataPoint>> {
        let observations = json["observations"]
            .as_array()
            .ok_or_else(|| anyhow!("No observations found in FRED response"))?;

        let mut data_points = Vec::with_capacity(observations.len());

        for obs in observations {
            // "date": "2023-01-01", "value": "123.45"
            let (Some(date_str), Some(value_str)) = (obs["date"].as_str(), obs["value"].as_str()) else {
                continue;
            };

            let naive_date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")?;
            let timestamp = naive_date
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| anyhow!("Invalid observation date {}", date_str))?
                .and_utc();

            data_points.push(DataPoint {
                timestamp,
                value: value_str.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            });
        }

        Ok(data_points)
    }
}
