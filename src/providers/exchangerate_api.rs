use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::core::{FetchError, RateProvider, RateQuery, RateSnapshot};

/// Client for the exchangerate-api.com v6 `latest` endpoint.
pub struct ExchangeRateApiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("ratewatch/0.1")
            .build()?;
        Ok(ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn latest_url(&self, query: &RateQuery) -> String {
        format!(
            "{}/v6/{}/latest/{}",
            self.base_url,
            query.api_key(),
            query.base_currency()
        )
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: Option<String>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    #[serde(default)]
    time_last_update_utc: Option<String>,
    #[serde(default)]
    conversion_rates: HashMap<String, f64>,
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    #[instrument(
        name = "ExchangeRateFetch",
        skip(self, query),
        fields(base = %query.base_currency())
    )]
    async fn fetch_rates(&self, query: &RateQuery) -> Result<RateSnapshot, FetchError> {
        debug!("Requesting latest rates");

        let response = self
            .client
            .get(self.latest_url(query))
            .send()
            .await
            .map_err(|e| FetchError::Network(e.without_url().to_string()))?;

        let status = response.status();
        debug!(%status, "Received exchange rate response");
        if status != StatusCode::OK {
            return Err(FetchError::Transport(status.as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.without_url().to_string()))?;

        let data: LatestRatesResponse =
            serde_json::from_str(&text).map_err(|e| FetchError::Network(e.to_string()))?;

        if data.result.as_deref() == Some("error") {
            let reason = data.error_type.unwrap_or_else(|| "unknown".to_string());
            return Err(FetchError::Provider(reason));
        }

        debug!(count = data.conversion_rates.len(), "Parsed conversion rates");

        Ok(RateSnapshot {
            base_currency: query.base_currency().to_string(),
            last_updated_utc: data.time_last_update_utc.unwrap_or_default(),
            conversion_rates: data.conversion_rates,
        })
    }
}
