//! Exchange rate abstractions and core types

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Number of leading characters of the provider timestamp shown in the table.
const SHORT_TIMESTAMP_LEN: usize = 16;

/// Identifies one rate table request: whose key, and which base currency.
#[derive(Clone, PartialEq, Eq)]
pub struct RateQuery {
    api_key: String,
    base_currency: String,
}

impl RateQuery {
    pub fn new(api_key: &str, base_currency: &str) -> Self {
        RateQuery {
            api_key: api_key.to_string(),
            base_currency: base_currency.trim().to_uppercase(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }
}

// Keeps the key out of logs.
impl fmt::Debug for RateQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateQuery")
            .field("api_key", &"<redacted>")
            .field("base_currency", &self.base_currency)
            .finish()
    }
}

/// Rate table returned by one successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSnapshot {
    pub base_currency: String,
    pub last_updated_utc: String,
    pub conversion_rates: HashMap<String, f64>,
}

impl RateSnapshot {
    /// Returns the usable rate for `ticker`. Zero, negative and non-finite
    /// entries count as missing.
    pub fn rate(&self, ticker: &str) -> Option<f64> {
        self.conversion_rates
            .get(ticker)
            .copied()
            .filter(|rate| rate.is_finite() && *rate > 0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.conversion_rates.is_empty()
    }

    /// The first 16 characters of the provider timestamp, or all of it when
    /// it is shorter.
    pub fn last_updated_short(&self) -> &str {
        match self.last_updated_utc.char_indices().nth(SHORT_TIMESTAMP_LEN) {
            Some((idx, _)) => &self.last_updated_utc[..idx],
            None => &self.last_updated_utc,
        }
    }

    /// Parses the provider timestamp (RFC 2822, e.g. `Fri, 27 Mar 2020 00:00:01 +0000`).
    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc2822(&self.last_updated_utc)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Reasons a fetch produced no snapshot.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("API Error: {0}")]
    Provider(String),

    #[error("Connection failed (Status: {0})")]
    Transport(u16),

    #[error("Network error: {0}")]
    Network(String),
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(&self, query: &RateQuery) -> Result<RateSnapshot, FetchError>;
}
