use crate::errors::{FedWatchError, FedWatchResult};
use crate::report::RateRange;
use chrono::{Datelike, NaiveDate};
use reqwest::Client;

/// Lower and upper limits of the target range, published from 2008-12-16.
pub const SERIES_LOWER: &str = "DFEDTARL";
pub const SERIES_UPPER: &str = "DFEDTARU";
/// Single target rate, for earlier dates.
pub const SERIES_TARGET: &str = "DFEDTAR";

/// FRED series-observations client for the policy target range.
#[derive(Clone)]
pub struct FredClient {
    client: Client,
    base_url: String,
    api_key: String,
}

// Actual FRED response format:
// {
//   "realtime_start": "2023-01-10",
//   "observations": [
//     { "realtime_start": "2023-01-10", "realtime_end": "2023-01-10",
//       "date": "2023-01-10", "value": "4.25" }
//   ]
// }

#[derive(serde::Deserialize)]
struct ObservationsResponse {
    observations: Option<Vec<Observation>>,
}

#[derive(serde::Deserialize)]
struct Observation {
    date: Option<String>,
    value: Option<String>,
}

/// True if `date` falls in the target-range era.
pub fn uses_range_series(date: NaiveDate) -> bool {
    (date.year(), date.month(), date.day()) >= (2008, 12, 16)
}

impl FredClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Target range in effect on `date`. Any failure is reported as a
    /// configuration error, since the caller can always supply the range.
    pub async fn target_range(&self, date: NaiveDate) -> FedWatchResult<RateRange> {
        let result = if uses_range_series(date) {
            let lower = self.observation(SERIES_LOWER, date).await;
            let upper = self.observation(SERIES_UPPER, date).await;
            lower.and_then(|l| upper.map(|u| RateRange::new(l, u)))
        } else {
            self.observation(SERIES_TARGET, date).await.map(RateRange::point)
        };

        result.map_err(|e| {
            tracing::warn!(date = %date, error = %e, "target range lookup failed");
            FedWatchError::Configuration(format!(
                "unable to get target rate limits from FRED for {date} ({e}); \
                 supply lower and upper explicitly"
            ))
        })
    }

    async fn observation(&self, series_id: &str, date: NaiveDate) -> FedWatchResult<f64> {
        let mut parts: smallvec::SmallVec<[String; 5]> = smallvec::SmallVec::new();
        parts.push(format!("series_id={series_id}"));
        parts.push(format!("api_key={}", self.api_key));
        parts.push("file_type=json".to_string());
        parts.push(format!("observation_start={date}"));
        parts.push(format!("observation_end={date}"));
        let url = format!("{}/series/observations?{}", self.base_url, parts.join("&"));

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FedWatchError::Network(format!("{series_id}: HTTP {status}: {body}")));
        }

        let body = resp.text().await?;
        parse_observation(&body, series_id, date)
    }
}

/// Extracts the value for `date` from a series-observations body.
/// FRED marks missing observations with ".".
pub fn parse_observation(body: &str, series_id: &str, date: NaiveDate) -> FedWatchResult<f64> {
    let data: ObservationsResponse = serde_json::from_str(body)?;
    let wanted = date.to_string();

    let value = data
        .observations
        .unwrap_or_default()
        .into_iter()
        .find(|o| o.date.as_deref() == Some(wanted.as_str()))
        .and_then(|o| o.value)
        .ok_or_else(|| FedWatchError::Parse(format!("{series_id}: no observation for {date}")))?;

    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FedWatchError::Parse(format!("{series_id}: value '{value}' for {date} is not a number")))
}
