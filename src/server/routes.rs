use crate::calendar::parse_iso_date;
use crate::errors::{FedWatchError, FedWatchResult};
use crate::pipeline::FedWatch;
use crate::report::{LabeledTable, RateRange};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::NaiveDate;
use portable_atomic::Ordering::Relaxed;
use std::sync::Arc;

#[derive(Debug, Default, serde::Deserialize)]
pub struct WatchQuery {
    pub date: Option<String>,
    pub horizon: Option<usize>,
    pub rate_cols: Option<bool>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct CalendarQuery {
    pub date: Option<String>,
    pub horizon: Option<usize>,
}

pub type ApiResponse = (StatusCode, Json<serde_json::Value>);

/// GET /api/watch -- rate expectations for upcoming meetings
pub async fn get_watch(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WatchQuery>,
) -> ApiResponse {
    state.counters.requests_served.fetch_add(1, Relaxed);
    let result = compute_watch(&state, params).await;
    respond(&state, result)
}

/// GET /api/calendar -- month calendar joined with propagated prices
pub async fn get_calendar(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CalendarQuery>,
) -> ApiResponse {
    state.counters.requests_served.fetch_add(1, Relaxed);
    let result = compute_calendar(&state, params).await;
    respond(&state, result)
}

/// GET /api/counters -- request counters (lock-free reads)
pub async fn get_counters(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "requests_served": state.counters.requests_served.load(Relaxed),
        "tables_computed": state.counters.tables_computed.load(Relaxed),
        "range_lookups": state.counters.range_lookups.load(Relaxed),
        "errors": state.counters.errors.load(Relaxed),
    }))
}

async fn compute_watch(state: &Arc<AppState>, params: WatchQuery) -> FedWatchResult<serde_json::Value> {
    let date = parse_date_param(params.date.as_deref())?;
    let horizon = params.horizon.unwrap_or(state.config.default_horizon);

    // The range is settled before the pipeline runs; the core never waits on the network.
    let range = if params.rate_cols.unwrap_or(false) {
        Some(resolve_range(state, date, params.lower, params.upper).await?)
    } else {
        None
    };

    let meetings = state.meetings.clone();
    let prices = state.prices.clone();
    let table = run_blocking(move || {
        FedWatch::new(date, horizon, &meetings)?.rate_expectations(prices.as_ref())
    })
    .await?;
    state.counters.tables_computed.fetch_add(1, Relaxed);

    let labeled = match range {
        Some(r) => LabeledTable::with_rates(&table, r),
        None => LabeledTable::offsets(&table),
    };
    Ok(serde_json::to_value(labeled)?)
}

async fn compute_calendar(state: &Arc<AppState>, params: CalendarQuery) -> FedWatchResult<serde_json::Value> {
    let date = parse_date_param(params.date.as_deref())?;
    let horizon = params.horizon.unwrap_or(state.config.default_horizon);

    let meetings = state.meetings.clone();
    let prices = state.prices.clone();
    let summary = run_blocking(move || FedWatch::new(date, horizon, &meetings)?.summary(prices.as_ref())).await?;

    Ok(serde_json::json!({
        "reference_date": date,
        "horizon": horizon,
        "months": summary,
    }))
}

async fn resolve_range(
    state: &AppState,
    date: NaiveDate,
    lower: Option<f64>,
    upper: Option<f64>,
) -> FedWatchResult<RateRange> {
    if let Some(range) = explicit_range(lower, upper)? {
        return Ok(range);
    }
    let fred = state.fred.as_ref().ok_or_else(|| {
        FedWatchError::Configuration(
            "rate_cols requested without lower/upper and FRED_API_KEY is not set".into(),
        )
    })?;
    state.counters.range_lookups.fetch_add(1, Relaxed);
    fred.target_range(date).await
}

/// Caller-supplied range, if any. Both bounds or neither.
pub fn explicit_range(lower: Option<f64>, upper: Option<f64>) -> FedWatchResult<Option<RateRange>> {
    match (lower, upper) {
        (None, None) => Ok(None),
        (Some(l), Some(u)) if l.is_finite() && u.is_finite() && l <= u => Ok(Some(RateRange::new(l, u))),
        (Some(l), Some(u)) => Err(FedWatchError::Configuration(format!(
            "invalid rate range {l}..{u}"
        ))),
        _ => Err(FedWatchError::Configuration(
            "supply both lower and upper, or neither".into(),
        )),
    }
}

fn parse_date_param(date: Option<&str>) -> FedWatchResult<NaiveDate> {
    let text = date.ok_or_else(|| FedWatchError::Configuration("missing 'date' parameter".into()))?;
    parse_iso_date(text)
        .ok_or_else(|| FedWatchError::Configuration(format!("malformed date '{text}', expected YYYY-MM-DD")))
}

async fn run_blocking<T, F>(f: F) -> FedWatchResult<T>
where
    F: FnOnce() -> FedWatchResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| FedWatchError::Internal(format!("pipeline task failed: {e}")))?
}

pub fn status_for(e: &FedWatchError) -> StatusCode {
    match e {
        FedWatchError::Configuration(_) => StatusCode::BAD_REQUEST,
        FedWatchError::DataSufficiency(_) | FedWatchError::Arithmetic(_) => StatusCode::UNPROCESSABLE_ENTITY,
        FedWatchError::Network(_) => StatusCode::BAD_GATEWAY,
        FedWatchError::Parse(_) | FedWatchError::Io(_) | FedWatchError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn respond(state: &AppState, result: FedWatchResult<serde_json::Value>) -> ApiResponse {
    match result {
        Ok(body) => (StatusCode::OK, Json(body)),
        Err(e) => {
            state.counters.errors.fetch_add(1, Relaxed);
            tracing::warn!(error = %e, kind = e.kind(), "request failed");
            (
                status_for(&e),
                Json(serde_json::json!({ "error": e.to_string(), "kind": e.kind() })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::pricing::series::{InMemoryPriceSource, RawBar};
    use std::path::PathBuf;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn app_state() -> Arc<AppState> {
        let config = AppConfig {
            fomc_dates_path: PathBuf::from("fomc.csv"),
            contracts_dir: PathBuf::from("contracts"),
            default_horizon: 1,
            fred_api_key: None,
            fred_base_url: "http://127.0.0.1:9".into(),
            server_port: 0,
        };
        let meetings = vec![ymd(2022, 12, 14), ymd(2023, 2, 1), ymd(2023, 5, 3)];
        let prices = InMemoryPriceSource::new()
            .with_series("ZQF23", vec![RawBar::new("2023-01-09", 95.50)])
            .with_series("ZQG23", vec![RawBar::new("2023-01-09", 95.45)])
            .with_series("ZQH23", vec![RawBar::new("2023-01-09", 95.40)]);
        AppState::new(config, meetings, Arc::new(prices), None)
    }

    #[test]
    fn test_explicit_range() {
        assert_eq!(explicit_range(None, None).unwrap(), None);
        assert_eq!(explicit_range(Some(4.25), Some(4.5)).unwrap(), Some(RateRange::new(4.25, 4.5)));
        assert!(explicit_range(Some(4.25), None).is_err());
        assert!(explicit_range(Some(4.5), Some(4.25)).is_err());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&FedWatchError::Configuration("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&FedWatchError::Arithmetic("x".into())), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_for(&FedWatchError::Network("x".into())), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_watch_with_supplied_range() {
        let state = app_state();
        let params = WatchQuery {
            date: Some("2023-01-10".into()),
            rate_cols: Some(true),
            lower: Some(4.25),
            upper: Some(4.5),
            ..Default::default()
        };
        let (status, Json(body)) = get_watch(State(state.clone()), Query(params)).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        // Feb: start 95.50, end 95.40 -> 0.4 steps.
        assert_eq!(body["columns"], serde_json::json!(["4.25-4.50", "4.50-4.75"]));
        let probs = body["rows"][0]["probabilities"].as_array().unwrap();
        assert!((probs[0].as_f64().unwrap() - 0.6).abs() < 1e-6);
        assert_eq!(state.counters.tables_computed.load(Relaxed), 1);
    }

    #[tokio::test]
    async fn test_watch_rate_cols_without_provider() {
        let state = app_state();
        let params = WatchQuery {
            date: Some("2023-01-10".into()),
            rate_cols: Some(true),
            ..Default::default()
        };
        let (status, Json(body)) = get_watch(State(state.clone()), Query(params)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "configuration");
        assert_eq!(state.counters.errors.load(Relaxed), 1);
    }

    #[tokio::test]
    async fn test_watch_insufficient_meetings() {
        let params = WatchQuery {
            date: Some("2023-01-10".into()),
            horizon: Some(3),
            ..Default::default()
        };
        let (status, Json(body)) = get_watch(State(app_state()), Query(params)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["kind"], "data_sufficiency");
    }

    #[tokio::test]
    async fn test_calendar_summary() {
        let params = CalendarQuery {
            date: Some("2023-01-10".into()),
            horizon: None,
        };
        let (status, Json(body)) = get_calendar(State(app_state()), Query(params)).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        let months = body["months"].as_array().unwrap();
        assert_eq!(months.len(), 3);
        assert_eq!(months[1]["symbol"], "ZQG23");
        assert_eq!(months[1]["order"], 1);
        assert_eq!(months[1]["month"], "2023-02");
    }

    #[tokio::test]
    async fn test_missing_date_rejected() {
        let (status, _) = get_calendar(State(app_state()), Query(CalendarQuery::default())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
