use crate::config::AppConfig;
use crate::feeds::fred::FredClient;
use crate::pricing::series::PriceSource;
use chrono::NaiveDate;
use portable_atomic::AtomicU64;
use std::sync::Arc;

/// Lock-free request counters.
#[derive(Debug, Default)]
pub struct Counters {
    pub requests_served: AtomicU64,
    pub tables_computed: AtomicU64,
    pub range_lookups: AtomicU64,
    pub errors: AtomicU64,
}

/// Shared, read-only application state. Meeting dates and contract prices
/// are materialized once at startup, so request handling never touches disk.
pub struct AppState {
    pub config: AppConfig,
    pub meetings: Arc<Vec<NaiveDate>>,
    pub prices: Arc<dyn PriceSource>,
    pub fred: Option<FredClient>,
    pub counters: Counters,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        meetings: Vec<NaiveDate>,
        prices: Arc<dyn PriceSource>,
        fred: Option<FredClient>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            meetings: Arc::new(meetings),
            prices,
            fred,
            counters: Counters::default(),
        })
    }
}
