use crate::errors::{FedWatchError, FedWatchResult};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub fomc_dates_path: PathBuf,
    pub contracts_dir: PathBuf,
    pub default_horizon: usize,
    pub fred_api_key: Option<String>,
    pub fred_base_url: String,
    pub server_port: u16,
}

impl AppConfig {
    pub fn from_env() -> FedWatchResult<Self> {
        dotenvy::dotenv().ok();

        let default_horizon = env_var_or("DEFAULT_HORIZON", "4")
            .parse::<usize>()
            .map_err(|e| FedWatchError::Configuration(format!("DEFAULT_HORIZON: {e}")))?;
        if default_horizon == 0 {
            return Err(FedWatchError::Configuration(
                "DEFAULT_HORIZON must be at least 1".into(),
            ));
        }

        let server_port = env_var_or("SERVER_PORT", "3002")
            .parse::<u16>()
            .map_err(|e| FedWatchError::Configuration(format!("SERVER_PORT: {e}")))?;

        Ok(Self {
            fomc_dates_path: PathBuf::from(env_var("FOMC_DATES_PATH")?),
            contracts_dir: PathBuf::from(env_var("CONTRACTS_DIR")?),
            default_horizon,
            fred_api_key: std::env::var("FRED_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            fred_base_url: env_var_or("FRED_BASE_URL", "https://api.stlouisfed.org/fred"),
            server_port,
        })
    }
}

fn env_var(key: &str) -> FedWatchResult<String> {
    std::env::var(key).map_err(|_| FedWatchError::Configuration(format!("missing env var: {key}")))
}

fn env_var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
