/// Domain-specific error types for the FedWatch pipeline.
/// Every failure is unrecoverable for the current run:
/// - The pipeline returns the complete table or an error, never a partial table
/// - Messages name the offending month, symbol or date
#[derive(Debug, thiserror::Error)]
pub enum FedWatchError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("insufficient data: {0}")]
    DataSufficiency(String),

    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl FedWatchError {
    /// Short machine-readable kind, used in HTTP error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::DataSufficiency(_) => "data_sufficiency",
            Self::Arithmetic(_) => "arithmetic",
            Self::Network(_) => "network",
            Self::Parse(_) => "parse",
            Self::Io(_) => "io",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<reqwest::Error> for FedWatchError {
    fn from(e: reqwest::Error) -> Self {
        FedWatchError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for FedWatchError {
    fn from(e: serde_json::Error) -> Self {
        FedWatchError::Parse(e.to_string())
    }
}

impl From<csv::Error> for FedWatchError {
    fn from(e: csv::Error) -> Self {
        FedWatchError::Parse(e.to_string())
    }
}

impl From<std::io::Error> for FedWatchError {
    fn from(e: std::io::Error) -> Self {
        FedWatchError::Io(e.to_string())
    }
}

pub type FedWatchResult<T> = Result<T, FedWatchError>;
