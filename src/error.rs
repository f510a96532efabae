use thiserror::Error;

/// Errors surfaced at the fallible edges of the engine (parsing and decoding).
/// Numeric computations never fail; they return empty or zero-filled results.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unparsable timestamp: {0:?}")]
    InvalidTimestamp(String),

    #[error("unknown range token: {0:?}")]
    InvalidRange(String),

    #[error("unknown period: {0:?}")]
    InvalidPeriod(String),

    #[error("unknown statistic: {0:?}")]
    InvalidStatistic(String),

    #[error("invalid chart configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
