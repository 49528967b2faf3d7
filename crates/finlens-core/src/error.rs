use thiserror::Error;

/// Validation and contract errors exposed by `finlens-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("band factor '{field}' must be finite and positive")]
    InvalidBandFactor { field: &'static str },
    #[error("lower band factor {lower} exceeds upper band factor {upper}")]
    InvertedBand { lower: String, upper: String },
    #[error("invalid band anchor '{value}', expected one of forecast, last_price")]
    InvalidBandAnchor { value: String },
    #[error("forecast_days must be at least 1")]
    InvalidForecastDays,
    #[error("invalid time_horizon '{value}', expected e.g. 5d, 2wk, 6mo, 1y, ytd or max")]
    InvalidTimeHorizon { value: String },
    #[error("asset list cannot be empty")]
    EmptyAssets,

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("trace_id must be 32 hex characters")]
    InvalidTraceId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },

    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
