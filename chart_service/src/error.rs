use market_indicators::models::timeframe::TimeframeError;
use thiserror::Error;

/// Failure of one chart computation request.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Indicator(#[from] market_indicators::Error),

    #[error("unknown indicator `{0}`")]
    UnknownIndicator(String),

    /// Correlation was requested but no comparison symbol could be chosen.
    #[error("no comparison symbol available for `{0}`")]
    MissingComparison(String),

    #[error("invalid interval `{interval}`")]
    InvalidInterval {
        interval: String,
        #[source]
        source: TimeframeError,
    },
}

pub type Result<T> = std::result::Result<T, ServiceError>;
