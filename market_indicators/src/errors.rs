use thiserror::Error;

/// The unified error type for the `market_indicators` crate.
///
/// Series shorter than an indicator's warm-up are not an error: those
/// computations return all-null output instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// The raw candle batch violates a structural invariant and was rejected as a whole.
    #[error("Malformed candle data: {message}")]
    MalformedData { message: String },

    /// A parameter value makes the computation mathematically undefined.
    #[error("Invalid parameter `{key}` for {indicator}: {message}")]
    InvalidParameter {
        indicator: &'static str,
        key: String,
        message: String,
    },
}

impl Error {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedData {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_param(
        indicator: &'static str,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            indicator,
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
