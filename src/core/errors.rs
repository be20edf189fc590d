use thiserror::Error;

/// Unified error surface for every request pipeline stage.
///
/// Each failed call raises exactly one of these; the four response-side
/// classifications (`Maintenance`, `Network`, `Api`, `Deserialization`) are
/// never collapsed into each other so callers can branch on them.
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Every base host candidate failed its connectivity probe. The exchange,
    /// not the network, is unavailable.
    #[error("exchange is under maintenance: all base hosts failed the connectivity probe")]
    Maintenance,

    #[error("network error: {0}")]
    NetworkError(String),

    /// The exchange rejected the request. `code` is the upstream error code
    /// when the body carried one, otherwise the HTTP status.
    #[error("API error: {code} - {message}")]
    ApiError {
        status: u16,
        code: i64,
        message: String,
    },

    #[error("deserialization error: {0}")]
    DeserializationError(String),

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("authentication error: {0}")]
    AuthError(String),

    #[error("configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),
}
