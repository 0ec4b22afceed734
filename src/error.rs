use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoiError {
    #[error("unknown scenario '{0}' (expected starter, professional or enterprise)")]
    UnknownScenario(String),

    #[error("unknown currency '{0}' (expected GBP, USD, EUR or AUD)")]
    UnknownCurrency(String),

    #[error("unknown billing cycle '{0}' (expected monthly or yearly)")]
    UnknownBillingCycle(String),

    #[error("exchange rates unavailable: {0}")]
    RatesUnavailable(String),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RoiError>;
