use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Backend rejected the request: {0}")]
    Rejected(String),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Unknown order: {0}")]
    UnknownOrder(String),
    #[error("Action '{action}' is not available for order {order_id}")]
    ActionNotAvailable { order_id: String, action: String },
    #[error("Status '{0}' cannot be applied in bulk")]
    InvalidBulkStatus(String),
    #[error("Status updates require a vendor scope")]
    MissingVendorScope,
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Dashboard session is closed")]
    SessionClosed,
}

pub type Result<T> = std::result::Result<T, DashboardError>;
