use crate::error::{DashboardError, Result};
use std::time::Duration;
use url::Url;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the order backend.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    pub base_url: Url,
    /// Bearer token sent with every request, if any.
    pub token: Option<String>,
    pub timeout: Duration,
}

impl GatewayConfig {
    pub fn new(base_url: &str, token: Option<String>, timeout_secs: u64) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| DashboardError::ConfigError(format!("invalid base URL '{base_url}': {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(DashboardError::ConfigError(format!(
                "base URL must be http or https, got '{}'",
                base_url.scheme()
            )));
        }
        if base_url.cannot_be_a_base() {
            return Err(DashboardError::ConfigError(format!(
                "base URL '{base_url}' cannot carry a path"
            )));
        }
        if timeout_secs == 0 {
            return Err(DashboardError::ConfigError(
                "timeout must be at least one second".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            token: token.filter(|t| !t.trim().is_empty()),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
