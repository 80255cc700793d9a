use crate::config::GatewayConfig;
use crate::domain::order::{Order, StatusUpdate};
use crate::domain::ports::{OrderGateway, OrderScope};
use crate::error::{DashboardError, Result};
use crate::interfaces::api::wire::{parse_ack, parse_order_list};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use url::Url;

/// Talks to the order backend's REST API.
///
/// Endpoints:
/// * `GET  api/get_vendor_orders/{vendor}`
/// * `GET  api/get_all_orders`
/// * `PUT  api/update_order_status/{vendor}`
#[derive(Clone)]
pub struct HttpOrderGateway {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpOrderGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DashboardError::ConfigError(format!("base URL '{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn execute(&self, request: RequestBuilder) -> Result<(StatusCode, Vec<u8>)> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok((status, body.to_vec()))
    }
}

/// A non-2xx response that still carries an envelope reports the server's
/// message; anything else is reported by status code.
fn interpret<T>(status: StatusCode, parsed: Result<T>) -> Result<T> {
    match parsed {
        Err(DashboardError::JsonError(_)) if !status.is_success() => {
            Err(DashboardError::Rejected(format!("HTTP {status}")))
        }
        other => other,
    }
}

#[async_trait]
impl OrderGateway for HttpOrderGateway {
    async fn list_orders(&self, scope: &OrderScope) -> Result<Vec<Order>> {
        let url = match scope {
            OrderScope::Vendor(vendor) => self.endpoint(&["api", "get_vendor_orders", vendor.as_str()])?,
            OrderScope::All => self.endpoint(&["api", "get_all_orders"])?,
        };
        tracing::debug!(%url, "fetching orders");

        let (status, body) = self.execute(self.client.get(url)).await?;
        interpret(status, parse_order_list(&body))
    }

    async fn update_status(&self, update: &StatusUpdate) -> Result<()> {
        let vendor = update
            .vendor_id
            .as_ref()
            .ok_or(DashboardError::MissingVendorScope)?;
        let url = self.endpoint(&["api", "update_order_status", vendor.as_str()])?;
        tracing::debug!(%url, order_id = %update.order_id, status = %update.status, "sending status update");

        let (status, body) = self.execute(self.client.put(url).json(update)).await?;
        interpret(status, parse_ack(&body))
    }
}
