use crate::domain::order::{Customer, Order, OrderItem, VendorId};
use crate::domain::status::ItemStatus;
use crate::error::{DashboardError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::IgnoredAny;

/// Identifiers arrive as strings or as numbers depending on the endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Text(String),
    Number(i64),
}

impl From<WireId> for String {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Text(text) => text,
            WireId::Number(number) => number.to_string(),
        }
    }
}

/// The response wrapper every endpoint uses. List payloads show up under
/// `orders`, `result` or `results`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub orders: Option<T>,
    pub result: Option<T>,
    pub results: Option<T>,
}

impl<T> Envelope<T> {
    /// Returns the payload of a successful response.
    pub fn into_data(self) -> Result<T> {
        if !self.success {
            return Err(rejection(self.message));
        }
        self.orders
            .or(self.result)
            .or(self.results)
            .ok_or_else(|| {
                DashboardError::MalformedResponse("successful response carried no data".to_string())
            })
    }

    pub fn into_ack(self) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(rejection(self.message))
        }
    }
}

fn rejection(message: Option<String>) -> DashboardError {
    DashboardError::Rejected(message.unwrap_or_else(|| "request failed".to_string()))
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireItem {
    pub item_id: Option<WireId>,
    pub id: Option<WireId>,
    pub product_id: Option<WireId>,
    pub product_name: Option<String>,
    pub name: Option<String>,
    pub product_image: Option<String>,
    pub quantity: Option<u32>,
    pub price: Option<Decimal>,
    pub vendor_id: Option<WireId>,
    pub vendor_name: Option<String>,
    pub status: Option<ItemStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireOrder {
    pub order_id: Option<WireId>,
    pub id: Option<WireId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<WireId>,
    pub items: Option<Vec<WireItem>>,
    pub status: Option<ItemStatus>,
    pub order_date: Option<String>,
    pub date: Option<String>,
    pub subtotal: Option<Decimal>,
    pub total_amount: Option<Decimal>,
    pub payment_method: Option<String>,
}

impl TryFrom<WireItem> for OrderItem {
    type Error = DashboardError;

    fn try_from(wire: WireItem) -> Result<Self> {
        let vendor_id = wire
            .vendor_id
            .map(|id| VendorId::new(String::from(id)))
            .ok_or_else(|| DashboardError::MalformedResponse("item without vendor_id".to_string()))?;

        Ok(OrderItem {
            item_id: wire.item_id.or(wire.id).map(String::from),
            product_id: wire.product_id.map(String::from),
            product_name: wire.product_name.or(wire.name),
            product_image: wire.product_image,
            quantity: wire.quantity.unwrap_or(1),
            price: wire.price.unwrap_or(Decimal::ZERO),
            vendor_id,
            vendor_name: wire.vendor_name,
            status: wire
                .status
                .filter(|status| !status.is_blank())
                .unwrap_or(ItemStatus::Pending),
        })
    }
}

impl TryFrom<WireOrder> for Order {
    type Error = DashboardError;

    fn try_from(wire: WireOrder) -> Result<Self> {
        let (order_id, record_id) = match (wire.order_id, wire.id) {
            (Some(order_id), id) => (String::from(order_id), id.map(String::from)),
            (None, Some(id)) => (String::from(id), None),
            (None, None) => {
                return Err(DashboardError::MalformedResponse(
                    "order without order_id or id".to_string(),
                ));
            }
        };

        let items = wire
            .items
            .unwrap_or_default()
            .into_iter()
            .map(OrderItem::try_from)
            .collect::<Result<Vec<_>>>()
            .map_err(|e| DashboardError::MalformedResponse(format!("order {order_id}: {e}")))?;

        let order_date = wire
            .order_date
            .or(wire.date)
            .filter(|raw| !raw.trim().is_empty())
            .and_then(|raw| match parse_timestamp(&raw) {
                Ok(ts) => Some(ts),
                Err(e) => {
                    tracing::warn!(order_id = %order_id, error = %e, "ignoring order date");
                    None
                }
            });

        Ok(Order {
            order_id,
            record_id,
            customer: Customer {
                first_name: wire.first_name,
                last_name: wire.last_name,
                email: wire.email,
                phone: wire.phone,
                address: wire.address,
                city: wire.city,
                state: wire.state,
                zip_code: wire.zip_code.map(String::from),
            },
            items,
            status: wire.status.filter(|status| !status.is_blank()),
            order_date,
            subtotal: wire.subtotal,
            total_amount: wire.total_amount,
            payment_method: wire.payment_method,
        })
    }
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (UTC assumed) and bare dates.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| DashboardError::MalformedResponse(format!("unrecognised timestamp '{raw}'")))
}

/// Converts a listing, leaving out orders that fail validation so the rest
/// still reach the dashboard.
pub fn into_orders(wire: Vec<WireOrder>) -> Result<Vec<Order>> {
    let orders = wire
        .into_iter()
        .enumerate()
        .filter_map(|(position, order)| match Order::try_from(order) {
            Ok(order) => Some(order),
            Err(e) => {
                tracing::warn!(position, error = %e, "skipping malformed order");
                None
            }
        })
        .collect();
    Ok(orders)
}

/// Parses an order listing response body.
pub fn parse_order_list(body: &[u8]) -> Result<Vec<Order>> {
    let envelope: Envelope<Vec<WireOrder>> = serde_json::from_slice(body)?;
    into_orders(envelope.into_data()?)
}

/// Parses the response to a status update.
pub fn parse_ack(body: &[u8]) -> Result<()> {
    let envelope: Envelope<IgnoredAny> = serde_json::from_slice(body)?;
    envelope.into_ack()
}
