use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Fulfilment status of a single order item, as set by the vendor owning it.
///
/// Tokens outside the known set are kept verbatim in `Other` so that a
/// backend introducing a new status never breaks parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemStatus {
    Pending,
    Processing,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
    Rejected,
    Other(String),
}

impl ItemStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Processing => "processing",
            ItemStatus::Confirmed => "confirmed",
            ItemStatus::Shipped => "shipped",
            ItemStatus::Delivered => "delivered",
            ItemStatus::Cancelled => "cancelled",
            ItemStatus::Rejected => "rejected",
            ItemStatus::Other(token) => token,
        }
    }

    /// True while the vendor has not acted on the item yet.
    /// An empty or whitespace-only token, treated as no status at all.
    pub fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }

    pub fn is_awaiting_confirmation(&self) -> bool {
        matches!(self, ItemStatus::Pending | ItemStatus::Processing)
    }
}

impl From<&str> for ItemStatus {
    fn from(token: &str) -> Self {
        match token {
            "pending" => ItemStatus::Pending,
            "processing" => ItemStatus::Processing,
            "confirmed" => ItemStatus::Confirmed,
            "shipped" => ItemStatus::Shipped,
            "delivered" => ItemStatus::Delivered,
            "cancelled" => ItemStatus::Cancelled,
            "rejected" => ItemStatus::Rejected,
            other => ItemStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for ItemStatus {
    fn from(token: String) -> Self {
        match ItemStatus::from(token.as_str()) {
            ItemStatus::Other(_) => ItemStatus::Other(token),
            known => known,
        }
    }
}

impl From<ItemStatus> for String {
    fn from(status: ItemStatus) -> Self {
        match status {
            ItemStatus::Other(token) => token,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for ItemStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ItemStatus::from(s))
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order-level status shown in list and detail views.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    /// Every item shares this status, or the order has no items and this is
    /// its stored status.
    Uniform(ItemStatus),
    PartiallyCancelled,
    PartiallyDelivered,
    PartiallyShipped,
    PartiallyConfirmed,
    /// Any other mixture, e.g. pending next to processing.
    InProgress,
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Uniform(status) => status.as_str(),
            OrderStatus::PartiallyCancelled => "partially_cancelled",
            OrderStatus::PartiallyDelivered => "partially_delivered",
            OrderStatus::PartiallyShipped => "partially_shipped",
            OrderStatus::PartiallyConfirmed => "partially_confirmed",
            OrderStatus::InProgress => "processing",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Checked in order when item statuses are mixed; the first present wins.
const MIXED_PRECEDENCE: [(ItemStatus, OrderStatus); 4] = [
    (ItemStatus::Cancelled, OrderStatus::PartiallyCancelled),
    (ItemStatus::Delivered, OrderStatus::PartiallyDelivered),
    (ItemStatus::Shipped, OrderStatus::PartiallyShipped),
    (ItemStatus::Confirmed, OrderStatus::PartiallyConfirmed),
];

/// Reduces the statuses of an order's items to one order-level status.
///
/// An empty collection falls back to `stored`, or `pending` when the order
/// carries no status of its own. Item order does not matter.
pub fn aggregate_status<'a, I>(statuses: I, stored: Option<&ItemStatus>) -> OrderStatus
where
    I: IntoIterator<Item = &'a ItemStatus>,
{
    let distinct: HashSet<&ItemStatus> = statuses.into_iter().collect();

    let mut iter = distinct.iter();
    match (iter.next(), iter.next()) {
        (None, _) => OrderStatus::Uniform(
            stored
                .filter(|status| !status.is_blank())
                .cloned()
                .unwrap_or(ItemStatus::Pending),
        ),
        (Some(only), None) => OrderStatus::Uniform((*only).clone()),
        _ => MIXED_PRECEDENCE
            .iter()
            .find(|(status, _)| distinct.contains(status))
            .map(|(_, overall)| overall.clone())
            .unwrap_or(OrderStatus::InProgress),
    }
}
