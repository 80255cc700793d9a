use super::status::{ItemStatus, OrderStatus, aggregate_status};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the vendor owning an order item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VendorId(String);

impl VendorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VendorId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for VendorId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for VendorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Customer {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl Customer {
    /// First and last name joined by a space, skipping missing parts.
    pub fn display_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One line of an order, owned by exactly one vendor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItem {
    pub item_id: Option<String>,
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub product_image: Option<String>,
    pub quantity: u32,
    pub price: Decimal,
    pub vendor_id: VendorId,
    pub vendor_name: Option<String>,
    pub status: ItemStatus,
}

impl OrderItem {
    pub fn new(vendor_id: impl Into<VendorId>, status: ItemStatus) -> Self {
        Self {
            item_id: None,
            product_id: None,
            product_name: None,
            product_image: None,
            quantity: 1,
            price: Decimal::ZERO,
            vendor_id: vendor_id.into(),
            vendor_name: None,
            status,
        }
    }

    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// A customer purchase spanning one or more vendors' items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    /// Identifier the backend expects in status updates.
    pub order_id: String,
    /// Secondary record identifier, when the backend sends one.
    pub record_id: Option<String>,
    pub customer: Customer,
    pub items: Vec<OrderItem>,
    /// Status stored on the order itself.
    pub status: Option<ItemStatus>,
    pub order_date: Option<DateTime<Utc>>,
    pub subtotal: Option<Decimal>,
    pub total_amount: Option<Decimal>,
    pub payment_method: Option<String>,
}

impl Order {
    pub fn new(order_id: impl Into<String>, items: Vec<OrderItem>) -> Self {
        Self {
            order_id: order_id.into(),
            record_id: None,
            customer: Customer::default(),
            items,
            status: None,
            order_date: None,
            subtotal: None,
            total_amount: None,
            payment_method: None,
        }
    }

    /// Order-level status derived from the item statuses.
    pub fn overall_status(&self) -> OrderStatus {
        aggregate_status(self.items.iter().map(|item| &item.status), self.status.as_ref())
    }

    pub fn subtotal_or_zero(&self) -> Decimal {
        self.subtotal.unwrap_or(Decimal::ZERO)
    }

    pub fn has_vendor(&self, vendor_id: &VendorId) -> bool {
        self.items.iter().any(|item| &item.vendor_id == vendor_id)
    }

    /// Writes the update's status to the items it targets and to the
    /// order's stored status. Returns the number of items touched.
    pub fn apply_update(&mut self, update: &StatusUpdate) -> usize {
        let mut touched = 0;
        for item in self.items.iter_mut().filter(|item| update.targets(item)) {
            item.status = update.status.clone();
            touched += 1;
        }
        self.status = Some(update.status.clone());
        touched
    }
}

/// A status transition for one order, optionally narrowed to one vendor or
/// one item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusUpdate {
    pub order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<VendorId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    pub status: ItemStatus,
}

impl StatusUpdate {
    pub fn for_order(order_id: impl Into<String>, status: ItemStatus) -> Self {
        Self {
            order_id: order_id.into(),
            vendor_id: None,
            item_id: None,
            status,
        }
    }

    pub fn by_vendor(mut self, vendor_id: VendorId) -> Self {
        self.vendor_id = Some(vendor_id);
        self
    }

    pub fn on_item(mut self, item_id: impl Into<String>) -> Self {
        self.item_id = Some(item_id.into());
        self
    }

    /// Whether `item` is written by this update.
    pub fn targets(&self, item: &OrderItem) -> bool {
        let vendor_matches = self
            .vendor_id
            .as_ref()
            .is_none_or(|vendor| vendor == &item.vendor_id);
        let item_matches = self
            .item_id
            .as_ref()
            .is_none_or(|id| item.item_id.as_ref() == Some(id));
        vendor_matches && item_matches
    }
}
