use super::order::{Order, StatusUpdate, VendorId};
use crate::error::Result;
use async_trait::async_trait;
use std::fmt;

/// Which orders a dashboard session works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderScope {
    /// Orders containing at least one item of this vendor.
    Vendor(VendorId),
    /// Every order on the platform.
    All,
}

impl OrderScope {
    pub fn vendor(&self) -> Option<&VendorId> {
        match self {
            OrderScope::Vendor(vendor) => Some(vendor),
            OrderScope::All => None,
        }
    }
}

impl fmt::Display for OrderScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderScope::Vendor(vendor) => write!(f, "vendor {vendor}"),
            OrderScope::All => f.write_str("all vendors"),
        }
    }
}

/// The backend owning orders, seen from the dashboard.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn list_orders(&self, scope: &OrderScope) -> Result<Vec<Order>>;
    async fn update_status(&self, update: &StatusUpdate) -> Result<()>;
}

pub type OrderGatewayBox = Box<dyn OrderGateway>;
