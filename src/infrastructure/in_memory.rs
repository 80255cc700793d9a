use crate::domain::order::{Order, StatusUpdate};
use crate::domain::ports::{OrderGateway, OrderScope};
use crate::error::{DashboardError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory stand-in for the order backend.
///
/// Orders keep the order they were inserted in, so listings are stable.
/// Used for offline snapshots and in tests.
#[derive(Default, Clone)]
pub struct InMemoryOrderGateway {
    orders: Arc<RwLock<Vec<Order>>>,
}

impl InMemoryOrderGateway {
    /// Creates a new, empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orders(orders: impl IntoIterator<Item = Order>) -> Self {
        Self {
            orders: Arc::new(RwLock::new(orders.into_iter().collect())),
        }
    }

    /// Inserts an order, replacing any order with the same id.
    pub async fn insert(&self, order: Order) {
        let mut orders = self.orders.write().await;
        match orders.iter_mut().find(|o| o.order_id == order.order_id) {
            Some(existing) => *existing = order,
            None => orders.push(order),
        }
    }

    pub async fn get(&self, order_id: &str) -> Option<Order> {
        let orders = self.orders.read().await;
        orders.iter().find(|o| o.order_id == order_id).cloned()
    }
}

#[async_trait]
impl OrderGateway for InMemoryOrderGateway {
    async fn list_orders(&self, scope: &OrderScope) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(orders
            .iter()
            .filter(|order| match scope {
                OrderScope::Vendor(vendor) => order.has_vendor(vendor),
                OrderScope::All => true,
            })
            .cloned()
            .collect())
    }

    async fn update_status(&self, update: &StatusUpdate) -> Result<()> {
        let mut orders = self.orders.write().await;
        let order = orders
            .iter_mut()
            .find(|o| o.order_id == update.order_id)
            .ok_or_else(|| DashboardError::UnknownOrder(update.order_id.clone()))?;

        if let Some(vendor) = &update.vendor_id
            && !order.has_vendor(vendor)
        {
            return Err(DashboardError::Rejected(format!(
                "vendor {vendor} has no items in order {}",
                update.order_id
            )));
        }

        order.apply_update(update);
        Ok(())
    }
}
