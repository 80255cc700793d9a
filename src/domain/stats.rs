use super::order::Order;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Summary cards shown above the order table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderStats {
    pub total_orders: usize,
    pub total_revenue: Decimal,
    pub pending_orders: usize,
    pub delivered_orders: usize,
    /// Revenue per order, rounded half away from zero to two places.
    pub average_order_value: Decimal,
}

impl OrderStats {
    pub fn from_orders<'a, I>(orders: I) -> Self
    where
        I: IntoIterator<Item = &'a Order>,
    {
        let mut stats = OrderStats {
            total_orders: 0,
            total_revenue: Decimal::ZERO,
            pending_orders: 0,
            delivered_orders: 0,
            average_order_value: Decimal::ZERO,
        };

        for order in orders {
            stats.total_orders += 1;
            stats.total_revenue = stats
                .total_revenue
                .checked_add(order.subtotal_or_zero())
                .unwrap_or(Decimal::MAX);

            match order.overall_status().as_str() {
                "pending" | "processing" => stats.pending_orders += 1,
                "delivered" => stats.delivered_orders += 1,
                _ => {}
            }
        }

        if stats.total_orders > 0 {
            stats.average_order_value = (stats.total_revenue
                / Decimal::from(stats.total_orders))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        }

        stats
    }
}
