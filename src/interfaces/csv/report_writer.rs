use crate::application::service::OrderView;
use crate::domain::grouping::VendorGroup;
use crate::domain::stats::OrderStats;
use crate::error::Result;
use std::io::Write;

/// Writes dashboard reports as CSV.
///
/// Each `write_*` call emits its own header row followed by the records,
/// then flushes.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(sink: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(sink);
        Self { writer }
    }

    /// One row per order: id, customer, item count, subtotal, aggregate
    /// status and the row actions separated by `;`.
    pub fn write_orders(&mut self, views: &[OrderView]) -> Result<()> {
        self.writer
            .write_record(["order_id", "customer", "items", "subtotal", "status", "actions"])?;
        for view in views {
            let actions = view
                .actions
                .iter()
                .map(|action| action.as_str())
                .collect::<Vec<_>>()
                .join(";");
            self.writer.write_record([
                view.order.order_id.as_str(),
                view.order.customer.display_name().as_str(),
                view.order.items.len().to_string().as_str(),
                view.order.subtotal_or_zero().to_string().as_str(),
                view.status.as_str(),
                actions.as_str(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_vendor_groups(&mut self, groups: &[VendorGroup<'_>]) -> Result<()> {
        self.writer.write_record([
            "vendor_id",
            "vendor_name",
            "items",
            "all_confirmed",
            "any_rejected",
            "badge",
        ])?;
        for group in groups {
            self.writer.write_record([
                group.vendor_id.as_str(),
                group.vendor_name.as_str(),
                group.items.len().to_string().as_str(),
                bool_field(group.all_confirmed),
                bool_field(group.any_rejected),
                group.badge().as_str(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_stats(&mut self, stats: &OrderStats) -> Result<()> {
        self.writer.write_record([
            "total_orders",
            "total_revenue",
            "pending_orders",
            "delivered_orders",
            "average_order_value",
        ])?;
        self.writer.write_record([
            stats.total_orders.to_string(),
            stats.total_revenue.to_string(),
            stats.pending_orders.to_string(),
            stats.delivered_orders.to_string(),
            stats.average_order_value.to_string(),
        ])?;
        self.writer.flush()?;
        Ok(())
    }
}

fn bool_field(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grouping::group_by_vendor;
    use crate::domain::order::{Order, OrderItem};
    use crate::domain::status::ItemStatus;
    use rust_decimal_macros::dec;

    fn render(write: impl FnOnce(&mut ReportWriter<&mut Vec<u8>>) -> Result<()>) -> String {
        let mut buffer = Vec::new();
        let mut writer = ReportWriter::new(&mut buffer);
        write(&mut writer).unwrap();
        drop(writer);
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_write_orders() {
        let mut order = Order::new(
            "A",
            vec![
                OrderItem::new(1u64, ItemStatus::Pending),
                OrderItem::new(2u64, ItemStatus::Pending),
            ],
        );
        order.customer.first_name = Some("Alice".to_string());
        order.customer.last_name = Some("Johnson".to_string());
        order.subtotal = Some(dec!(30.00));
        let views = vec![OrderView::from(&order)];

        let output = render(|w| w.write_orders(&views));
        assert_eq!(
            output,
            "order_id,customer,items,subtotal,status,actions\n\
             A,Alice Johnson,2,30.00,pending,confirm;cancel\n"
        );
    }

    #[test]
    fn test_write_vendor_groups() {
        let mut items = vec![
            OrderItem::new(1u64, ItemStatus::Confirmed),
            OrderItem::new(2u64, ItemStatus::Rejected),
            OrderItem::new(1u64, ItemStatus::Confirmed),
        ];
        items[0].vendor_name = Some("Acme, Inc".to_string());
        let groups = group_by_vendor(&items);

        let output = render(|w| w.write_vendor_groups(&groups));
        assert_eq!(
            output,
            "vendor_id,vendor_name,items,all_confirmed,any_rejected,badge\n\
             1,\"Acme, Inc\",2,true,false,all_confirmed\n\
             2,Vendor 2,1,false,true,rejected_items\n"
        );
    }

    #[test]
    fn test_write_stats() {
        let mut delivered = Order::new("A", vec![OrderItem::new(1u64, ItemStatus::Delivered)]);
        delivered.subtotal = Some(dec!(10.00));
        let pending = Order::new("B", vec![OrderItem::new(1u64, ItemStatus::Pending)]);
        let stats = OrderStats::from_orders([&delivered, &pending]);

        let output = render(|w| w.write_stats(&stats));
        let mut lines = output.lines();
        assert_eq!(
            lines.next(),
            Some("total_orders,total_revenue,pending_orders,delivered_orders,average_order_value")
        );
        assert_eq!(lines.next(), Some("2,10.00,1,1,5.00"));
    }
}
