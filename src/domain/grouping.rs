use super::order::{OrderItem, VendorId};
use super::status::ItemStatus;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorBadge {
    RejectedItems,
    AllConfirmed,
    PendingConfirmation,
}

impl VendorBadge {
    pub fn as_str(&self) -> &'static str {
        match self {
            VendorBadge::RejectedItems => "rejected_items",
            VendorBadge::AllConfirmed => "all_confirmed",
            VendorBadge::PendingConfirmation => "pending_confirmation",
        }
    }
}

/// The items of one order that belong to a single vendor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorGroup<'a> {
    pub vendor_id: &'a VendorId,
    pub vendor_name: String,
    pub items: Vec<&'a OrderItem>,
    pub all_confirmed: bool,
    pub any_rejected: bool,
}

impl VendorGroup<'_> {
    pub fn badge(&self) -> VendorBadge {
        if self.any_rejected {
            VendorBadge::RejectedItems
        } else if self.all_confirmed {
            VendorBadge::AllConfirmed
        } else {
            VendorBadge::PendingConfirmation
        }
    }
}

/// Partitions items by owning vendor, in order of each vendor's first item.
pub fn group_by_vendor<'a>(items: &'a [OrderItem]) -> Vec<VendorGroup<'a>> {
    let mut groups: Vec<VendorGroup<'a>> = Vec::new();
    let mut positions: HashMap<&'a VendorId, usize> = HashMap::new();

    for item in items {
        let index = *positions.entry(&item.vendor_id).or_insert_with(|| {
            groups.push(VendorGroup {
                vendor_id: &item.vendor_id,
                vendor_name: item
                    .vendor_name
                    .clone()
                    .unwrap_or_else(|| format!("Vendor {}", item.vendor_id)),
                items: Vec::new(),
                all_confirmed: true,
                any_rejected: false,
            });
            groups.len() - 1
        });

        let group = &mut groups[index];
        group.items.push(item);
        if item.status != ItemStatus::Confirmed {
            group.all_confirmed = false;
        }
        if item.status == ItemStatus::Rejected {
            group.any_rejected = true;
        }
    }

    groups
}
