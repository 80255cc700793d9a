use super::order::Order;
use super::status::ItemStatus;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A status-transition button offered on an order row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowAction {
    Confirm,
    Cancel,
    Ship,
    Deliver,
}

impl RowAction {
    /// The item status the action requests from the backend.
    pub fn target_status(&self) -> ItemStatus {
        match self {
            RowAction::Confirm => ItemStatus::Confirmed,
            RowAction::Cancel => ItemStatus::Cancelled,
            RowAction::Ship => ItemStatus::Shipped,
            RowAction::Deliver => ItemStatus::Delivered,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RowAction::Confirm => "confirm",
            RowAction::Cancel => "cancel",
            RowAction::Ship => "ship",
            RowAction::Deliver => "deliver",
        }
    }
}

impl fmt::Display for RowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RowAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirm" => Ok(RowAction::Confirm),
            "cancel" => Ok(RowAction::Cancel),
            "ship" => Ok(RowAction::Ship),
            "deliver" => Ok(RowAction::Deliver),
            other => Err(format!("unknown action '{other}'")),
        }
    }
}

/// Statuses a selection of orders can be moved to in one go.
pub const BULK_STATUSES: [ItemStatus; 3] = [
    ItemStatus::Confirmed,
    ItemStatus::Shipped,
    ItemStatus::Cancelled,
];

pub fn is_bulk_status(status: &ItemStatus) -> bool {
    BULK_STATUSES.contains(status)
}

/// Actions legal for an order given its item statuses.
///
/// An order without items offers nothing: there is nothing to transition.
/// This differs from a plain "every item" check, which holds for an empty
/// list and would offer confirm and cancel.
pub fn available_actions(order: &Order) -> Vec<RowAction> {
    let items = &order.items;
    if items.is_empty() {
        return Vec::new();
    }

    if items.iter().all(|item| item.status.is_awaiting_confirmation()) {
        vec![RowAction::Confirm, RowAction::Cancel]
    } else if items.iter().all(|item| item.status == ItemStatus::Confirmed) {
        vec![RowAction::Ship]
    } else if items.iter().all(|item| item.status == ItemStatus::Shipped) {
        vec![RowAction::Deliver]
    } else {
        Vec::new()
    }
}
