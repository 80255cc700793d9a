//! Domain model: orders, their items and the pure decisions the dashboard
//! derives from them (aggregate status, vendor groups, row actions, filters
//! and summary statistics).

pub mod actions;
pub mod grouping;
pub mod order;
pub mod ports;
pub mod query;
pub mod stats;
pub mod status;
