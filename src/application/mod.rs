//! Application layer containing the session orchestration.
//!
//! `OrderBook` holds one session's orders and changes only through
//! dispatched actions; `DashboardService` drives it from gateway calls.

pub mod service;
pub mod state;
