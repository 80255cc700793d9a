//! Typed schema of the order backend's JSON responses.
//!
//! Responses are parsed and validated once here; the rest of the crate only
//! sees domain types.

pub mod wire;
