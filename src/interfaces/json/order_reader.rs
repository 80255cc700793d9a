use crate::domain::order::Order;
use crate::error::Result;
use crate::interfaces::api::wire::{Envelope, WireOrder, into_orders};
use serde::Deserialize;
use std::io::Read;

/// A saved order listing: either the backend's response envelope or a bare
/// array of orders.
#[derive(Deserialize)]
#[serde(untagged)]
enum Snapshot {
    Bare(Vec<WireOrder>),
    Wrapped(Envelope<Vec<WireOrder>>),
}

/// Reads orders from a JSON snapshot source.
pub struct OrderReader<R: Read> {
    source: R,
}

impl<R: Read> OrderReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Parses the whole snapshot and validates every order in it.
    pub fn orders(self) -> Result<Vec<Order>> {
        let snapshot: Snapshot = serde_json::from_reader(self.source)?;
        let wire = match snapshot {
            Snapshot::Bare(orders) => orders,
            Snapshot::Wrapped(envelope) => envelope.into_data()?,
        };
        into_orders(wire)
    }
}
