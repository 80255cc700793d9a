#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::{Value, json};
use std::fs::File;
use std::io::Error;
use std::path::Path;
use vendordash::domain::status::ItemStatus;

pub const STATUS_TOKENS: [&str; 8] = [
    "pending",
    "processing",
    "confirmed",
    "shipped",
    "delivered",
    "cancelled",
    "rejected",
    "on_hold",
];

pub const FIRST_NAMES: [&str; 5] = ["Alice", "Bob", "Carol", "Dan", "Eve"];

pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn random_statuses(rng: &mut StdRng, max_len: usize) -> Vec<ItemStatus> {
    let len = rng.gen_range(0..=max_len);
    (0..len)
        .map(|_| ItemStatus::from(*STATUS_TOKENS.choose(rng).unwrap_or(&"pending")))
        .collect()
}

/// One order in the backend's JSON shape, with 0..=4 items spread over
/// vendors 1..=3.
pub fn random_order(rng: &mut StdRng, index: usize) -> Value {
    let item_count = rng.gen_range(0..=4);
    let items: Vec<Value> = (0..item_count)
        .map(|item| {
            json!({
                "item_id": index * 10 + item,
                "product_name": format!("Product {item}"),
                "quantity": rng.gen_range(1..=3),
                "price": format!("{}.{:02}", rng.gen_range(1..100), rng.gen_range(0..100)),
                "vendor_id": rng.gen_range(1..=3),
                "status": STATUS_TOKENS.choose(rng).unwrap_or(&"pending"),
            })
        })
        .collect();

    json!({
        "id": index,
        "order_id": format!("ORD-{index:04}"),
        "first_name": FIRST_NAMES.choose(rng).unwrap_or(&"Alice"),
        "last_name": "Tester",
        "subtotal": format!("{}.{:02}", rng.gen_range(0..500), rng.gen_range(0..100)),
        "items": items,
    })
}

/// Writes `count` random orders as a bare JSON array.
pub fn generate_snapshot(path: &Path, count: usize, seed: u64) -> Result<Vec<Value>, Error> {
    let mut rng = seeded(seed);
    let orders: Vec<Value> = (1..=count).map(|i| random_order(&mut rng, i)).collect();
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &orders)?;
    Ok(orders)
}
