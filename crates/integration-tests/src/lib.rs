//! Integration tests for the catalog cache.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p catalog-cache-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cache_lifecycle` - Set, lookup, expiry and eviction through the facade
//! - `snapshot_roundtrip` - Export, persist and rebuild cycles
//!
//! This crate only provides shared fixtures; the tests live in `tests/`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use catalog_cache::{Cache, ManualClock};
use serde_json::{Value, json};

/// Fixed starting instant for test clocks (2023-11-14T22:13:20Z).
pub const START: i64 = 1_700_000_000_000;

/// A cache with default options on a manual clock, plus a handle to that clock.
#[must_use]
pub fn manual_cache() -> (Cache<ManualClock>, ManualClock) {
    let clock = ManualClock::new(START);
    (Cache::default().with_clock(clock.clone()), clock)
}

/// A product record as returned by the catalog API.
#[must_use]
pub fn product_json(id: i64, handle: &str, variant_ids: &[i64]) -> Value {
    let variants: Vec<Value> = variant_ids
        .iter()
        .map(|id| json!({"id": id, "title": format!("Variant {id}"), "price": "19.99"}))
        .collect();

    json!({
        "id": id,
        "handle": handle,
        "title": format!("Product {handle}"),
        "vendor": "Acme Outfitters",
        "variants": variants,
    })
}

/// A collection record with its products already merged in.
#[must_use]
pub fn collection_json(id: i64, handle: &str, products: Vec<Value>) -> Value {
    json!({
        "id": id,
        "handle": handle,
        "title": format!("Collection {handle}"),
        "products": products,
    })
}

/// A page record as returned by the catalog API.
#[must_use]
pub fn page_json(id: i64, handle: &str) -> Value {
    json!({
        "id": id,
        "handle": handle,
        "title": format!("Page {handle}"),
        "body_html": "<p>Hello</p>",
    })
}
