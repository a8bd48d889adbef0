//! Catalog Cache - indexed client-side cache for catalog API records.
//!
//! Products, collections, pages and variants fetched from the catalog API are
//! kept in one flat, append-only store with two indexes: by numeric id, and by
//! handle within each entity type. Records expire lazily: a lookup that finds
//! a record past its expiry tombstones the slot and reports a miss.
//!
//! # Architecture
//!
//! - [`CacheData`] owns the flat store and both indexes, and implements
//!   indexing of nested records (a product's variants, a collection's products)
//! - [`Cache`] stamps expiry on `set`, checks it on read, and exports/imports
//!   the flat store for persistence
//! - [`Clock`] abstracts the time source so expiry can be driven in tests
//! - [`Snapshot`] is the JSON form of an exported store
//!
//! The cache is single-threaded: every mutating operation takes `&mut self`.
//!
//! # Example
//!
//! ```rust
//! use catalog_cache::{Cache, EntityType};
//! use serde_json::json;
//!
//! let mut cache = Cache::default();
//! cache
//!     .set_json(EntityType::Page, json!({"id": 1, "handle": "about"}), None)
//!     .unwrap();
//!
//! assert!(cache.get_page("about").is_some());
//! assert!(cache.get_page("contact").is_none());
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod cache;
pub mod clock;
pub mod config;
mod error;
mod snapshot;
mod store;

pub use cache::{Cache, CacheStats};
pub use catalog_cache_core::{
    Collection, Entity, EntityId, EntityType, ExtraFields, NEVER_EXPIRES, Page, Product, Variant,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CacheOptions, ConfigError};
pub use error::CacheError;
pub use snapshot::Snapshot;
pub use store::CacheData;
