//! Catalog Cache Core - Shared catalog types.
//!
//! This crate provides the record types the catalog cache stores:
//! - `catalog-cache` - Indexing, expiration and the `Cache` facade
//! - `catalog-cli` - Snapshot inspection tools
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no clocks, no indexes.
//! This keeps it lightweight and allows fetch layers to depend on it without
//! pulling in the cache itself.
//!
//! # Modules
//!
//! - [`types`] - Entity records, the entity type tag, and the numeric ID newtype

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
