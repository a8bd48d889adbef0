//! Errors raised at the cache's boundary conversions.
//!
//! Indexing, lookups and expiry are total; only decoding untrusted JSON can
//! fail.

use catalog_cache_core::EntityType;
use thiserror::Error;

/// Errors that can occur when feeding external data into the cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// A fetched record did not match the shape of its declared type.
    #[error("Invalid {entity_type} record: {source}")]
    InvalidEntity {
        /// Type the record was declared as.
        entity_type: EntityType,
        #[source]
        source: serde_json::Error,
    },

    /// A persisted snapshot could not be encoded or decoded.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}
