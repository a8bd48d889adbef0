//! JSON encoding of an exported cache.
//!
//! A snapshot is exactly the store's flat record sequence: a JSON array whose
//! elements are tagged records or `null` for evicted slots.

use catalog_cache_core::Entity;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::CacheError;
use crate::Cache;

/// An exported record sequence, as handed to persistence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(Vec<Option<Entity>>);

impl Snapshot {
    /// Export the current contents of `cache`.
    #[must_use]
    pub fn capture<C: Clock>(cache: &Cache<C>) -> Self {
        Self(cache.read_cache())
    }

    /// Decode a snapshot from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Snapshot` if `json` is not an array of tagged
    /// records and nulls.
    pub fn from_json(json: &str) -> Result<Self, CacheError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode as compact JSON text.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Snapshot` if a record cannot be serialized.
    pub fn to_json(&self) -> Result<String, CacheError> {
        Ok(serde_json::to_string(&self.0)?)
    }

    /// Encode as indented JSON text.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Snapshot` if a record cannot be serialized.
    pub fn to_json_pretty(&self) -> Result<String, CacheError> {
        Ok(serde_json::to_string_pretty(&self.0)?)
    }

    /// Load this snapshot into `cache`, replacing its contents.
    pub fn restore<C: Clock>(self, cache: &mut Cache<C>) {
        cache.write_cache(self.0);
    }

    #[must_use]
    pub fn records(&self) -> &[Option<Entity>] {
        &self.0
    }

    #[must_use]
    pub fn into_records(self) -> Vec<Option<Entity>> {
        self.0
    }
}

impl From<Vec<Option<Entity>>> for Snapshot {
    fn from(records: Vec<Option<Entity>>) -> Self {
        Self(records)
    }
}
