//! The `Cache` facade.
//!
//! Wraps a [`CacheData`] store with typed lookups, expiry stamping on `set`,
//! and expiry checks on read. A record is evicted (its slot tombstoned) only
//! when a lookup finds it past its expiry; nothing sweeps in the background.

use std::collections::BTreeMap;

use catalog_cache_core::{Collection, Entity, EntityId, EntityType, Page, Product, Variant};
use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::clock::{Clock, SystemClock};
use crate::config::CacheOptions;
use crate::error::CacheError;
use crate::store::CacheData;

/// Point-in-time counts for a cache. Computing them evicts nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Positions in the flat store, tombstones included.
    pub positions: usize,
    /// Slots still holding a record.
    pub live: usize,
    /// Live records already past their expiry.
    pub expired: usize,
    /// Slots whose record has been evicted.
    pub tombstones: usize,
    /// Registered handles per entity type.
    pub handles: BTreeMap<EntityType, usize>,
}

/// Client-side cache for catalog records.
///
/// Products, collections and pages are addressable by handle; every record is
/// addressable by id. Records expire `cache_timeout` seconds after they are
/// set unless an explicit expiry is given.
#[derive(Debug, Clone)]
pub struct Cache<C = SystemClock> {
    options: CacheOptions,
    store: CacheData,
    clock: C,
}

impl Default for Cache {
    fn default() -> Self {
        Self::new(CacheOptions::default())
    }
}

impl Cache {
    /// Create an empty cache on the system clock.
    #[must_use]
    pub fn new(options: CacheOptions) -> Self {
        Self::from_store(options, CacheData::new())
    }

    /// Create a cache around an existing store, used as is.
    #[must_use]
    pub const fn from_store(options: CacheOptions, store: CacheData) -> Self {
        Self {
            options,
            store,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> Cache<C> {
    /// Swap the time source.
    #[must_use]
    pub fn with_clock<D: Clock>(self, clock: D) -> Cache<D> {
        Cache {
            options: self.options,
            store: self.store,
            clock,
        }
    }

    #[must_use]
    pub const fn options(&self) -> &CacheOptions {
        &self.options
    }

    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &CacheData {
        &self.store
    }

    /// Copy of the flat record sequence, for persistence.
    #[must_use]
    pub fn read_cache(&self) -> Vec<Option<Entity>> {
        self.store.data().to_vec()
    }

    /// Replace the whole store with one rebuilt from `values`.
    #[instrument(skip_all)]
    pub fn write_cache<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = Option<Entity>>,
    {
        self.store = CacheData::rebuild(values);
    }

    /// Store `entity`, stamping it with `expires` or, when `None`, with
    /// now plus the configured timeout.
    ///
    /// A record already cached under the same id is replaced. Variants nested
    /// in a product are refreshed with it; products nested in a collection are
    /// only added if their id is new.
    #[instrument(skip_all)]
    pub fn set(&mut self, entity: impl Into<Entity>, expires: Option<i64>) {
        let mut entity = entity.into();
        let expires = expires.unwrap_or_else(|| self.default_expiry());
        entity.stamp_expires(expires);

        let id = entity.id();
        let entity_type = entity.entity_type();

        let created = self.store.index_entity(entity.clone());
        if !created {
            self.store.overwrite(entity);
        }

        debug!(%id, %entity_type, expires, created, "Cached record");
    }

    /// Decode an untyped API record as `entity_type` and [`set`](Self::set) it.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::InvalidEntity` if `value` does not have the shape
    /// of `entity_type`, including when it has no `id`. Nothing is cached in
    /// that case.
    pub fn set_json(
        &mut self,
        entity_type: EntityType,
        value: Value,
        expires: Option<i64>,
    ) -> Result<(), CacheError> {
        let entity = Entity::from_json(entity_type, value).map_err(|source| {
            CacheError::InvalidEntity {
                entity_type,
                source,
            }
        })?;
        self.set(entity, expires);
        Ok(())
    }

    /// Look up a product by handle.
    pub fn get_product(&mut self, handle: &str) -> Option<&Product> {
        self.get_by_handle(EntityType::Product, handle)
            .and_then(Entity::as_product)
    }

    /// Look up a collection by handle.
    pub fn get_collection(&mut self, handle: &str) -> Option<&Collection> {
        self.get_by_handle(EntityType::Collection, handle)
            .and_then(Entity::as_collection)
    }

    /// Look up a page by handle.
    pub fn get_page(&mut self, handle: &str) -> Option<&Page> {
        self.get_by_handle(EntityType::Page, handle)
            .and_then(Entity::as_page)
    }

    /// Look up a variant by id.
    pub fn get_variant(&mut self, id: EntityId) -> Option<&Variant> {
        self.get(id).and_then(Entity::as_variant)
    }

    /// Look up any record by handle within `entity_type`.
    ///
    /// Returns `None` if the handle is unknown, or if the record it points at
    /// has expired (in which case it is evicted now).
    pub fn get_by_handle(&mut self, entity_type: EntityType, handle: &str) -> Option<&Entity> {
        let Some(position) = self.store.position_by_handle(entity_type, handle) else {
            trace!(%entity_type, handle, "Cache miss");
            return None;
        };
        self.read_position(position)
    }

    /// Look up any record by id, evicting it if it has expired.
    pub fn get(&mut self, id: EntityId) -> Option<&Entity> {
        let Some(position) = self.store.position_of(id) else {
            trace!(%id, "Cache miss");
            return None;
        };
        self.read_position(position)
    }

    /// Evict every expired record, returning how many were evicted.
    pub fn evict_expired(&mut self) -> usize {
        let evicted = (0..self.store.len())
            .filter(|&position| self.delete_if_expired(position))
            .count();
        debug!(evicted, "Evicted expired records");
        evicted
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let data = self.store.data();
        let live = data.iter().flatten().count();
        let expired = data
            .iter()
            .flatten()
            .filter(|entity| self.clock.is_expired(entity.expires()))
            .count();

        CacheStats {
            positions: data.len(),
            live,
            expired,
            tombstones: data.len() - live,
            handles: EntityType::HANDLED
                .into_iter()
                .map(|ty| (ty, self.store.handle_count(ty)))
                .collect(),
        }
    }

    /// Number of positions, tombstones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    fn read_position(&mut self, position: usize) -> Option<&Entity> {
        self.delete_if_expired(position);
        let entity = self.store.get(position);
        trace!(position, hit = entity.is_some(), "Cache lookup");
        entity
    }

    /// Tombstone the slot at `position` if its record has expired.
    fn delete_if_expired(&mut self, position: usize) -> bool {
        let expired = self
            .store
            .get(position)
            .is_some_and(|entity| self.clock.is_expired(entity.expires()));
        if !expired {
            return false;
        }

        if let Some(entity) = self.store.tombstone(position) {
            debug!(
                id = %entity.id(),
                entity_type = %entity.entity_type(),
                position,
                "Evicted expired record"
            );
        }
        true
    }

    fn default_expiry(&self) -> i64 {
        self.clock
            .now()
            .saturating_add(self.options.timeout_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use serde_json::json;

    const START: i64 = 1_700_000_000_000;

    fn cache() -> (Cache<ManualClock>, ManualClock) {
        let clock = ManualClock::new(START);
        let cache = Cache::default().with_clock(clock.clone());
        (cache, clock)
    }

    fn set_product_with_variant(cache: &mut Cache<ManualClock>) {
        let product = json!({"id": 1, "handle": "p", "variants": [{"id": 10}]});
        cache.set_json(EntityType::Product, product, None).unwrap();
    }

    #[test]
    fn test_page_expires_after_timeout() {
        let (mut cache, clock) = cache();
        cache
            .set_json(EntityType::Page, json!({"id": 1, "handle": "a"}), None)
            .unwrap();

        assert_eq!(cache.get_page("a").unwrap().id, EntityId::new(1));

        clock.advance(300_000);
        assert!(cache.get_page("a").is_some(), "expiry itself is still fresh");

        clock.advance(1);
        assert!(cache.get_page("a").is_none());
        assert_eq!(cache.read_cache(), vec![None]);
    }

    #[test]
    fn test_set_stamps_default_expiry() {
        let (mut cache, _clock) = cache();
        set_product_with_variant(&mut cache);

        let product = cache.get_product("p").unwrap();
        assert_eq!(product.expires, START + 300_000);
        let variant = cache.get_variant(EntityId::new(10)).unwrap();
        assert_eq!(variant.expires, START + 300_000);
    }

    #[test]
    fn test_set_honours_explicit_expiry() {
        let (mut cache, clock) = cache();
        cache
            .set_json(EntityType::Page, json!({"id": 1, "handle": "a"}), Some(START + 10))
            .unwrap();

        clock.advance(11);
        assert!(cache.get_page("a").is_none());
    }

    #[test]
    fn test_custom_timeout() {
        let clock = ManualClock::new(START);
        let mut cache = Cache::new(CacheOptions { cache_timeout: 5 }).with_clock(clock.clone());
        cache
            .set_json(EntityType::Collection, json!({"id": 2, "handle": "c"}), None)
            .unwrap();

        clock.advance(5_001);
        assert!(cache.get_collection("c").is_none());
    }

    #[test]
    fn test_product_update_refreshes_variants() {
        let (mut cache, _clock) = cache();
        set_product_with_variant(&mut cache);
        cache
            .set_json(
                EntityType::Product,
                json!({"id": 1, "handle": "p", "variants": [{"id": 10, "title": "X"}]}),
                None,
            )
            .unwrap();

        let exported = cache.read_cache();
        assert_eq!(exported.iter().flatten().count(), 2);
        let variant = exported
            .iter()
            .flatten()
            .find_map(Entity::as_variant)
            .unwrap();
        assert_eq!(variant.title(), Some("X"));
        let product = cache.get_product("p").unwrap();
        assert_eq!(product.variants()[0].title(), Some("X"));
    }

    #[test]
    fn test_set_overwrites_top_level_record() {
        let (mut cache, _clock) = cache();
        cache
            .set_json(EntityType::Page, json!({"id": 1, "handle": "a", "title": "Old"}), None)
            .unwrap();
        cache
            .set_json(EntityType::Page, json!({"id": 1, "handle": "a", "title": "New"}), None)
            .unwrap();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_page("a").unwrap().title(), Some("New"));
    }

    #[test]
    fn test_set_revives_tombstone_in_place() {
        let (mut cache, clock) = cache();
        cache
            .set_json(EntityType::Page, json!({"id": 1, "handle": "a"}), None)
            .unwrap();
        clock.advance(300_001);
        assert!(cache.get_page("a").is_none());
        assert!(cache.get_page("a").is_none(), "tombstones stay empty");

        cache
            .set_json(EntityType::Page, json!({"id": 1, "handle": "a"}), None)
            .unwrap();

        assert_eq!(cache.len(), 1);
        assert!(cache.get_page("a").is_some());
    }

    #[test]
    fn test_collection_update_keeps_first_seen_products() {
        let (mut cache, _clock) = cache();
        for title in ["Old", "New"] {
            let products = json!([{"id": 1, "handle": "p", "title": title}]);
            cache
                .set_json(
                    EntityType::Collection,
                    json!({"id": 2, "handle": "c", "products": products}),
                    None,
                )
                .unwrap();
        }

        assert_eq!(cache.get_product("p").unwrap().title(), Some("Old"));
        let collection = cache.get_collection("c").unwrap();
        assert_eq!(collection.products()[0].title(), Some("New"));
    }

    #[test]
    fn test_get_by_id_spans_types() {
        let (mut cache, _clock) = cache();
        cache
            .set_json(EntityType::Page, json!({"id": 1, "handle": "a"}), None)
            .unwrap();

        let entity = cache.get(EntityId::new(1)).unwrap();
        assert_eq!(entity.entity_type(), EntityType::Page);
        assert!(cache.get(EntityId::new(2)).is_none());
        assert!(cache.get_variant(EntityId::new(1)).is_none());
    }

    #[test]
    fn test_handle_less_product_is_reachable_by_id() {
        let (mut cache, _clock) = cache();
        let product = json!({"id": 1, "title": "Hat", "variants": [{"id": 10}]});
        cache.set_json(EntityType::Product, product, None).unwrap();

        let entity = cache.get(EntityId::new(1)).unwrap();
        assert_eq!(entity.handle(), None);
        assert_eq!(entity.as_product().unwrap().title(), Some("Hat"));
        assert!(cache.get_variant(EntityId::new(10)).is_some());
        assert_eq!(cache.stats().handles.get(&EntityType::Product), Some(&0));
    }

    #[test]
    fn test_collection_with_handle_less_product_is_cached() {
        let (mut cache, _clock) = cache();
        let collection = json!({
            "id": 2,
            "handle": "c",
            "products": [{"id": 1}, {"id": 3, "handle": "q"}]
        });
        cache
            .set_json(EntityType::Collection, collection, None)
            .unwrap();

        assert_eq!(cache.get_collection("c").unwrap().products().len(), 2);
        assert!(cache.get(EntityId::new(1)).is_some());
        assert_eq!(cache.get_product("q").unwrap().id, EntityId::new(3));
    }

    #[test]
    fn test_unknown_handle_is_a_miss() {
        let (mut cache, _clock) = cache();
        cache
            .set_json(EntityType::Page, json!({"id": 1, "handle": "a"}), None)
            .unwrap();

        assert!(cache.get_product("a").is_none());
        assert!(cache.get_page("b").is_none());
    }

    #[test]
    fn test_set_json_rejects_record_without_id() {
        let (mut cache, _clock) = cache();
        let err = cache
            .set_json(EntityType::Product, json!({"handle": "p"}), None)
            .unwrap_err();

        assert!(matches!(
            err,
            CacheError::InvalidEntity {
                entity_type: EntityType::Product,
                ..
            }
        ));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_read_cache_is_a_copy() {
        let (mut cache, clock) = cache();
        cache
            .set_json(EntityType::Page, json!({"id": 1, "handle": "a"}), None)
            .unwrap();
        let exported = cache.read_cache();

        clock.advance(300_001);
        cache.evict_expired();

        assert!(exported[0].is_some());
        assert_eq!(cache.read_cache(), vec![None]);
    }

    #[test]
    fn test_write_cache_rebuilds_indexes() {
        let (mut source, _clock) = cache();
        source
            .set_json(EntityType::Page, json!({"id": 1, "handle": "a"}), None)
            .unwrap();
        source
            .set_json(EntityType::Page, json!({"id": 2, "handle": "b"}), Some(START - 1))
            .unwrap();
        assert!(source.get_page("b").is_none());

        let (mut target, _clock) = cache();
        target.write_cache(source.read_cache());

        assert_eq!(target.len(), 1);
        assert!(target.get_page("a").is_some());
        assert!(target.get_page("b").is_none());
    }

    #[test]
    fn test_evict_expired_counts_and_is_monotonic() {
        let (mut cache, clock) = cache();
        cache
            .set_json(EntityType::Page, json!({"id": 1, "handle": "a"}), Some(START + 10))
            .unwrap();
        cache
            .set_json(
                EntityType::Page,
                json!({"id": 2, "handle": "b"}),
                Some(START + 1_000),
            )
            .unwrap();

        clock.advance(11);
        assert_eq!(cache.evict_expired(), 1);
        assert_eq!(cache.evict_expired(), 0);

        clock.set(START);
        assert!(cache.get_page("a").is_none(), "evicted slots never come back");
        assert!(cache.get_page("b").is_some());
    }

    #[test]
    fn test_stats_do_not_evict() {
        let (mut cache, clock) = cache();
        set_product_with_variant(&mut cache);
        cache
            .set_json(EntityType::Page, json!({"id": 5, "handle": "about"}), Some(START + 10))
            .unwrap();
        clock.advance(11);

        let stats = cache.stats();
        assert_eq!(stats.positions, 3);
        assert_eq!(stats.live, 3);
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.tombstones, 0);
        assert_eq!(stats.handles.get(&EntityType::Product), Some(&1));
        assert_eq!(stats.handles.get(&EntityType::Collection), Some(&0));

        cache.evict_expired();
        let stats = cache.stats();
        assert_eq!(stats.live, 2);
        assert_eq!(stats.expired, 0);
        assert_eq!(stats.tombstones, 1);
    }

    #[test]
    fn test_from_store_uses_store_verbatim() {
        let mut store = CacheData::new();
        let page = json!({"id": 1, "handle": "a", "__expires": START + 1});
        store.index_entity(Entity::from_json(EntityType::Page, page).unwrap());

        let mut cache = Cache::from_store(CacheOptions::default(), store.clone());
        assert_eq!(cache.store(), &store);
        assert!(cache.get_page("a").is_some());
    }

    #[test]
    fn test_imported_record_without_expiry_stays_live() {
        let (mut cache, clock) = cache();
        let record = json!({"__type": "page", "id": 1, "handle": "a"});
        cache.write_cache(vec![Some(serde_json::from_value(record).unwrap())]);

        clock.advance(365 * 24 * 3_600_000);
        assert!(cache.get_page("a").is_some());
        assert_eq!(cache.evict_expired(), 0);
    }
}
