//! Flat entity store with id and handle indexes.
//!
//! `data` is an arena: records are only ever appended, and a position, once
//! handed out, keeps pointing at the same id for the store's lifetime. Expired
//! records are replaced with `None` in place and positions are never reused or
//! renumbered. Both indexes hold positions into `data`.

use std::collections::HashMap;

use catalog_cache_core::{Entity, EntityId, EntityType, Product, Variant};
use tracing::{debug, trace};

/// Records nested inside a parent that are indexed alongside it.
enum Nested {
    Variants(Vec<Variant>),
    Products(Vec<Product>),
    None,
}

impl Nested {
    fn of(entity: &Entity) -> Self {
        match entity {
            Entity::Product(p) => Self::Variants(p.variants().to_vec()),
            Entity::Collection(c) => Self::Products(c.products().to_vec()),
            Entity::Page(_) | Entity::Variant(_) => Self::None,
        }
    }
}

/// The cache's internal state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheData {
    ids: HashMap<EntityId, usize>,
    handles: HashMap<EntityType, HashMap<String, usize>>,
    data: Vec<Option<Entity>>,
}

impl CacheData {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fresh store from a previously exported `data` sequence.
    ///
    /// Tombstones are dropped rather than kept positionally, so positions in
    /// the result are not those of the export.
    #[must_use]
    pub fn rebuild<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<Entity>>,
    {
        let mut store = Self::new();
        for entity in values.into_iter().flatten() {
            store.index_entity(entity);
        }
        debug!(positions = store.data.len(), "Rebuilt cache store");
        store
    }

    /// Insert `entity` and link it into the indexes, together with any
    /// variants or products nested inside it.
    ///
    /// Returns `true` if the entity's id was not yet known. An existing record
    /// under the same id is left as is; replacing it is up to the caller.
    /// Handles are first come, first served: a handle already registered for
    /// the entity's type is never repointed.
    pub fn index_entity(&mut self, entity: Entity) -> bool {
        let entity_type = entity.entity_type();
        let handle = entity.handle().map(str::to_owned);
        let nested = Nested::of(&entity);

        let (position, created) = match self.ids.get(&entity.id()) {
            Some(&position) => (position, false),
            None => (self.append(entity), true),
        };

        if let Some(handle) = handle {
            self.register_handle(entity_type, handle, position);
        }

        match nested {
            Nested::Variants(variants) => {
                for variant in variants {
                    self.upsert_variant(variant);
                }
            }
            Nested::Products(products) => {
                for product in products {
                    self.link_nested_product(product);
                }
            }
            Nested::None => {}
        }

        created
    }

    /// Replace the record stored under `entity`'s id.
    ///
    /// Does nothing if the id has never been indexed.
    pub fn overwrite(&mut self, entity: Entity) {
        let Some(&position) = self.ids.get(&entity.id()) else {
            return;
        };
        if let Some(slot) = self.data.get_mut(position) {
            *slot = Some(entity);
        }
    }

    /// Tombstone the slot at `position`, returning the record it held.
    pub(crate) fn tombstone(&mut self, position: usize) -> Option<Entity> {
        self.data.get_mut(position).and_then(Option::take)
    }

    /// Position recorded for `id`.
    #[must_use]
    pub fn position_of(&self, id: EntityId) -> Option<usize> {
        self.ids.get(&id).copied()
    }

    /// Position registered for `handle` under `entity_type`.
    #[must_use]
    pub fn position_by_handle(&self, entity_type: EntityType, handle: &str) -> Option<usize> {
        self.handles
            .get(&entity_type)
            .and_then(|handles| handles.get(handle))
            .copied()
    }

    /// The record at `position`, or `None` for a tombstone or an unknown
    /// position.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Entity> {
        self.data.get(position).and_then(Option::as_ref)
    }

    /// The flat record sequence, tombstones included.
    #[must_use]
    pub fn data(&self) -> &[Option<Entity>] {
        &self.data
    }

    /// Number of positions, tombstones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of handles registered for `entity_type`.
    #[must_use]
    pub fn handle_count(&self, entity_type: EntityType) -> usize {
        self.handles.get(&entity_type).map_or(0, HashMap::len)
    }

    fn append(&mut self, entity: Entity) -> usize {
        let position = self.data.len();
        trace!(
            id = %entity.id(),
            entity_type = %entity.entity_type(),
            position,
            "Appending record"
        );
        self.ids.insert(entity.id(), position);
        self.data.push(Some(entity));
        position
    }

    fn register_handle(&mut self, entity_type: EntityType, handle: String, position: usize) {
        self.handles
            .entry(entity_type)
            .or_default()
            .entry(handle)
            .or_insert(position);
    }

    /// Variants always carry the latest value from their parent product.
    fn upsert_variant(&mut self, variant: Variant) {
        match self.ids.get(&variant.id) {
            Some(&position) => {
                if let Some(slot) = self.data.get_mut(position) {
                    *slot = Some(Entity::Variant(variant));
                }
            }
            None => {
                self.append(Entity::Variant(variant));
            }
        }
    }

    /// Products seen through a collection are recorded once and never
    /// refreshed, but their handle is linked even when the id was known.
    /// Their own variants are not indexed until the product itself is.
    fn link_nested_product(&mut self, product: Product) {
        let handle = product.handle.clone();
        let position = match self.ids.get(&product.id) {
            Some(&position) => position,
            None => self.append(Entity::Product(product)),
        };
        if let Some(handle) = handle {
            self.register_handle(EntityType::Product, handle, position);
        }
    }
}
