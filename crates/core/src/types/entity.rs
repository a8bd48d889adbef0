//! Catalog records held by the cache.
//!
//! Records are decoded from the remote catalog API's JSON. Only the fields the
//! cache indexes on are modelled; everything else the API returned is kept in
//! `extra` so it survives an export/import cycle untouched. Modelled fields
//! that may be absent stay absent on export.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{EntityId, EntityType};

/// Fields of a record that the cache does not interpret.
pub type ExtraFields = Map<String, Value>;

/// Expiry of a record that was never stamped: it does not go stale.
pub const NEVER_EXPIRES: i64 = i64::MAX;

const fn never_expires() -> i64 {
    NEVER_EXPIRES
}

fn title(extra: &ExtraFields) -> Option<&str> {
    extra.get("title").and_then(Value::as_str)
}

// =============================================================================
// Variant
// =============================================================================

/// A product variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    /// Variant ID.
    pub id: EntityId,
    /// Epoch milliseconds after which the record is stale.
    #[serde(rename = "__expires", default = "never_expires")]
    pub expires: i64,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Variant {
    /// Variant title, if the API sent one.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        title(&self.extra)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product and its variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: EntityId,
    /// URL handle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    /// Product variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<Variant>>,
    /// Epoch milliseconds after which the record is stale.
    #[serde(rename = "__expires", default = "never_expires")]
    pub expires: i64,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Product {
    /// Product title, if the API sent one.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        title(&self.extra)
    }

    /// Product variants; empty when the record carried none.
    #[must_use]
    pub fn variants(&self) -> &[Variant] {
        self.variants.as_deref().unwrap_or_default()
    }

    fn stamp_expires(&mut self, expires: i64) {
        self.expires = expires;
        for variant in self.variants.iter_mut().flatten() {
            variant.expires = expires;
        }
    }
}

// =============================================================================
// Collection
// =============================================================================

/// A collection of products.
///
/// `products` is only populated once the fetch layer has resolved the
/// collection's products and merged them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Collection ID.
    pub id: EntityId,
    /// URL handle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    /// Products in this collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<Product>>,
    /// Epoch milliseconds after which the record is stale.
    #[serde(rename = "__expires", default = "never_expires")]
    pub expires: i64,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Collection {
    /// Collection title, if the API sent one.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        title(&self.extra)
    }

    /// Products merged into this collection; empty until resolved.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        self.products.as_deref().unwrap_or_default()
    }
}

// =============================================================================
// Page
// =============================================================================

/// A content page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page ID.
    pub id: EntityId,
    /// URL handle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    /// Epoch milliseconds after which the record is stale.
    #[serde(rename = "__expires", default = "never_expires")]
    pub expires: i64,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Page {
    /// Page title, if the API sent one.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        title(&self.extra)
    }
}

// =============================================================================
// Entity
// =============================================================================

/// Any cached catalog record, tagged by its `__type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__type", rename_all = "snake_case")]
pub enum Entity {
    Product(Product),
    Collection(Collection),
    Page(Page),
    Variant(Variant),
}

impl Entity {
    /// Decode an untagged API record as the given entity type.
    ///
    /// Any `__type` already present in `value` is discarded in favour of
    /// `entity_type`.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` does not have the shape of `entity_type`,
    /// including when it has no numeric `id`.
    pub fn from_json(entity_type: EntityType, mut value: Value) -> Result<Self, serde_json::Error> {
        if let Value::Object(map) = &mut value {
            map.remove("__type");
        }

        match entity_type {
            EntityType::Product => serde_json::from_value(value).map(Self::Product),
            EntityType::Collection => serde_json::from_value(value).map(Self::Collection),
            EntityType::Page => serde_json::from_value(value).map(Self::Page),
            EntityType::Variant => serde_json::from_value(value).map(Self::Variant),
        }
    }

    #[must_use]
    pub const fn id(&self) -> EntityId {
        match self {
            Self::Product(p) => p.id,
            Self::Collection(c) => c.id,
            Self::Page(p) => p.id,
            Self::Variant(v) => v.id,
        }
    }

    #[must_use]
    pub const fn entity_type(&self) -> EntityType {
        match self {
            Self::Product(_) => EntityType::Product,
            Self::Collection(_) => EntityType::Collection,
            Self::Page(_) => EntityType::Page,
            Self::Variant(_) => EntityType::Variant,
        }
    }

    /// The record's handle. Variants never have one.
    #[must_use]
    pub fn handle(&self) -> Option<&str> {
        match self {
            Self::Product(p) => p.handle.as_deref(),
            Self::Collection(c) => c.handle.as_deref(),
            Self::Page(p) => p.handle.as_deref(),
            Self::Variant(_) => None,
        }
    }

    #[must_use]
    pub const fn expires(&self) -> i64 {
        match self {
            Self::Product(p) => p.expires,
            Self::Collection(c) => c.expires,
            Self::Page(p) => p.expires,
            Self::Variant(v) => v.expires,
        }
    }

    /// Set the expiry of this record and of every record nested inside it.
    pub fn stamp_expires(&mut self, expires: i64) {
        match self {
            Self::Product(p) => p.stamp_expires(expires),
            Self::Collection(c) => {
                c.expires = expires;
                for product in c.products.iter_mut().flatten() {
                    product.stamp_expires(expires);
                }
            }
            Self::Page(p) => p.expires = expires,
            Self::Variant(v) => v.expires = expires,
        }
    }

    #[must_use]
    pub const fn as_product(&self) -> Option<&Product> {
        match self {
            Self::Product(p) => Some(p),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_collection(&self) -> Option<&Collection> {
        match self {
            Self::Collection(c) => Some(c),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_page(&self) -> Option<&Page> {
        match self {
            Self::Page(p) => Some(p),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_variant(&self) -> Option<&Variant> {
        match self {
            Self::Variant(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Product> for Entity {
    fn from(product: Product) -> Self {
        Self::Product(product)
    }
}

impl From<Collection> for Entity {
    fn from(collection: Collection) -> Self {
        Self::Collection(collection)
    }
}

impl From<Page> for Entity {
    fn from(page: Page) -> Self {
        Self::Page(page)
    }
}

impl From<Variant> for Entity {
    fn from(variant: Variant) -> Self {
        Self::Variant(variant)
    }
}
