//! Catalog types shared by the cache and its callers.

pub mod entity;
pub mod entity_type;
pub mod id;

pub use entity::{Collection, Entity, ExtraFields, NEVER_EXPIRES, Page, Product, Variant};
pub use entity_type::{EntityType, ParseEntityTypeError};
pub use id::EntityId;
