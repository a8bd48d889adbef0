//! The discriminant carried by every cached entity.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing an [`EntityType`] from a string fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid entity type: {0}")]
pub struct ParseEntityTypeError(String);

/// Kind of catalog entity.
///
/// Serialized as the `__type` tag of a cached record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Product,
    Collection,
    Page,
    /// Product variant. Only ever reached through its parent product.
    Variant,
}

impl EntityType {
    /// Entity types that are addressable by handle.
    pub const HANDLED: [Self; 3] = [Self::Product, Self::Collection, Self::Page];

    /// Whether records of this type carry a handle.
    #[must_use]
    pub const fn has_handle(self) -> bool {
        !matches!(self, Self::Variant)
    }

    /// Lowercase name, as used in the serialized tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Collection => "collection",
            Self::Page => "page",
            Self::Variant => "variant",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityType {
    type Err = ParseEntityTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "product" => Ok(Self::Product),
            "collection" => Ok(Self::Collection),
            "page" => Ok(Self::Page),
            "variant" => Ok(Self::Variant),
            _ => Err(ParseEntityTypeError(s.to_string())),
        }
    }
}
