//! Look up a single record.

use std::path::Path;

use catalog_cache::EntityType;

use super::{CommandError, load};

/// Print the live record stored under `handle` as pretty JSON.
///
/// # Errors
///
/// Returns `CommandError::NotFound` if the handle is unknown or its record has
/// expired, or an error if the snapshot cannot be read.
#[allow(clippy::print_stdout)]
pub async fn run(path: &Path, entity_type: EntityType, handle: &str) -> Result<(), CommandError> {
    let json = lookup(path, entity_type, handle).await?;
    println!("{json}");
    Ok(())
}

async fn lookup(
    path: &Path,
    entity_type: EntityType,
    handle: &str,
) -> Result<String, CommandError> {
    let mut cache = load(path).await?;
    let entity = cache
        .get_by_handle(entity_type, handle)
        .ok_or_else(|| CommandError::NotFound(entity_type, handle.to_owned()))?;

    serde_json::to_string_pretty(entity).map_err(|e| CommandError::Cache(e.into()))
}
