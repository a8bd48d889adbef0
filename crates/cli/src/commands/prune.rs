//! Drop expired records from a snapshot.

use std::path::Path;

use tracing::info;

use super::{CommandError, load, save};

/// Evict expired records and write the compacted snapshot to `output`.
///
/// Rebuilding drops tombstones, so the written snapshot holds only live
/// records.
///
/// # Errors
///
/// Returns an error if either file cannot be accessed or the snapshot cannot
/// be decoded.
pub async fn run(path: &Path, output: &Path) -> Result<(), CommandError> {
    let mut cache = load(path).await?;
    let before = cache.len();

    let evicted = cache.evict_expired();
    cache.write_cache(cache.read_cache());

    save(output, &cache).await?;

    info!(
        input = %path.display(),
        output = %output.display(),
        before,
        evicted,
        after = cache.len(),
        "Pruned snapshot"
    );
    Ok(())
}
