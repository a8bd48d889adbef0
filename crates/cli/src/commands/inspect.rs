//! Snapshot statistics.

use std::path::Path;

use tracing::info;

use super::{CommandError, load};

/// Print record, tombstone and handle counts for a snapshot.
///
/// Counting does not evict: records past their expiry are reported as
/// `expired` but left in place.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be read or decoded.
pub async fn run(path: &Path) -> Result<(), CommandError> {
    let cache = load(path).await?;
    let stats = cache.stats();

    info!(
        path = %path.display(),
        positions = stats.positions,
        live = stats.live,
        expired = stats.expired,
        tombstones = stats.tombstones,
        "Snapshot statistics"
    );
    for (entity_type, count) in &stats.handles {
        info!(%entity_type, handles = count, "Handle index");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::snapshot_file;

    #[tokio::test]
    async fn test_inspect_valid_snapshot() {
        let file = snapshot_file(concat!(
            r#"[{"__type":"product","__expires":0,"id":1,"handle":"p","#,
            r#""variants":[{"id":10,"__expires":0}]}]"#,
        ));
        run(file.path()).await.unwrap();
    }
}
