//! Snapshot commands.

use std::path::Path;

use catalog_cache::{Cache, CacheError, CacheOptions, ConfigError, EntityType, Snapshot};
use thiserror::Error;

pub mod get;
pub mod inspect;
pub mod prune;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Snapshot file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot could not be decoded or encoded.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Cache options are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No live record under the requested handle.
    #[error("No {0} cached under handle '{1}'")]
    NotFound(EntityType, String),
}

/// Entity types that can be looked up by handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum HandleType {
    Product,
    Collection,
    Page,
}

impl From<HandleType> for EntityType {
    fn from(ty: HandleType) -> Self {
        match ty {
            HandleType::Product => Self::Product,
            HandleType::Collection => Self::Collection,
            HandleType::Page => Self::Page,
        }
    }
}

/// Read a snapshot file and rebuild a cache from it.
pub async fn load(path: &Path) -> Result<Cache, CommandError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| io_error(path, source))?;
    let snapshot = Snapshot::from_json(&text)?;

    tracing::debug!(path = %path.display(), records = snapshot.records().len(), "Loaded snapshot");

    let mut cache = Cache::new(CacheOptions::from_env()?);
    snapshot.restore(&mut cache);
    Ok(cache)
}

/// Write the contents of `cache` to a snapshot file.
pub async fn save(path: &Path, cache: &Cache) -> Result<(), CommandError> {
    let json = Snapshot::capture(cache).to_json()?;
    tokio::fs::write(path, json)
        .await
        .map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: std::io::Error) -> CommandError {
    CommandError::Io {
        path: path.display().to_string(),
        source,
    }
}
