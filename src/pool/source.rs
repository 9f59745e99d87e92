use std::fmt;

use clap::ValueEnum;
use thiserror::Error;

use super::PoolFilter;
use crate::{
    management::{CacheError, POOL_ARTIST_TRACKS, POOL_FAVORITES, TrackPoolManager},
    types::Track,
    utils,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PoolSource {
    /// Tracks saved in the user's library
    #[default]
    Favorites,
    /// Top tracks of followed artists
    Artists,
    /// Every cached track
    Catalog,
}

impl fmt::Display for PoolSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolSource::Favorites => write!(f, "favorites"),
            PoolSource::Artists => write!(f, "artists"),
            PoolSource::Catalog => write!(f, "catalog"),
        }
    }
}

impl PoolSource {
    fn cache_names(&self) -> &'static [&'static str] {
        match self {
            PoolSource::Favorites => &[POOL_FAVORITES],
            PoolSource::Artists => &[POOL_ARTIST_TRACKS],
            PoolSource::Catalog => &[POOL_FAVORITES, POOL_ARTIST_TRACKS],
        }
    }
}

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("no cached tracks for source '{0}', run playtimer tracks update")]
    MissingCache(PoolSource),
    #[error("cannot read track cache '{name}': {source}")]
    Cache { name: String, source: CacheError },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub tracks: usize,
    pub total_ms: u64,
}

impl PoolStats {
    pub fn of(tracks: &[Track]) -> Self {
        Self {
            tracks: tracks.len(),
            total_ms: tracks.iter().map(|t| t.duration_ms).sum(),
        }
    }
}

/// Reads the pool for `source` from the track caches and applies `filter`.
///
/// The catalog source tolerates one of its caches being absent, the single
/// cache sources do not.
pub async fn load_pool(source: PoolSource, filter: &PoolFilter) -> Result<Vec<Track>, PoolError> {
    let mut tracks: Vec<Track> = Vec::new();
    let mut found = false;

    for name in source.cache_names() {
        match TrackPoolManager::new(name, None).load_from_cache().await {
            Ok(manager) => {
                found = true;
                tracks.extend(manager.into_tracks());
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(pool = name, "track cache missing");
            }
            Err(e) => {
                return Err(PoolError::Cache {
                    name: name.to_string(),
                    source: e,
                });
            }
        }
    }

    if !found {
        return Err(PoolError::MissingCache(source));
    }

    tracks.retain(Track::is_playable);
    utils::remove_duplicate_tracks(&mut tracks);

    let before = tracks.len();
    let tracks = filter.apply(tracks);
    tracing::debug!(
        %source,
        cached = before,
        kept = tracks.len(),
        "track pool loaded"
    );

    Ok(tracks)
}
