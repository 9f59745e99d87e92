use std::path::PathBuf;

use super::cache::{CacheError, read_json, write_json};
use crate::{config, types::Artist};

/// Local snapshot of the artists the user follows.
pub struct FollowedArtistsManager {
    artists: Vec<Artist>,
}

impl FollowedArtistsManager {
    pub fn new(artists: Vec<Artist>) -> Self {
        Self { artists }
    }

    pub async fn load() -> Result<Self, CacheError> {
        let artists = read_json(&Self::cache_path()).await?;
        Ok(Self { artists })
    }

    pub async fn persist(&self) -> Result<(), CacheError> {
        write_json(&Self::cache_path(), &self.artists).await
    }

    pub fn get_artists(&self) -> &[Artist] {
        &self.artists
    }

    pub fn count(&self) -> u64 {
        self.artists.len() as u64
    }

    fn cache_path() -> PathBuf {
        config::data_dir().join("cache/followed-artists.json")
    }
}
