use std::path::PathBuf;

use super::cache::{CacheError, read_json, write_json};
use crate::{config, types::Track, utils};

pub const POOL_FAVORITES: &str = "favorites";
pub const POOL_ARTIST_TRACKS: &str = "artist-tracks";

/// JSON snapshot of one track pool, e.g. the user's saved tracks.
pub struct TrackPoolManager {
    pool_name: String,
    tracks: Vec<Track>,
}

impl TrackPoolManager {
    pub fn new(pool_name: &str, tracks: Option<Vec<Track>>) -> Self {
        Self {
            pool_name: pool_name.to_string(),
            tracks: tracks.unwrap_or_default(),
        }
    }

    pub async fn load_from_cache(&self) -> Result<Self, CacheError> {
        let tracks = read_json(&self.get_path()).await?;
        Ok(Self {
            pool_name: self.pool_name.clone(),
            tracks,
        })
    }

    pub async fn save_to_cache(&self) -> Result<(), CacheError> {
        write_json(&self.get_path(), &self.tracks).await
    }

    /// Appends `tracks`, dropping ids already in the pool and unplayable
    /// entries.
    pub fn add_tracks(&mut self, tracks: Vec<Track>) -> &mut Self {
        self.tracks
            .extend(tracks.into_iter().filter(Track::is_playable));
        utils::remove_duplicate_tracks(&mut self.tracks);
        self
    }

    pub fn replace_tracks(&mut self, tracks: Vec<Track>) -> &mut Self {
        self.tracks.clear();
        self.add_tracks(tracks)
    }

    pub fn get_tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn into_tracks(self) -> Vec<Track> {
        self.tracks
    }

    pub fn count(&self) -> usize {
        self.tracks.len()
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.tracks.iter().map(|t| t.duration_ms).sum()
    }

    fn get_path(&self) -> PathBuf {
        config::data_dir().join(format!(
            "cache/pools/{pool}.json",
            pool = self.pool_name
        ))
    }
}
