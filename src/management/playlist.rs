use std::path::PathBuf;

use super::cache::{CacheError, read_json, write_json};
use crate::{config, types::CreatedPlaylist};

/// Playlists created by playtimer on the user's account.
#[derive(Debug)]
pub struct CreatedPlaylistsManager {
    playlists: Vec<CreatedPlaylist>,
}

impl CreatedPlaylistsManager {
    pub fn new(playlists: Vec<CreatedPlaylist>) -> Self {
        Self { playlists }
    }

    pub async fn load() -> Result<Self, CacheError> {
        let playlists = read_json(&Self::cache_path()).await?;
        Ok(Self { playlists })
    }

    /// Like [`load`](Self::load), but a missing cache is an empty list.
    pub async fn load_or_empty() -> Result<Self, CacheError> {
        match Self::load().await {
            Ok(mgr) => Ok(mgr),
            Err(e) if e.is_not_found() => Ok(Self::new(Vec::new())),
            Err(e) => Err(e),
        }
    }

    pub async fn persist(&self) -> Result<(), CacheError> {
        write_json(&Self::cache_path(), &self.playlists).await
    }

    pub fn add(&mut self, playlist: CreatedPlaylist) -> &mut Self {
        self.playlists.retain(|p| p.id != playlist.id);
        self.playlists.push(playlist);
        self
    }

    /// Forgets the playlist with `id`, returning whether it was known.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.playlists.len();
        self.playlists.retain(|p| p.id != id);
        self.playlists.len() != before
    }

    pub fn get_playlists(&self) -> &[CreatedPlaylist] {
        &self.playlists
    }

    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }

    /// Empties the list and removes the cache file.
    pub async fn clear(&mut self) -> Result<(), CacheError> {
        self.playlists.clear();
        match async_fs::remove_file(Self::cache_path()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::IoError(e)),
        }
    }

    fn cache_path() -> PathBuf {
        config::data_dir().join("cache/created-playlists.json")
    }
}
