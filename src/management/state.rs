use std::path::PathBuf;

use super::cache::{CacheError, read_json, write_json};
use crate::config;

pub const STATE_TYPE_ARTIST_TRACKS: &str = "state_artist_tracks";

/// Remembers which items a long running update already processed, so an
/// interrupted run can resume.
pub struct StateManager {
    state_type: String,
    state: Vec<String>,
}

impl StateManager {
    pub fn new(state_type: String) -> Self {
        Self {
            state_type,
            state: Vec::new(),
        }
    }

    pub fn add(&mut self, item: String) {
        self.state.push(item);
    }

    pub fn get_state(&self) -> &Vec<String> {
        &self.state
    }

    pub async fn persist(&self) -> Result<(), CacheError> {
        write_json(&self.get_path(), &self.state).await
    }

    pub async fn load(&self) -> Result<Self, CacheError> {
        let state: Vec<String> = read_json(&self.get_path()).await?;
        Ok(Self {
            state_type: self.state_type.clone(),
            state,
        })
    }

    pub fn has(&self, item: &str) -> bool {
        self.state.iter().any(|s| s == item)
    }

    pub async fn clear(&mut self) -> Result<(), CacheError> {
        self.state.clear();
        match async_fs::remove_file(self.get_path()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::IoError(e)),
        }
    }

    fn get_path(&self) -> PathBuf {
        config::data_dir().join(format!(
            "state/{state}.json",
            state = self.state_type
        ))
    }
}
