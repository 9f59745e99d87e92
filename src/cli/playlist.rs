use std::time::Duration;

use chrono::Utc;
use tabled::Table;

use super::{load_token_manager, signal::SignalWatch};
use crate::{
    config, error, info,
    management::CreatedPlaylistsManager,
    pool::{self, PoolFilter, PoolSource, PoolStats},
    selector::{CancelToken, SelectionError},
    spotify::{self, playlist::ADD_TRACKS_CHUNK},
    success,
    types::{CreatedPlaylist, Track},
    utils, warning,
};

/// Everything `playtimer playlist` needs to build one playlist.
#[derive(Debug, Clone, Default)]
pub struct PlaylistRequest {
    pub minutes: u64,
    pub source: PoolSource,
    pub filter: PoolFilter,
    /// Overrides the configured selection budget.
    pub timeout: Option<Duration>,
    /// Playlist name, `"<minutes> min"` when absent.
    pub name: Option<String>,
    pub dry_run: bool,
}

impl PlaylistRequest {
    pub fn playlist_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("{} min", self.minutes))
    }
}

/// Selects tracks for the requested running time and saves them as a playlist.
///
/// Ctrl-C while searching cancels the selection. Ctrl-C while saving stops
/// the program; a playlist created so far stays on record for
/// `playtimer playlist delete`.
pub async fn playlist(request: PlaylistRequest) {
    let target_ms = utils::minutes_to_ms(request.minutes);

    let candidates = match pool::load_pool(request.source, &request.filter).await {
        Ok(tracks) => tracks,
        Err(e) => error!("{}", e),
    };

    let selector = config::selector(request.timeout);
    let stats = PoolStats::of(&candidates);
    info!(
        "Selecting {} from {} {} tracks ({}) within {}s...",
        utils::format_duration_ms(target_ms),
        stats.tracks,
        request.source,
        utils::format_duration_ms(stats.total_ms),
        selector.budget().as_secs()
    );

    let mut interrupt = SignalWatch::new(tokio::signal::ctrl_c());
    let cancel = CancelToken::new();

    let pb = spotify::artists::spinner("Searching for a matching combination...");
    let report = {
        let selection = selector.select_with_report(candidates, target_ms, &cancel);
        tokio::pin!(selection);

        tokio::select! {
            report = &mut selection => report,
            _ = interrupt.fired() => {
                cancel.cancel();
                selection.await
            }
        }
    };
    pb.finish_and_clear();

    let tracks = match report.outcome.into_result() {
        Ok(tracks) => tracks,
        Err(e) => error!("{}", describe_failure(&e)),
    };

    if interrupt.has_fired() {
        error!("Interrupted.");
    }

    let total_ms: u64 = tracks.iter().map(|t| t.duration_ms).sum();
    success!(
        "Found {} tracks running {} after {} attempts.",
        tracks.len(),
        utils::format_duration_ms(total_ms),
        report.attempts
    );
    println!("{}", Table::new(utils::track_table_rows(&tracks)));

    if request.dry_run {
        return;
    }

    let name = request.playlist_name();
    tokio::select! {
        _ = save_playlist(&name, request.minutes, &tracks) => {}
        _ = interrupt.fired() => {
            error!(
                "Interrupted while saving {}. Run playtimer playlist delete to remove unfinished playlists.",
                name
            );
        }
    }
}

/// Message shown to the user for a failed selection, with a hint what to change.
pub fn describe_failure(err: &SelectionError) -> String {
    match err {
        SelectionError::PoolEmpty => {
            format!("{}. Loosen the filters or run playtimer tracks update.", err)
        }
        SelectionError::PoolInsufficientDuration { .. } => {
            format!("{}. Ask for fewer minutes or use a larger source.", err)
        }
        SelectionError::NoFeasibleCombinationBeforeTimeout { .. } => {
            format!("{}. Try again or raise --timeout.", err)
        }
        SelectionError::Cancelled => format!("{}.", err),
    }
}

async fn save_playlist(name: &str, minutes: u64, tracks: &[Track]) {
    let mut token_mgr = load_token_manager().await;
    let mut created_mgr = match CreatedPlaylistsManager::load_or_empty().await {
        Ok(mgr) => mgr,
        Err(e) => {
            warning!("Cannot read created playlists, starting a new list. Err: {}", e);
            CreatedPlaylistsManager::new(Vec::new())
        }
    };

    match spotify::playlist::exists(&mut token_mgr, name).await {
        Ok(true) => warning!("A playlist named {} already exists, creating another one.", name),
        Ok(false) => {}
        Err(e) => warning!("Failed to check if playlist exists: {}", e),
    }

    let description = format!("{} minutes of music, picked by playtimer.", minutes);
    let playlist_id = match spotify::playlist::create(&mut token_mgr, name.to_string(), description)
        .await
    {
        Ok(resp) => resp.id,
        Err(e) => error!("Failed to create playlist: {}", e),
    };

    created_mgr.add(CreatedPlaylist {
        id: playlist_id.clone(),
        name: name.to_string(),
        track_count: tracks.len(),
        created_at: Utc::now().timestamp(),
    });
    persist_created(&created_mgr).await;

    for chunk in tracks.chunks(ADD_TRACKS_CHUNK) {
        if let Err(e) = spotify::playlist::add_tracks(&mut token_mgr, &playlist_id, chunk).await {
            // no half filled playlists on the account
            match spotify::playlist::unfollow(&mut token_mgr, &playlist_id).await {
                Ok(()) => {
                    created_mgr.remove(&playlist_id);
                    persist_created(&created_mgr).await;
                }
                Err(unfollow_err) => warning!(
                    "Failed to remove unfinished playlist {}: {}",
                    name, unfollow_err
                ),
            }
            error!("Failed to add tracks to playlist {}: {}", name, e);
        }
    }

    success!("Playlist {} created with {} tracks.", name, tracks.len());
}

async fn persist_created(created_mgr: &CreatedPlaylistsManager) {
    if let Err(e) = created_mgr.persist().await {
        warning!("Cannot cache created playlists. Err: {}", e);
    }
}

/// Removes every playlist playtimer created from the user's account.
///
/// Playlists that cannot be removed stay on record for the next run.
pub async fn delete_playlists() {
    let mut created_mgr = match CreatedPlaylistsManager::load_or_empty().await {
        Ok(mgr) => mgr,
        Err(e) => error!("Cannot read created playlists. Err: {}", e),
    };

    if created_mgr.is_empty() {
        info!("No playlists created by playtimer.");
        return;
    }

    let mut token_mgr = load_token_manager().await;
    let playlists = created_mgr.get_playlists().to_vec();
    let mut failed = 0;

    for playlist in &playlists {
        match spotify::playlist::unfollow(&mut token_mgr, &playlist.id).await {
            Ok(()) => {
                created_mgr.remove(&playlist.id);
                info!("Deleted playlist {}.", playlist.name);
            }
            Err(e) => {
                failed += 1;
                warning!("Failed to delete playlist {}: {}", playlist.name, e);
            }
        }
    }

    let stored = if created_mgr.is_empty() {
        created_mgr.clear().await
    } else {
        created_mgr.persist().await
    };
    if let Err(e) = stored {
        warning!("Cannot update created playlists cache. Err: {}", e);
    }

    if failed > 0 {
        error!("{} of {} playlists could not be deleted.", failed, playlists.len());
    }
    success!("Deleted {} playlists.", playlists.len());
}
