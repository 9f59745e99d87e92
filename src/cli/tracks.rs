use std::time::Duration;

use tokio::time::sleep;

use super::load_token_manager;
use crate::{
    config, error, info,
    management::{
        FollowedArtistsManager, POOL_ARTIST_TRACKS, POOL_FAVORITES, STATE_TYPE_ARTIST_TRACKS,
        StateManager, TokenManager, TrackPoolManager,
    },
    spotify::{self, tracks::SAVED_TRACKS_PAGE_LIMIT},
    success, utils, warning,
};

const ARTIST_CHUNK: usize = 20;
const ARTIST_CHUNK_PAUSE: Duration = Duration::from_secs(5);

/// Refreshes the track pool caches. Without a flag both pools are updated.
pub async fn update_tracks(favorites: bool, artists: bool, force: bool) {
    let (favorites, artists) = if !favorites && !artists {
        (true, true)
    } else {
        (favorites, artists)
    };

    let mut token_mgr = load_token_manager().await;

    if favorites {
        match update_favorites(&mut token_mgr).await {
            Ok(message) => success!("{}", message),
            Err(e) => error!("Cannot update saved tracks from remote: {}", e),
        }
    }

    if artists {
        match update_artist_tracks(&mut token_mgr, force).await {
            Ok(message) => success!("{}", message),
            Err(e) => error!("Cannot update artist tracks from remote: {}", e),
        }
    }
}

async fn update_favorites(token_mgr: &mut TokenManager) -> Result<String, String> {
    let pb = spotify::artists::spinner("Fetching saved tracks...");

    let mut tracks = Vec::new();
    let mut offset = 0;
    loop {
        let token = token_mgr.get_valid_token().await;
        let (page, total) =
            spotify::tracks::get_saved_tracks(&token, SAVED_TRACKS_PAGE_LIMIT, offset)
                .await
                .map_err(|e| e.to_string())?;

        offset += SAVED_TRACKS_PAGE_LIMIT;
        tracks.extend(page);
        pb.set_message(format!(
            "Fetched {fetched}/{total} saved tracks...",
            fetched = offset.min(total),
            total = total
        ));

        if offset >= total {
            break;
        }
    }

    pb.finish_and_clear();

    // a full refresh, removed favorites must leave the pool
    let mut pool_mgr = TrackPoolManager::new(POOL_FAVORITES, None);
    pool_mgr.replace_tracks(tracks);
    pool_mgr.save_to_cache().await.map_err(|e| e.to_string())?;

    Ok(format!(
        "Cached {count} saved tracks ({duration}).",
        count = pool_mgr.count(),
        duration = utils::format_duration_ms(pool_mgr.total_duration_ms())
    ))
}

async fn update_artist_tracks(token_mgr: &mut TokenManager, force: bool) -> Result<String, String> {
    let artists = match FollowedArtistsManager::load().await {
        Ok(mgr) => mgr.get_artists().to_vec(),
        Err(e) => {
            return Err(format!(
                "no followed artists cached, run playtimer artists update first ({})",
                e
            ));
        }
    };

    let fresh_state = StateManager::new(STATE_TYPE_ARTIST_TRACKS.to_string());
    let mut state = if force {
        fresh_state
    } else {
        fresh_state
            .load()
            .await
            .unwrap_or_else(|_| StateManager::new(STATE_TYPE_ARTIST_TRACKS.to_string()))
    };

    let fresh_pool = TrackPoolManager::new(POOL_ARTIST_TRACKS, None);
    let mut pool_mgr = if force {
        fresh_pool
    } else {
        fresh_pool
            .load_from_cache()
            .await
            .unwrap_or_else(|_| TrackPoolManager::new(POOL_ARTIST_TRACKS, None))
    };

    let market = config::spotify_market();
    let pb = spotify::artists::spinner("Fetching top tracks of followed artists...");
    let artists_total = artists.len();
    let mut artists_count = 0;

    'chunk: for artist_chunk in artists.chunks(ARTIST_CHUNK) {
        let mut fetched_any = false;

        for artist in artist_chunk {
            artists_count += 1;
            if state.has(&artist.id) {
                pb.set_message(format!(
                    "Tracks of {name} already cached. ({artists_count}/{artists_total})",
                    name = artist.name
                ));
                continue;
            }

            let token = token_mgr.get_valid_token().await;
            match spotify::tracks::get_artist_top_tracks(&artist.id, &token, &market).await {
                Ok(tracks) => {
                    pb.set_message(format!(
                        "Fetched {fetched} tracks of {name}. ({artists_count}/{artists_total})",
                        fetched = tracks.len(),
                        name = artist.name
                    ));
                    pool_mgr.add_tracks(tracks);
                    state.add(artist.id.clone());
                    fetched_any = true;
                }
                Err(e) => {
                    warning!("Failed to load tracks of {}: {}", artist.name, e);
                    artists_count -= 1;
                    break 'chunk;
                }
            }
        }

        persist_progress(&pool_mgr, &state).await;

        if fetched_any && artists_count < artists_total {
            sleep(ARTIST_CHUNK_PAUSE).await;
        }
    }

    pb.finish_and_clear();
    persist_progress(&pool_mgr, &state).await;

    if artists_count < artists_total {
        return Err(format!(
            "stopped after {artists_count}/{artists_total} artists, run the update again to resume"
        ));
    }

    if let Err(e) = state.clear().await {
        warning!("Cannot cleanup state cache. Err: {}", e);
    }

    Ok(format!(
        "Cached {count} tracks of {artists_total} artists ({duration}).",
        count = pool_mgr.count(),
        duration = utils::format_duration_ms(pool_mgr.total_duration_ms())
    ))
}

async fn persist_progress(pool_mgr: &TrackPoolManager, state: &StateManager) {
    if let Err(e) = pool_mgr.save_to_cache().await {
        warning!("Cannot cache artist tracks. Err: {}", e);
    }
    if let Err(e) = state.persist().await {
        warning!("Failed to persist state. Err: {}", e);
    }
}

/// Prints the size of every cached track pool.
pub async fn list_tracks() {
    for name in [POOL_FAVORITES, POOL_ARTIST_TRACKS] {
        match TrackPoolManager::new(name, None).load_from_cache().await {
            Ok(pool_mgr) => info!(
                "{name}: {count} tracks, {duration}",
                count = pool_mgr.count(),
                duration = utils::format_duration_ms(pool_mgr.total_duration_ms())
            ),
            Err(e) if e.is_not_found() => {
                warning!("{name}: not cached, run playtimer tracks update")
            }
            Err(e) => warning!("{name}: cannot read cache. Err: {}", e),
        }
    }
}
