use crate::{
    info,
    management::FollowedArtistsManager,
    pool::{self, PoolFilter, PoolSource, PoolStats},
    spotify, utils, warning,
};

use super::load_token_manager;

/// Displays cache statistics.
///
/// - `pool` - track count and running time of every pool source
/// - `artists` - followed artists in the cache against the remote count
///
/// Without a flag the pool statistics are shown.
pub async fn info(pool: bool, artists: bool) {
    if pool || !artists {
        for source in [PoolSource::Favorites, PoolSource::Artists, PoolSource::Catalog] {
            match pool::load_pool(source, &PoolFilter::default()).await {
                Ok(tracks) => {
                    let stats = PoolStats::of(&tracks);
                    info!(
                        "Pool {}: {} tracks, {}",
                        source,
                        stats.tracks,
                        utils::format_duration_ms(stats.total_ms)
                    );
                }
                Err(e) => warning!("Pool {}: {}", source, e),
            }
        }
    }

    if artists {
        let artist_cache_count = match FollowedArtistsManager::load().await {
            Ok(mgr) => mgr.count(),
            Err(_) => 0,
        };

        let mut token_mgr = load_token_manager().await;
        let token = token_mgr.get_valid_token().await;
        let artist_remote_count = match spotify::artists::get_total_artist_count(&token).await {
            Ok(c) => c,
            Err(e) => {
                warning!("Cannot fetch remote artist count: {}", e);
                0
            }
        };

        info!("Artist count cache: {}", artist_cache_count);
        info!("Artist count remote: {}", artist_remote_count);
        if artist_cache_count < artist_remote_count {
            warning!(
                "Artist count cache is outdated by {}.",
                artist_remote_count - artist_cache_count
            );
        }
    }
}
