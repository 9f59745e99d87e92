use tabled::Table;

use super::load_token_manager;
use crate::{
    error, info,
    management::FollowedArtistsManager,
    spotify, success,
    types::ArtistTableRow,
    warning,
};

pub async fn update_artists(force: bool) {
    let mut token_mgr = load_token_manager().await;
    let token = token_mgr.get_valid_token().await;

    if !force {
        let cached = match FollowedArtistsManager::load().await {
            Ok(mgr) => mgr.count(),
            Err(_) => 0,
        };

        match spotify::artists::get_total_artist_count(&token).await {
            Ok(remote) if remote == cached => {
                success!("Nothing to update here.");
                return;
            }
            Ok(remote) => info!("{} artists cached, {} followed on Spotify.", cached, remote),
            Err(e) => warning!("Cannot fetch remote artist count: {}", e),
        }
    }

    let artists = match spotify::artists::get_all_artists(&token).await {
        Ok(artists) => artists,
        Err(e) => error!("Failed to fetch artists: {}", e),
    };

    // the followed list is the source of truth, unfollowed artists drop out
    let artists_mgr = FollowedArtistsManager::new(artists);
    if let Err(e) = artists_mgr.persist().await {
        error!("Failed to cache artists. Err: {}", e);
    }

    success!("Cached {} artists!", artists_mgr.count());
}

pub async fn list_artists(search: Option<String>) {
    let artists_mgr = match FollowedArtistsManager::load().await {
        Ok(mgr) => mgr,
        Err(e) => {
            warning!(
                "Failed to load artists, run playtimer artists update. Err: {}",
                e
            );
            return;
        }
    };

    let mut artists = artists_mgr.get_artists().to_vec();
    artists.sort_by_key(|a| a.name.to_lowercase());

    if let Some(search) = search {
        let search_term = search.to_lowercase();
        artists.retain(|a| a.name.to_lowercase().contains(&search_term));
    }

    let table_rows: Vec<ArtistTableRow> = artists
        .into_iter()
        .map(|a| ArtistTableRow {
            name: a.name,
            genres: a.genres.iter().take(3).cloned().collect::<Vec<_>>().join(","),
        })
        .collect();

    println!("{}", Table::new(table_rows));
}
