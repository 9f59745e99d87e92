use reqwest::Client;

use super::send_with_retry;
use crate::{
    config,
    types::{ArtistTopTracksResponse, SavedTracksResponse, SpotifyTrack, Track},
};

/// Largest page `/me/tracks` serves.
pub const SAVED_TRACKS_PAGE_LIMIT: u64 = 50;

/// Fetches one page of the user's saved tracks.
///
/// Returns the tracks together with the total number of saved tracks, so
/// callers can page with `offset` until they have seen `total`.
pub async fn get_saved_tracks(
    token: &str,
    limit: u64,
    offset: u64,
) -> Result<(Vec<Track>, u64), reqwest::Error> {
    let api_url = format!(
        "{uri}/me/tracks?limit={limit}&offset={offset}",
        uri = &config::spotify_apiurl(),
        limit = limit,
        offset = offset
    );

    let client = Client::new();
    let response = send_with_retry(|| client.get(&api_url).bearer_auth(token)).await?;
    let json = response.json::<SavedTracksResponse>().await?;

    let tracks = into_playable(json.items.into_iter().map(|item| item.track));
    Ok((tracks, json.total))
}

/// Fetches the top tracks of an artist in `market`.
pub async fn get_artist_top_tracks(
    artist_id: &str,
    token: &str,
    market: &str,
) -> Result<Vec<Track>, reqwest::Error> {
    let api_url = format!(
        "{uri}/artists/{id}/top-tracks?market={market}",
        uri = &config::spotify_apiurl(),
        id = artist_id,
        market = market
    );

    let client = Client::new();
    let response = send_with_retry(|| client.get(&api_url).bearer_auth(token)).await?;
    let json = response.json::<ArtistTopTracksResponse>().await?;

    Ok(into_playable(json.tracks.into_iter()))
}

/// Converts API tracks, dropping local files and zero length entries.
fn into_playable(tracks: impl Iterator<Item = SpotifyTrack>) -> Vec<Track> {
    tracks
        .filter(|t| t.id.is_some())
        .map(Track::from)
        .filter(Track::is_playable)
        .collect()
}
