use reqwest::Client;

use super::send_with_retry;
use crate::{
    config,
    management::TokenManager,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, GetUserPlaylistsResponse, Track,
    },
};

/// Maximum number of tracks Spotify accepts per add request.
pub const ADD_TRACKS_CHUNK: usize = 100;

/// Whether the user already owns a playlist called `name`.
pub async fn exists(token_mgr: &mut TokenManager, name: &str) -> Result<bool, reqwest::Error> {
    let client = Client::new();
    let mut next = Some(format!(
        "{uri}/me/playlists?limit=50",
        uri = &config::spotify_apiurl()
    ));

    while let Some(api_url) = next {
        let token = token_mgr.get_valid_token().await;
        let response = send_with_retry(|| client.get(&api_url).bearer_auth(&token)).await?;
        let page = response.json::<GetUserPlaylistsResponse>().await?;

        if page.items.iter().any(|p| p.name == name) {
            return Ok(true);
        }
        next = page.next;
    }

    Ok(false)
}

/// Creates a private playlist for the configured user.
pub async fn create(
    token_mgr: &mut TokenManager,
    name: String,
    description: String,
) -> Result<CreatePlaylistResponse, reqwest::Error> {
    let api_url = format!(
        "{uri}/users/{user}/playlists",
        uri = &config::spotify_apiurl(),
        user = &config::spotify_user()
    );
    let body = CreatePlaylistRequest {
        name,
        description,
        public: false,
        collaborative: false,
    };

    let token = token_mgr.get_valid_token().await;
    let client = Client::new();
    let response =
        send_with_retry(|| client.post(&api_url).bearer_auth(&token).json(&body)).await?;

    response.json::<CreatePlaylistResponse>().await
}

/// Adds up to [`ADD_TRACKS_CHUNK`] tracks to a playlist, keeping their order.
pub async fn add_tracks(
    token_mgr: &mut TokenManager,
    playlist_id: &str,
    tracks: &[Track],
) -> Result<AddTrackToPlaylistResponse, reqwest::Error> {
    let api_url = format!(
        "{uri}/playlists/{id}/tracks",
        uri = &config::spotify_apiurl(),
        id = playlist_id
    );
    let body = AddTrackToPlaylistRequest {
        uris: tracks.iter().map(|t| t.uri.clone()).collect(),
    };

    let token = token_mgr.get_valid_token().await;
    let client = Client::new();
    let response =
        send_with_retry(|| client.post(&api_url).bearer_auth(&token).json(&body)).await?;

    response.json::<AddTrackToPlaylistResponse>().await
}

/// Removes a playlist from the user's library.
///
/// Spotify has no hard delete; unfollowing your own playlist is how the
/// web client deletes it.
pub async fn unfollow(token_mgr: &mut TokenManager, playlist_id: &str) -> Result<(), reqwest::Error> {
    let api_url = format!(
        "{uri}/playlists/{id}/followers",
        uri = &config::spotify_apiurl(),
        id = playlist_id
    );

    let token = token_mgr.get_valid_token().await;
    let client = Client::new();
    send_with_retry(|| client.delete(&api_url).bearer_auth(&token)).await?;

    Ok(())
}
