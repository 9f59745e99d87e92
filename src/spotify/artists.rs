use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;

use super::send_with_retry;
use crate::{
    config,
    types::{Artist, FollowedArtistsResponse},
};

/// Fetches one page of followed artists, returning the cursor of the next page.
pub async fn get_artist(
    token: &str,
    limit: u64,
    after: Option<String>,
) -> Result<(Vec<Artist>, Option<String>), reqwest::Error> {
    let mut api_url = format!(
        "{uri}/me/following?type=artist&limit={limit}",
        uri = &config::spotify_apiurl(),
        limit = limit
    );
    if let Some(after_val) = &after {
        api_url.push_str(&format!("&after={}", after_val));
    }

    let client = Client::new();
    let response = send_with_retry(|| client.get(&api_url).bearer_auth(token)).await?;

    let res = response.json::<FollowedArtistsResponse>().await?;
    let next_after = res.artists.cursors.and_then(|c| c.after);

    Ok((res.artists.items, next_after))
}

/// Fetches every followed artist, page by page.
pub async fn get_all_artists(token: &str) -> Result<Vec<Artist>, reqwest::Error> {
    let pb = spinner("Fetching followed artists...");
    let mut artists: Vec<Artist> = Vec::new();
    let mut after: Option<String> = None;

    loop {
        let (page, next_after) = match get_artist(token, 50, after.clone()).await {
            Ok(page) => page,
            Err(e) => {
                pb.finish_and_clear();
                return Err(e);
            }
        };

        if page.is_empty() {
            break;
        }

        artists.extend(page);
        pb.set_message(format!("Fetched {} artists...", artists.len()));

        after = next_after;
        if after.is_none() {
            break;
        }
    }

    pb.finish_and_clear();
    Ok(artists)
}

/// Number of artists the user follows according to Spotify.
pub async fn get_total_artist_count(token: &str) -> Result<u64, reqwest::Error> {
    let pb = spinner("Fetching remote artists count...");

    let api_url = format!(
        "{uri}/me/following?type=artist&limit=1",
        uri = &config::spotify_apiurl()
    );

    let client = Client::new();
    let response = send_with_retry(|| client.get(&api_url).bearer_auth(token)).await;
    pb.finish_and_clear();

    let res = response?.json::<FollowedArtistsResponse>().await?;
    Ok(res.artists.total.unwrap_or(0))
}

pub(crate) fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
