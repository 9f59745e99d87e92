//! # Spotify Integration Module
//!
//! Thin client functions for the parts of the Spotify Web API Playtimer
//! needs: the PKCE authorization flow, the user's followed artists and saved
//! tracks, artist top tracks, and playlist creation.
//!
//! ## Endpoints
//!
//! - `GET /me/following?type=artist` - followed artists, cursor paginated
//! - `GET /me/tracks` - saved tracks, offset paginated
//! - `GET /artists/{id}/top-tracks` - top tracks of one artist in a market
//! - `GET /me/playlists` - existing playlists, for duplicate names
//! - `POST /users/{user_id}/playlists` - create a playlist
//! - `POST /playlists/{playlist_id}/tracks` - add up to 100 tracks
//! - `DELETE /playlists/{playlist_id}/followers` - remove a created playlist
//! - `POST /api/token` - code exchange and token refresh
//!
//! ## Error Handling
//!
//! Every request goes through [`send_with_retry`]:
//! - 502 Bad Gateway is retried after 10 seconds
//! - 429 Too Many Requests waits for `Retry-After` when it is at most 120
//!   seconds and then retries; longer waits are reported and returned as
//!   errors
//! - everything else is turned into a `reqwest::Error` via `error_for_status`

pub mod artists;
pub mod auth;
pub mod playlist;
pub mod tracks;

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use tokio::time::sleep;

use crate::warning;

const MAX_RETRY_AFTER_SECS: u64 = 120;
const BAD_GATEWAY_DELAY: Duration = Duration::from_secs(10);

/// Sends the request built by `build`, retrying on 502 and short 429 waits.
pub async fn send_with_retry<F>(build: F) -> Result<Response, reqwest::Error>
where
    F: Fn() -> RequestBuilder,
{
    loop {
        let response = build().send().await?;

        match response.status() {
            StatusCode::BAD_GATEWAY => {
                sleep(BAD_GATEWAY_DELAY).await;
                continue;
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(0);

                if retry_after <= MAX_RETRY_AFTER_SECS {
                    sleep(Duration::from_secs(retry_after.max(1))).await;
                    continue;
                }

                warning!(
                    "Retry after has reached an abnormal high of {} seconds. Try again later.",
                    retry_after
                );
                return response.error_for_status();
            }
            _ => return response.error_for_status(),
        }
    }
}
