//! Configuration management for Playtimer.
//!
//! Values come from environment variables and a `.env` file in the local data
//! directory. Environment variables already set take precedence over the
//! file, since `dotenv` never overrides existing variables.
//!
//! Spotify credentials and endpoints are required and panic with a clear
//! message when missing. Selector tuning values are optional and fall back
//! to the defaults of [`crate::selector`].

use std::{env, path::PathBuf, time::Duration};

use crate::selector::{AllowanceComparison, DEFAULT_BUDGET, SelectionPolicy, Selector};

const APP_DIR: &str = "playtimer";

/// Returns the directory where tokens, caches and the `.env` file live.
///
/// `PLAYTIMER_DATA_DIR` replaces the whole path when set. Otherwise this is
/// the platform local data directory joined with `playtimer`:
/// - Linux: `~/.local/share/playtimer`
/// - macOS: `~/Library/Application Support/playtimer`
/// - Windows: `%LOCALAPPDATA%/playtimer`
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = env::var("PLAYTIMER_DATA_DIR") {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

/// Loads environment variables from `<data_dir>/.env`.
///
/// Creates the data directory if needed. A missing `.env` file is not an
/// error, all values may come from the process environment instead.
///
/// # Errors
///
/// Returns an error string if the directory cannot be created or the file
/// exists but cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir)
        .await
        .map_err(|e| e.to_string())?;

    let path = dir.join(".env");
    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))
}

fn required(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} must be set"))
}

/// Address the local OAuth callback server binds to, e.g. `127.0.0.1:8080`.
pub fn server_addr() -> String {
    required("SERVER_ADDRESS")
}

/// Spotify user that owns created playlists.
pub fn spotify_user() -> String {
    required("SPOTIFY_USER_ID")
}

pub fn spotify_client_id() -> String {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// Must match the redirect URI registered for the Spotify application.
pub fn spotify_redirect_uri() -> String {
    required("SPOTIFY_API_REDIRECT_URI")
}

/// Requested permissions, e.g.
/// `user-follow-read user-library-read playlist-read-private playlist-modify-private`.
pub fn spotify_scope() -> String {
    required("SPOTIFY_API_AUTH_SCOPE")
}

/// e.g. `https://accounts.spotify.com/authorize`
pub fn spotify_apiauth_url() -> String {
    required("SPOTIFY_API_AUTH_URL")
}

/// e.g. `https://api.spotify.com/v1`
pub fn spotify_apiurl() -> String {
    required("SPOTIFY_API_URL")
}

/// e.g. `https://accounts.spotify.com/api/token`
pub fn spotify_apitoken_url() -> String {
    required("SPOTIFY_API_TOKEN_URL")
}

/// Market used when fetching artist top tracks. Defaults to `US`.
pub fn spotify_market() -> String {
    env::var("SPOTIFY_MARKET")
        .ok()
        .map(|m| m.trim().to_ascii_uppercase())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "US".to_string())
}

/// Time budget of one selection, from `PLAYTIMER_SELECT_TIMEOUT_SECS`.
///
/// Unset, unparsable or zero values fall back to the selector default.
pub fn select_timeout() -> Duration {
    env::var("PLAYTIMER_SELECT_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_BUDGET)
}

/// Allowance comparison mode, from `PLAYTIMER_ALLOWANCE_COMPARISON`.
pub fn allowance_comparison() -> AllowanceComparison {
    match env::var("PLAYTIMER_ALLOWANCE_COMPARISON") {
        Ok(value) => value.parse().unwrap_or_else(|e| {
            tracing::warn!("PLAYTIMER_ALLOWANCE_COMPARISON: {}", e);
            AllowanceComparison::default()
        }),
        Err(_) => AllowanceComparison::default(),
    }
}

/// Builds a [`Selector`] from the environment, optionally overriding the budget.
pub fn selector(timeout: Option<Duration>) -> Selector {
    let policy = SelectionPolicy::default().with_comparison(allowance_comparison());
    Selector::new(policy, timeout.unwrap_or_else(select_timeout))
}
