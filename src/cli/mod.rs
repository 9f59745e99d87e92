//! # CLI Module
//!
//! User-facing commands of Playtimer. Each command loads what it needs from
//! the local caches or the Spotify API, reports progress with spinners and
//! the crate's output macros, and exits non-zero on fatal errors.
//!
//! ## Commands
//!
//! - [`auth`] - Spotify OAuth authentication with PKCE
//! - [`update_artists`] / [`list_artists`] - followed artists cache
//! - [`update_tracks`] / [`list_tracks`] - track pool caches (saved tracks,
//!   followed artists' top tracks)
//! - [`playlist`] - select tracks for a running time and create the playlist
//! - [`delete_playlists`] - remove the playlists playtimer created
//! - [`info`] - cache statistics
//!
//! ## Typical Usage
//!
//! ```bash
//! playtimer auth                          # Authenticate with Spotify
//! playtimer artists update                # Cache followed artists
//! playtimer tracks update                 # Cache saved and artist tracks
//! playtimer playlist --minutes 45         # 45 minutes from saved tracks
//! playtimer playlist --minutes 90 --source catalog --market JP
//! ```
//!
//! Commands talk to Spotify through [`crate::spotify`], read and write
//! caches through [`crate::management`] and hand pools to
//! [`crate::selector`].

mod artists;
mod auth;
mod info;
mod playlist;
mod signal;
mod tracks;

pub use artists::list_artists;
pub use artists::update_artists;
pub use auth::auth;
pub use info::info;
pub use playlist::PlaylistRequest;
pub use playlist::delete_playlists;
pub use playlist::describe_failure;
pub use playlist::playlist;
pub use signal::SignalWatch;
pub use tracks::list_tracks;
pub use tracks::update_tracks;

use crate::{error, management::TokenManager};

/// Loads the cached token or exits with a hint to authenticate.
pub(crate) async fn load_token_manager() -> TokenManager {
    match TokenManager::load().await {
        Ok(manager) => manager,
        Err(e) => {
            error!(
                "Failed to load token. Please run playtimer auth\n Error: {}",
                e
            );
        }
    }
}
