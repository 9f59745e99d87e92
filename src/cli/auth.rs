use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{config, info, spotify, types::PkceToken};

/// Authenticates with Spotify and stores the token in the data directory.
pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>) {
    info!(
        "Waiting for the Spotify callback on {}...",
        config::spotify_redirect_uri()
    );
    spotify::auth::auth(shared_state).await;
}
