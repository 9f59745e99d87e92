mod artist;
mod auth;
mod cache;
mod playlist;
mod state;
mod track;

pub use artist::FollowedArtistsManager;
pub use auth::TokenManager;
pub use cache::CacheError;
pub use playlist::CreatedPlaylistsManager;
pub use state::STATE_TYPE_ARTIST_TRACKS;
pub use state::StateManager;
pub use track::POOL_ARTIST_TRACKS;
pub use track::POOL_FAVORITES;
pub use track::TrackPoolManager;
