//! # API Module
//!
//! HTTP endpoints of the short-lived local server started during
//! `playtimer auth`.
//!
//! - [`callback`] - receives the authorization code from Spotify and
//!   completes the PKCE token exchange
//! - [`health`] - reports status and version
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use playtimer::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
