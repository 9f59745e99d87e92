//! Playtimer CLI Library
//!
//! This library builds Spotify playlists whose running time matches a
//! requested duration. The heart of it is the [`selector`] module, a
//! randomized greedy-fit search wrapped in a bounded-time retry harness.
//! The remaining modules supply the candidate track pool (Spotify API,
//! local JSON caches) and hand the selected tracks back to Spotify.
//!
//! # Modules
//!
//! - `api` - HTTP API endpoints for the local callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `management` - Local JSON caches for tokens, artists and track pools
//! - `pool` - Track pool sources and filters feeding the selector
//! - `selector` - Duration-constrained track selection
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use playtimer::selector::{CancelToken, Outcome, Selector};
//!
//! async fn pick(pool: Vec<playtimer::types::Track>) {
//!     let selector = Selector::default();
//!     match selector.select(pool, 30 * 60_000, &CancelToken::new()).await {
//!         Outcome::Success(tracks) => println!("{} tracks", tracks.len()),
//!         other => println!("{}", other),
//!     }
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod management;
pub mod pool;
pub mod selector;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Prints an informational message with a blue bullet point.
///
/// Accepts the same arguments as `println!`.
///
/// # Example
///
/// ```
/// info!("Loading track pool...");
/// info!("Found {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Accepts the same arguments as `println!`.
///
/// # Example
///
/// ```
/// success!("Playlist created");
/// success!("Cached {} tracks", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// The process terminates with exit code 1 right after printing, so this is
/// meant for fatal errors only.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues the user should notice.
///
/// # Example
///
/// ```
/// warning!("Track cache not found, run playtimer tracks update");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
