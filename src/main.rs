use std::{sync::Arc, time::Duration};

use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

use playtimer::{
    cli, config, error,
    pool::{PoolFilter, PoolSource},
    types::PkceToken,
    utils,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Handle followed artists
    Artists(ArtistsOptions),

    /// Handle cached track pools
    Tracks(TracksOptions),

    #[clap(about = "Create a playlist running for the given minutes")]
    Playlist(PlaylistOptions),

    /// Some helper information about pools and artists
    Info(InfoOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
#[command(
    about = "Handle followed artists",
    args_conflicts_with_subcommands = true // disallow mixing --search with subcommands
)]
pub struct ArtistsOptions {
    /// Search for artists
    #[clap(long)]
    pub search: Option<String>,

    #[command(subcommand)]
    pub command: Option<ArtistsSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ArtistsSubcommand {
    /// Update artists
    Update(ArtistsUpdateOpts),
}

#[derive(Parser, Debug, Clone)]
pub struct ArtistsUpdateOpts {
    /// Force update (skip caches/guards)
    #[clap(long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Handle cached track pools")]
pub struct TracksOptions {
    #[command(subcommand)]
    pub command: Option<TracksSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TracksSubcommand {
    /// Update saved and artist tracks from Spotify
    Update(TracksUpdateOpts),
}

#[derive(Parser, Debug, Clone)]
pub struct TracksUpdateOpts {
    /// Only update the saved tracks pool
    #[clap(long)]
    pub favorites: bool,

    /// Only update the followed artists' top tracks pool
    #[clap(long)]
    pub artists: bool,

    /// Refetch every artist instead of resuming
    #[clap(long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
#[command(
    about = "Create a playlist running for the given minutes",
    args_conflicts_with_subcommands = true, // disallow mixing selection flags with `delete`
    subcommand_negates_reqs = true
)]
pub struct PlaylistOptions {
    /// Target running time in minutes
    #[clap(long, short, required = true, value_parser = utils::parse_minutes)]
    minutes: Option<u64>,

    /// Tracks to pick from
    #[clap(long, value_enum, default_value_t = PoolSource::Favorites)]
    source: PoolSource,

    /// Only tracks registered in this country (ISRC prefix)
    #[clap(long, value_parser = utils::parse_market)]
    market: Option<String>,

    /// Only tracks by these artist ids; can be repeated
    #[clap(long = "artist", action = ArgAction::Append, num_args = 1)]
    artists: Vec<String>,

    /// Selection time budget in seconds
    #[clap(long)]
    timeout: Option<u64>,

    /// Playlist name, defaults to "<minutes> min"
    #[clap(long)]
    name: Option<String>,

    /// Print the selection without creating a playlist
    #[clap(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<PlaylistSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PlaylistSubcommand {
    /// Delete every playlist created by playtimer
    Delete,
}

#[derive(Parser, Debug, Clone)]
pub struct InfoOptions {
    #[clap(long)]
    pool: bool,
    #[clap(long)]
    artists: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }
        Command::Artists(opt) => match opt.command {
            Some(ArtistsSubcommand::Update(u)) => cli::update_artists(u.force).await,
            None => cli::list_artists(opt.search).await,
        },
        Command::Tracks(opt) => match opt.command {
            Some(TracksSubcommand::Update(u)) => {
                cli::update_tracks(u.favorites, u.artists, u.force).await
            }
            None => cli::list_tracks().await,
        },
        Command::Playlist(opt) => {
            if let Some(PlaylistSubcommand::Delete) = opt.command {
                cli::delete_playlists().await;
                return;
            }

            let Some(minutes) = opt.minutes else {
                error!("--minutes is required");
            };
            let request = cli::PlaylistRequest {
                minutes,
                source: opt.source,
                filter: PoolFilter {
                    market: opt.market,
                    artist_ids: opt.artists,
                },
                timeout: opt.timeout.filter(|s| *s > 0).map(Duration::from_secs),
                name: opt.name,
                dry_run: opt.dry_run,
            };
            cli::playlist(request).await
        }
        Command::Info(opt) => cli::info(opt.pool, opt.artists).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
