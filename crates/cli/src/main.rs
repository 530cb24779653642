//! `encore` command-line front end.
//!
//! Drives the session manager and API client the way the web UI would:
//! print the login URL, feed back the redirected URL, then fetch resources.
//!
//! Command output goes to stdout as pretty JSON; logs go to stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use encore_common::auth::{MemoryNavigator, Navigator};
use encore_domain::Config;
use encore_infra::{build_api_client, build_session, HttpClient, SpotifyClient, SpotifySession};
use serde::Serialize;
use url::Url;

#[derive(Parser)]
#[command(name = "encore")]
#[command(author, version, about = "Spotify listening overview", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (JSON or TOML)
    #[arg(long, global = true, env = "ENCORE_CONFIG")]
    config: Option<PathBuf>,

    /// Origin the redirect URI is derived from
    #[arg(long, global = true)]
    origin: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the authorization URL to open in a browser
    Login,

    /// Complete a login with the URL the provider redirected to
    Callback {
        /// Full redirected URL, including `?code=...`
        url: String,
    },

    /// Show whether a session is stored
    Status,

    /// Forget the stored session
    Logout,

    /// Current user's profile
    Profile,

    /// Followed artists
    Artists {
        /// Top artists instead of followed ones
        #[arg(long)]
        top: bool,
    },

    /// Top tracks
    Tracks,

    /// Playlists owned or followed
    Playlists,

    /// Items of one playlist
    PlaylistTracks {
        /// Playlist id
        id: String,
    },
}

/// Session and API client sharing one HTTP client
struct App {
    session: Arc<SpotifySession>,
    navigator: Arc<MemoryNavigator>,
    api: SpotifyClient,
}

impl App {
    fn build(config: &Config) -> Result<Self> {
        let origin = Url::parse(&config.session.origin)
            .with_context(|| format!("invalid origin {}", config.session.origin))?;
        let http = HttpClient::from_config(&config.http)?;
        let navigator = Arc::new(MemoryNavigator::new(origin));

        let session = Arc::new(build_session(
            config,
            &http,
            Arc::clone(&navigator) as Arc<dyn Navigator>,
        )?);
        let api = build_api_client(config, http, Arc::clone(&session));

        Ok(Self { session, navigator, api })
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = encore_infra::config::load(cli.config.clone())?;
    if let Some(origin) = &cli.origin {
        config.session.origin.clone_from(origin);
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    encore_infra::init_tracing(&config.logging)?;

    if config.spotify.client_id.is_empty() {
        tracing::warn!("No client id configured; set ENCORE_CLIENT_ID");
    }

    let app = App::build(&config)?;

    match cli.command {
        Commands::Login => {
            println!("{}", app.session.get_auth_url()?);
        }
        Commands::Callback { url } => {
            let url = Url::parse(&url).with_context(|| format!("invalid redirect URL {url}"))?;
            app.navigator.set_current_url(url);
            if app.session.handle_redirect_if_present().await? {
                println!("Connected");
            } else {
                println!("No authorization code in URL");
            }
        }
        Commands::Status => {
            print_json(&serde_json::json!({ "connected": app.session.is_connected() }))?;
        }
        Commands::Logout => {
            app.session.logout();
            println!("Logged out");
        }
        Commands::Profile => print_json(&app.api.profile().await?)?,
        Commands::Artists { top: true } => print_json(&app.api.top_artists().await?)?,
        Commands::Artists { top: false } => print_json(&app.api.followed_artists().await?)?,
        Commands::Tracks => print_json(&app.api.top_tracks().await?)?,
        Commands::Playlists => print_json(&app.api.playlists().await?)?,
        Commands::PlaylistTracks { id } => print_json(&app.api.playlist_tracks(&id).await?)?,
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("encore: {e:#}");
            ExitCode::FAILURE
        }
    }
}
