//! Configuration management for spopify.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults for the enrichment tuning knobs
//!
//! Credentials and endpoints have no defaults; their accessors panic with
//! the name of the missing variable.

use std::{env, path::PathBuf, str::FromStr, time::Duration};

/// Root of everything spopify stores locally.
///
/// - Linux: `~/.local/share/spopify`
/// - macOS: `~/Library/Application Support/spopify`
/// - Windows: `%LOCALAPPDATA%/spopify`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spopify");
    path
}

/// Loads `.env` from the data directory, creating the directory if needed.
///
/// A missing file is fine, the variables may already be in the environment.
/// A file that exists but cannot be parsed is an error.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))
}

/// Parses an optional variable, falling back to `default` when it is unset
/// or does not parse.
pub fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Reads an optional duration given in milliseconds.
pub fn env_millis(key: &str, default: Duration) -> Duration {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(default)
}

/// Address of the local HTTP server (OAuth callback and API), e.g.
/// `127.0.0.1:5000`.
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").expect("SERVER_ADDRESS must be set")
}

/// Spotify user id owning created playlists. Falls back to the id of the
/// authenticated user when unset.
pub fn spotify_user() -> Option<String> {
    env::var("SPOTIFY_USER_ID").ok().filter(|v| !v.is_empty())
}

pub fn spotify_client_id() -> String {
    env::var("SPOTIFY_API_AUTH_CLIENT_ID").expect("SPOTIFY_API_AUTH_CLIENT_ID must be set")
}

/// Callback URL registered with the Spotify application, e.g.
/// `http://127.0.0.1:5000/callback`.
pub fn spotify_redirect_uri() -> String {
    env::var("SPOTIFY_API_REDIRECT_URI").expect("SPOTIFY_API_REDIRECT_URI must be set")
}

/// e.g. `user-read-private playlist-read-private playlist-modify-public playlist-modify-private`
pub fn spotify_scope() -> String {
    env::var("SPOTIFY_API_AUTH_SCOPE").expect("SPOTIFY_API_AUTH_SCOPE must be set")
}

/// e.g. `https://accounts.spotify.com/authorize`
pub fn spotify_apiauth_url() -> String {
    env::var("SPOTIFY_API_AUTH_URL").expect("SPOTIFY_API_AUTH_URL must be set")
}

/// e.g. `https://api.spotify.com/v1`
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").expect("SPOTIFY_API_URL must be set")
}

/// e.g. `https://accounts.spotify.com/api/token`
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL").expect("SPOTIFY_API_TOKEN_URL must be set")
}

/// e.g. `https://ws.audioscrobbler.com/2.0/`
pub fn lastfm_apiurl() -> String {
    env::var("LASTFM_API_URL").expect("LASTFM_API_URL must be set")
}

pub fn lastfm_api_key() -> String {
    env::var("LASTFM_API_KEY").expect("LASTFM_API_KEY must be set")
}

/// How many of an artist's top Last.fm tags are used.
pub fn lastfm_tag_limit() -> usize {
    env_or("LASTFM_TAG_LIMIT", 5)
}
