//! Configuration management for the Spotify Playlist Builder.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. It provides a centralized way to
//! manage application configuration including Spotify API credentials, the
//! callback server address, and API endpoints.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//!
//! The requested OAuth scope is deliberately not configurable: it is a fixed,
//! documented set of permissions ([`SCOPES`]) that matches what the playlist
//! commands actually need.

use dotenv;
use std::{env, path::PathBuf};

/// Permission scopes requested during authorization.
///
/// Space-joined by [`scope()`] and URL-encoded at the call site when the
/// authorize URL is constructed:
/// - `user-follow-read` - list the user's followed artists
/// - `user-top-read` - read the user's top tracks
/// - `playlist-read-private` - check for existing playlists
/// - `playlist-modify-public` / `playlist-modify-private` - create playlists
///   and add tracks
pub const SCOPES: &[&str] = &[
    "user-follow-read",
    "user-top-read",
    "playlist-read-private",
    "playlist-modify-public",
    "playlist-modify-private",
];

/// Returns the space-joined scope string sent to the authorize endpoint.
pub fn scope() -> String {
    SCOPES.join(" ")
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from `mixcli/.env` under the platform-specific
/// local data directory:
/// - Linux: `~/.local/share/mixcli/.env`
/// - macOS: `~/Library/Application Support/mixcli/.env`
/// - Windows: `%LOCALAPPDATA%/mixcli/.env`
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the `.env`
/// file cannot be read or parsed.
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("mixcli/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    dotenv::from_path(path).map_err(|e| e.to_string())?;
    Ok(())
}

/// Returns the bind address for the local OAuth callback server.
///
/// # Panics
///
/// Panics if the `SERVER_ADDRESS` environment variable is not set.
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").expect("SERVER_ADDRESS must be set")
}

/// Returns the Spotify user ID used for playlist creation.
///
/// # Panics
///
/// Panics if the `SPOTIFY_USER_ID` environment variable is not set.
pub fn spotify_user() -> String {
    env::var("SPOTIFY_USER_ID").expect("SPOTIFY_USER_ID must be set")
}

/// Returns the Spotify API client ID registered for this application.
///
/// # Panics
///
/// Panics if the `SPOTIFY_CLIENT_ID` environment variable is not set.
pub fn spotify_client_id() -> String {
    env::var("SPOTIFY_CLIENT_ID").expect("SPOTIFY_CLIENT_ID must be set")
}

/// Returns the Spotify API client secret.
///
/// # Security Note
///
/// The secret must be kept confidential and never exposed in logs or
/// version control. Shipping it to end users at all is a known weakness of
/// the authorization-code flow with a confidential client; a token-exchange
/// proxy would remove the need for it here.
///
/// # Panics
///
/// Panics if the `SPOTIFY_CLIENT_SECRET` environment variable is not set.
pub fn spotify_client_secret() -> String {
    env::var("SPOTIFY_CLIENT_SECRET").expect("SPOTIFY_CLIENT_SECRET must be set")
}

/// Returns the OAuth redirect URI, which must match the URI registered in
/// the Spotify application settings.
///
/// # Panics
///
/// Panics if the `SPOTIFY_REDIRECT_URI` environment variable is not set.
pub fn spotify_redirect_uri() -> String {
    env::var("SPOTIFY_REDIRECT_URI").expect("SPOTIFY_REDIRECT_URI must be set")
}

/// Returns the Spotify OAuth authorization endpoint URL.
///
/// # Panics
///
/// Panics if the `SPOTIFY_AUTH_URL` environment variable is not set.
pub fn spotify_auth_url() -> String {
    env::var("SPOTIFY_AUTH_URL").expect("SPOTIFY_AUTH_URL must be set")
}

/// Returns the Spotify OAuth token endpoint URL, used for both the
/// authorization-code and the refresh exchange.
///
/// # Panics
///
/// Panics if the `SPOTIFY_TOKEN_URL` environment variable is not set.
pub fn spotify_token_url() -> String {
    env::var("SPOTIFY_TOKEN_URL").expect("SPOTIFY_TOKEN_URL must be set")
}

/// Returns the Spotify Web API base URL used for all catalog and library
/// calls after authentication.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_URL` environment variable is not set.
pub fn spotify_api_url() -> String {
    env::var("SPOTIFY_API_URL").expect("SPOTIFY_API_URL must be set")
}
