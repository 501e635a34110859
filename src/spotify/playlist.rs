use reqwest::Client;

use crate::{
    config,
    types::{
        AddTracksRequest, AddTracksResponse, CreatePlaylistRequest, CreatePlaylistResponse,
        GetUserPlaylistsResponse, Track,
    },
};

/// Checks whether the current user already owns a playlist with `name`.
///
/// Looks at the first 50 of the user's playlists, which is plenty for
/// duplicate detection of the generated names this tool produces.
pub async fn exists(token: &str, name: &str) -> Result<bool, reqwest::Error> {
    let client = Client::new();
    let api_url = format!(
        "{uri}/me/playlists?limit=50",
        uri = &config::spotify_api_url()
    );

    let response = client
        .get(&api_url)
        .bearer_auth(token)
        .send()
        .await?
        .error_for_status()?;

    let res = response.json::<GetUserPlaylistsResponse>().await?;
    Ok(res.items.iter().any(|p| p.name == name))
}

/// Creates a new private playlist for the configured user.
pub async fn create(
    token: &str,
    name: String,
    description: String,
) -> Result<CreatePlaylistResponse, reqwest::Error> {
    let client = Client::new();
    let api_url = format!(
        "{uri}/users/{user}/playlists",
        uri = &config::spotify_api_url(),
        user = &config::spotify_user()
    );

    let body = CreatePlaylistRequest {
        name,
        description,
        public: false,
        collaborative: false,
    };

    let response = client
        .post(&api_url)
        .bearer_auth(token)
        .json(&body)
        .send()
        .await?
        .error_for_status()?;

    response.json::<CreatePlaylistResponse>().await
}

/// Adds tracks to a playlist. The API caps a single request at 100 URIs;
/// callers chunk accordingly.
pub async fn add_tracks(
    token: &str,
    playlist_id: String,
    tracks: Vec<Track>,
) -> Result<AddTracksResponse, reqwest::Error> {
    let client = Client::new();
    let api_url = format!(
        "{uri}/playlists/{id}/tracks",
        uri = &config::spotify_api_url(),
        id = playlist_id
    );

    let body = AddTracksRequest {
        uris: tracks.iter().map(|t| t.uri.clone()).collect(),
    };

    let response = client
        .post(&api_url)
        .bearer_auth(token)
        .json(&body)
        .send()
        .await?
        .error_for_status()?;

    response.json::<AddTracksResponse>().await
}
