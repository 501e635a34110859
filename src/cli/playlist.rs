use std::time::Duration;

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    error,
    error::AuthError,
    info, spotify, success,
    types::Track,
    warning,
};

/// Builds a personalized playlist from the user's top tracks.
///
/// Gate → top tracks → duplicate check → create → add tracks in chunks of
/// 100 (the API cap per request). An already-existing playlist of the same
/// name is reported and left alone.
pub async fn playlist(name: Option<String>, limit: u32, time_range: String) {
    let store = super::open_store().await;

    let token = match store.get_valid_access_token().await {
        Ok(token) => token,
        Err(e @ AuthError::NotAuthenticated) => {
            error!("{}", e);
        }
        Err(e) => {
            error!("Failed to get access token: {}", e);
        }
    };

    let playlist_name =
        name.unwrap_or_else(|| format!("Personal Mix {}", Utc::now().format("%Y-%m-%d")));

    let playlist_exists = match spotify::playlist::exists(&token, &playlist_name).await {
        Ok(exists) => exists,
        Err(e) => {
            warning!("Failed to check if playlist exists: {}", e);
            false
        }
    };

    if playlist_exists {
        info!("Playlist {} already exists", playlist_name);
        return;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching top tracks...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let tracks: Vec<Track> = match spotify::tracks::get_top(&token, limit, &time_range).await {
        Ok(tracks) => tracks,
        Err(e) => {
            pb.finish_and_clear();
            error!("Failed to fetch top tracks: {}", e);
        }
    };
    pb.finish_and_clear();

    if tracks.is_empty() {
        warning!("No top tracks found for time range {}", time_range);
        return;
    }

    info!(
        "Creating playlist {} with {} tracks",
        playlist_name,
        tracks.len()
    );

    let description = format!(
        "Your {} favorites, picked on {}.",
        time_range.replace('_', " "),
        Utc::now().format("%Y-%m-%d")
    );

    let playlist_id = match spotify::playlist::create(&token, playlist_name.clone(), description).await
    {
        Ok(resp) => {
            success!("Playlist {} created.", playlist_name);
            resp.id
        }
        Err(e) => {
            error!("Failed to create playlist: {}", e);
        }
    };

    for chunk in tracks.chunks(100) {
        // re-ask the gate; adding many chunks can outlive the token
        let token = match store.get_valid_access_token().await {
            Ok(token) => token,
            Err(e) => {
                error!("Failed to get access token: {}", e);
            }
        };

        match spotify::playlist::add_tracks(&token, playlist_id.clone(), chunk.to_vec()).await {
            Ok(_) => success!("Added {} tracks to {}", chunk.len(), playlist_name),
            Err(e) => warning!("Failed to add tracks to playlist: {}", e),
        };
    }
}
