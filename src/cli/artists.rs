use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    error,
    error::AuthError,
    spotify,
    types::{Artist, ArtistTableRow},
};

/// Lists the user's followed artists, sorted by name, optionally filtered
/// by a case-insensitive search term.
pub async fn list_artists(search: Option<String>) {
    let store = super::open_store().await;

    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching followed artists...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let mut all_artists: Vec<Artist> = Vec::new();
    let mut after: Option<String> = None;

    loop {
        // fresh token per page; the gate refreshes lazily when needed
        let token = match store.get_valid_access_token().await {
            Ok(token) => token,
            Err(e @ AuthError::NotAuthenticated) => {
                pb.finish_and_clear();
                error!("{}", e);
            }
            Err(e) => {
                pb.finish_and_clear();
                error!("Failed to get access token: {}", e);
            }
        };

        match spotify::artists::get_followed(&token, 50, after.clone()).await {
            Ok((artists, next_after)) => {
                all_artists.extend(artists);
                match next_after {
                    Some(cursor) => after = Some(cursor),
                    None => break,
                }
            }
            Err(e) => {
                pb.finish_and_clear();
                error!("Failed to fetch followed artists: {}", e);
            }
        }
    }

    pb.finish_and_clear();

    all_artists.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    if let Some(artist_search) = search {
        let search_term = artist_search.to_lowercase();
        all_artists.retain(|a| a.name.to_lowercase().contains(&search_term));
    }

    let table_rows: Vec<ArtistTableRow> = all_artists
        .into_iter()
        .map(|a| ArtistTableRow {
            name: a.name,
            genres: a
                .genres
                .iter()
                .take(3)
                .cloned()
                .collect::<Vec<_>>()
                .join(","),
        })
        .collect();

    let table = Table::new(table_rows);
    println!("{}", table);
}
