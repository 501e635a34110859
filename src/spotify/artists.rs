use std::time::Duration;

use reqwest::{Client, StatusCode};
use tokio::time::sleep;

use crate::{
    config,
    types::{Artist, FollowedArtistsResponse},
};

/// Retrieves a page of followed artists from the Spotify Web API.
///
/// Uses cursor-based pagination: the returned tuple carries the artists of
/// this page plus the cursor for the next one, if any. 502 Bad Gateway
/// responses are retried after a 10-second delay; all other errors are
/// propagated immediately.
///
/// # Arguments
///
/// * `token` - Valid access token obtained from the token store
/// * `limit` - Maximum number of artists per page (1-50)
/// * `after` - Optional cursor where the next page starts
pub async fn get_followed(
    token: &str,
    limit: u64,
    after: Option<String>,
) -> Result<(Vec<Artist>, Option<String>), reqwest::Error> {
    let attempt_after = after.clone();

    loop {
        let mut api_url = format!(
            "{uri}/me/following?type=artist&limit={limit}",
            uri = &config::spotify_api_url(),
            limit = limit
        );
        if let Some(after_val) = &attempt_after {
            api_url.push_str(&format!("&after={}", after_val));
        }

        let client = Client::new();
        let response = client.get(&api_url).bearer_auth(token).send().await;

        let response = match response {
            Ok(resp) => match resp.error_for_status() {
                Ok(valid_response) => valid_response,
                Err(err) => {
                    if let Some(status) = err.status() {
                        if status == StatusCode::BAD_GATEWAY {
                            sleep(Duration::from_secs(10)).await;
                            continue; // retry
                        }
                    }
                    return Err(err); // propagate other errors
                }
            },
            Err(err) => {
                return Err(err);
            } // network or reqwest error
        };

        let res = response.json::<FollowedArtistsResponse>().await?;
        let next_after = res.artists.cursors.and_then(|c| c.after);

        return Ok((res.artists.items, next_after));
    }
}
