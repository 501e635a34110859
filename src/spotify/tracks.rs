use std::time::Duration;

use reqwest::{Client, StatusCode};
use tokio::time::sleep;

use crate::{config, types::TopTracksResponse, types::Track, warning};

/// Fetches the user's top tracks, the seed for personalized playlists.
///
/// `time_range` is one of Spotify's affinity windows: `short_term` (~4
/// weeks), `medium_term` (~6 months), or `long_term` (years).
///
/// Handles rate limiting by honoring the `Retry-After` header on 429
/// responses, waiting and retrying for delays up to 120 seconds; longer
/// delays are reported as a warning and the request is not retried.
pub async fn get_top(
    token: &str,
    limit: u32,
    time_range: &str,
) -> Result<Vec<Track>, reqwest::Error> {
    let client = Client::new();
    let api_url = format!(
        "{uri}/me/top/tracks?limit={limit}&time_range={time_range}",
        uri = &config::spotify_api_url(),
        limit = limit,
        time_range = time_range
    );

    loop {
        let response = client.get(&api_url).bearer_auth(token).send().await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            if let Some(retry_after) = response.headers().get("retry-after") {
                let retry_after = retry_after
                    .to_str()
                    .unwrap_or("0")
                    .parse::<u64>()
                    .unwrap_or(0);
                if retry_after <= 120 {
                    sleep(Duration::from_secs(retry_after)).await;
                    continue;
                }
                warning!(
                    "Retry-After has reached an abnormal high of {} seconds. Try again later.",
                    retry_after
                );
            }
        }

        let response = response.error_for_status()?;
        let res = response.json::<TopTracksResponse>().await?;

        return Ok(res.items);
    }
}
