use reqwest::{Client, StatusCode};

use crate::{
    config::Settings,
    error::ApiError,
    types::{CurrentlyPlayingResponse, NowPlaying},
};

/// Fetches the user's currently playing track.
///
/// Returns `Ok(None)` when nothing is playing: an empty 204 response, a
/// paused player, or an item that is not a track.
///
/// An expired bearer token surfaces as [`ApiError::TokenExpired`] so the
/// caller can refresh and retry on its next tick.
pub async fn currently_playing(
    client: &Client,
    settings: &Settings,
    access_token: &str,
) -> Result<Option<NowPlaying>, ApiError> {
    let api_url = format!(
        "{uri}/me/player/currently-playing",
        uri = settings.api_url
    );

    let response = client.get(&api_url).bearer_auth(access_token).send().await?;

    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return Ok(None);
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::from_response(status, &body));
    }

    let playing = response.json::<CurrentlyPlayingResponse>().await?;
    if !playing.is_playing {
        return Ok(None);
    }

    Ok(playing.item.as_ref().map(NowPlaying::from))
}
