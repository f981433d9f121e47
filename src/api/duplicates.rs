use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiJson, BearerToken};
use crate::{
    dedup,
    server::AppState,
    types::{DuplicateEntry, RemovalSelection, TrackEntry},
};

#[derive(Debug, Deserialize)]
pub struct DuplicatesRequest {
    pub tracks: Vec<TrackEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeduplicateRequest {
    pub playlist_id: String,
    /// Entries as the client last saw them. Fetched fresh when absent.
    #[serde(default)]
    pub tracks: Option<Vec<TrackEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveRequest {
    pub playlist_id: String,
    pub tracks: Vec<TrackEntry>,
    pub selections: Vec<RemovalSelection>,
}

#[derive(Debug, Serialize)]
pub struct RemovedResponse {
    pub removed: usize,
}

/// Every repeated entry after its first occurrence.
pub async fn duplicates(
    ApiJson(request): ApiJson<DuplicatesRequest>,
) -> Result<Json<Vec<DuplicateEntry>>, ApiError> {
    dedup::validate_positions(&request.tracks)?;
    Ok(Json(dedup::find_duplicates(&request.tracks)))
}

pub async fn deduplicate(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    ApiJson(request): ApiJson<DeduplicateRequest>,
) -> Result<Json<RemovedResponse>, ApiError> {
    let playlist_id = require_playlist_id(&request.playlist_id)?;
    let provider = state.spotify.playlists(&token);

    let removed = match request.tracks {
        Some(tracks) => dedup::deduplicate_tracks(provider.as_ref(), playlist_id, &tracks).await?,
        None => dedup::deduplicate_playlist(provider.as_ref(), playlist_id).await?,
    };

    Ok(Json(RemovedResponse { removed }))
}

pub async fn remove(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    ApiJson(request): ApiJson<RemoveRequest>,
) -> Result<Json<RemovedResponse>, ApiError> {
    let playlist_id = require_playlist_id(&request.playlist_id)?;
    let provider = state.spotify.playlists(&token);

    let removed = dedup::remove_selected(
        provider.as_ref(),
        playlist_id,
        &request.tracks,
        &request.selections,
    )
    .await?;

    Ok(Json(RemovedResponse { removed }))
}

fn require_playlist_id(playlist_id: &str) -> Result<&str, ApiError> {
    let playlist_id = playlist_id.trim();
    if playlist_id.is_empty() {
        return Err(ApiError::BadRequest("playlistId is required".to_string()));
    }
    Ok(playlist_id)
}
