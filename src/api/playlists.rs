use axum::{
    Json,
    extract::{Path, State},
};

use super::{ApiError, BearerToken};
use crate::{
    server::AppState,
    types::{Playlist, TrackEntry},
};

pub async fn playlists(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<Vec<Playlist>>, ApiError> {
    let provider = state.spotify.playlists(&token);
    Ok(Json(provider.user_playlists().await?))
}

pub async fn playlist_tracks(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(playlist_id): Path<String>,
) -> Result<Json<Vec<TrackEntry>>, ApiError> {
    let provider = state.spotify.playlists(&token);
    Ok(Json(provider.playlist_tracks(&playlist_id).await?))
}
