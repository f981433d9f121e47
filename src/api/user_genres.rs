use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiJson};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGenreRequest {
    pub user_id: String,
    pub genre: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGenresResponse {
    pub track_id: String,
    pub genres: Vec<String>,
}

pub async fn get_user_genres(
    State(state): State<AppState>,
    Path(track_id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Result<Json<UserGenresResponse>, ApiError> {
    let genres = state.user_genres.get(&query.user_id, &track_id).await?;
    Ok(Json(UserGenresResponse { track_id, genres }))
}

pub async fn add_user_genre(
    State(state): State<AppState>,
    Path(track_id): Path<String>,
    ApiJson(request): ApiJson<UserGenreRequest>,
) -> Result<Json<UserGenresResponse>, ApiError> {
    let genres = state
        .user_genres
        .add(&request.user_id, &track_id, &request.genre)
        .await?;
    Ok(Json(UserGenresResponse { track_id, genres }))
}

pub async fn remove_user_genre(
    State(state): State<AppState>,
    Path(track_id): Path<String>,
    ApiJson(request): ApiJson<UserGenreRequest>,
) -> Result<Json<UserGenresResponse>, ApiError> {
    let genres = state
        .user_genres
        .remove(&request.user_id, &track_id, &request.genre)
        .await?;
    Ok(Json(UserGenresResponse { track_id, genres }))
}
