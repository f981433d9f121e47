use axum::{Json, extract::State};
use serde::Deserialize;

use super::{ApiError, ApiJson, BearerToken};
use crate::{
    enrichment::{EnrichmentPipeline, filter_by_genres},
    management::apply_user_genres,
    server::AppState,
    types::{EnrichedTrack, TrackEntry},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichRequest {
    pub tracks: Vec<TrackEntry>,
    /// When set, the user's own tags are merged into the result.
    #[serde(default)]
    pub user_id: Option<String>,
}

pub async fn enrich(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    ApiJson(request): ApiJson<EnrichRequest>,
) -> Result<Json<Vec<EnrichedTrack>>, ApiError> {
    let metadata = state.spotify.metadata(&token);
    let pipeline = EnrichmentPipeline::new(
        metadata.as_ref(),
        state.secondary.as_ref(),
        state.fallback.as_ref(),
        &state.normalizer,
        &state.settings,
    );

    let mut enriched = pipeline.enrich(request.tracks).await;
    if let Some(user_id) = request.user_id.as_deref() {
        apply_user_genres(state.user_genres.as_ref(), user_id, &mut enriched).await?;
    }

    Ok(Json(enriched))
}

#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    pub tracks: Vec<EnrichedTrack>,
    #[serde(default)]
    pub genres: Vec<String>,
}

pub async fn filter(ApiJson(request): ApiJson<FilterRequest>) -> Json<Vec<EnrichedTrack>> {
    let selected = filter_by_genres(&request.tracks, &request.genres)
        .into_iter()
        .cloned()
        .collect();
    Json(selected)
}
