use std::collections::HashMap;

use async_trait::async_trait;

use super::SpotifyClient;
use crate::{enrichment::PrimaryMetadataSource, error::SourceError, types::SeveralArtistsResponse};

/// Most artist ids `GET /artists` accepts per request.
pub const MAX_ARTISTS_PER_REQUEST: usize = 50;

impl SpotifyClient {
    /// Retrieves the genre tags of several artists in one request.
    ///
    /// Uses `GET /artists?ids=...`. Spotify answers unknown ids with `null`
    /// entries; those are left out of the result instead of failing the
    /// whole batch.
    ///
    /// # Arguments
    ///
    /// * `ids` - Artist ids, at most [`MAX_ARTISTS_PER_REQUEST`]
    ///
    /// # Returns
    ///
    /// - `Ok(HashMap)` - Raw genre tags by artist id
    /// - `Err(SourceError::RateLimited)` - 429 with the `Retry-After` hint
    /// - `Err(SourceError::Malformed)` - too many ids or an unreadable body
    pub async fn artist_genres(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, Vec<String>>, SourceError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        if ids.len() > MAX_ARTISTS_PER_REQUEST {
            return Err(SourceError::Malformed(format!(
                "{} artist ids requested, at most {} allowed",
                ids.len(),
                MAX_ARTISTS_PER_REQUEST
            )));
        }

        let url = self.url(&format!("/artists?ids={}", ids.join(",")));
        let response: SeveralArtistsResponse = self.get_json(&url).await?;

        Ok(response
            .artists
            .into_iter()
            .flatten()
            .map(|artist| (artist.id, artist.genres))
            .collect())
    }
}

#[async_trait]
impl PrimaryMetadataSource for SpotifyClient {
    async fn genres_by_artist_ids(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, Vec<String>>, SourceError> {
        self.artist_genres(ids).await
    }
}
