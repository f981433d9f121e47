//! Last.fm `artist.getTopTags` client, the secondary tag source of the
//! enrichment pipeline.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::{
    config, enrichment::SecondaryTagSource, error::SourceError, types::TopTagsResponse, utils,
};

/// Last.fm error code for an unknown artist.
const ERROR_INVALID_RESOURCE: u32 = 6;
/// Last.fm error code for an exceeded rate limit.
const ERROR_RATE_LIMIT: u32 = 29;

#[derive(Debug, Clone)]
pub struct LastFmClient {
    http: Client,
    api_url: String,
    api_key: String,
    tag_limit: usize,
}

impl LastFmClient {
    /// Client configured from `LASTFM_API_URL`, `LASTFM_API_KEY` and
    /// `LASTFM_TAG_LIMIT`.
    pub fn from_env() -> Self {
        Self::new(
            config::lastfm_apiurl(),
            config::lastfm_api_key(),
            config::lastfm_tag_limit(),
        )
    }

    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>, tag_limit: usize) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into(),
            api_key: api_key.into(),
            tag_limit,
        }
    }

    /// Top tags of an artist by name, most used first, at most `tag_limit`.
    pub async fn artist_top_tags(&self, artist_name: &str) -> Result<Vec<String>, SourceError> {
        let response = self
            .http
            .get(&self.api_url)
            .query(&[
                ("method", "artist.gettoptags"),
                ("artist", artist_name),
                ("api_key", &self.api_key),
                ("format", "json"),
                ("autocorrect", "1"),
            ])
            .send()
            .await
            .map_err(SourceError::from_http)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimited {
                retry_after: utils::retry_after(response.headers()),
            });
        }
        if status.is_server_error() {
            return Err(SourceError::Unavailable(format!("Last.fm answered HTTP {}", status)));
        }

        // Last.fm reports most failures as a JSON body with an error code,
        // sometimes with a 4xx status and sometimes with 200.
        let body: TopTagsResponse = response.json().await.map_err(SourceError::from_http)?;
        self.tags_from(artist_name, body)
    }

    fn tags_from(
        &self,
        artist_name: &str,
        body: TopTagsResponse,
    ) -> Result<Vec<String>, SourceError> {
        if let Some(code) = body.error {
            let message = body.message.unwrap_or_default();
            return Err(match code {
                ERROR_INVALID_RESOURCE => SourceError::NotFound(artist_name.to_string()),
                ERROR_RATE_LIMIT => SourceError::RateLimited { retry_after: None },
                _ => SourceError::Unavailable(format!("Last.fm error {}: {}", code, message)),
            });
        }

        let tags = body.toptags.map(|t| t.tag).unwrap_or_default();
        Ok(tags
            .into_iter()
            .map(|t| t.name.trim().to_string())
            .filter(|name| !name.is_empty())
            .take(self.tag_limit)
            .collect())
    }
}

#[async_trait]
impl SecondaryTagSource for LastFmClient {
    async fn top_tags(&self, artist_name: &str) -> Result<Vec<String>, SourceError> {
        self.artist_top_tags(artist_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> LastFmClient {
        LastFmClient::new("http://localhost/2.0/", "key", 2)
    }

    #[test]
    fn keeps_top_tags_up_to_limit() {
        let body: TopTagsResponse = serde_json::from_str(
            r#"{"toptags":{"tag":[{"name":"shoegaze","count":100},{"name":" ","count":90},{"name":"dream pop","count":80},{"name":"indie","count":10}]}}"#,
        )
        .unwrap();

        let tags = client().tags_from("Slowdive", body).unwrap();
        assert_eq!(tags, vec!["shoegaze", "dream pop"]);
    }

    #[test]
    fn maps_error_codes() {
        let unknown: TopTagsResponse = serde_json::from_str(
            r#"{"error":6,"message":"The artist you supplied could not be found"}"#,
        )
        .unwrap();
        assert_eq!(
            client().tags_from("Nobody", unknown),
            Err(SourceError::NotFound("Nobody".to_string()))
        );

        let limited: TopTagsResponse =
            serde_json::from_str(r#"{"error":29,"message":"Rate limit exceeded"}"#).unwrap();
        assert!(matches!(
            client().tags_from("Anyone", limited),
            Err(SourceError::RateLimited { retry_after: None })
        ));
    }

    #[test]
    fn missing_toptags_is_empty() {
        let body: TopTagsResponse = serde_json::from_str("{}").unwrap();
        assert!(client().tags_from("Anyone", body).unwrap().is_empty());
    }
}
