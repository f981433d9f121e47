use std::time::Duration;

use reqwest::{Client, Method, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tokio::time::sleep;

use crate::{config, error::SourceError, utils};

/// Attempts for a request answered with 502 Bad Gateway.
const GATEWAY_ATTEMPTS: u32 = 3;
const GATEWAY_RETRY_DELAY: Duration = Duration::from_secs(10);

/// Spotify Web API client bound to one access token.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    token: String,
}

impl SpotifyClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(config::spotify_apiurl(), token)
    }

    pub fn with_base_url(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_http(Client::new(), api_url, token)
    }

    /// Shares an existing connection pool, used by the HTTP server which
    /// creates one client per request.
    pub fn with_http(http: Client, api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
        let response = self.send(Method::GET, url, None::<&()>).await?;
        response.json::<T>().await.map_err(SourceError::from_http)
    }

    pub(crate) async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: &B,
    ) -> Result<T, SourceError> {
        let response = self.send(method, url, Some(body)).await?;
        response.json::<T>().await.map_err(SourceError::from_http)
    }

    /// Sends a request, retrying 502 Bad Gateway a few times since Spotify
    /// answers it sporadically under load.
    async fn send<B: Serialize>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<Response, SourceError> {
        let mut attempt = 1;

        loop {
            let mut request = self
                .http
                .request(method.clone(), url)
                .bearer_auth(&self.token);
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await.map_err(SourceError::from_http)?;
            if response.status() == StatusCode::BAD_GATEWAY && attempt < GATEWAY_ATTEMPTS {
                attempt += 1;
                sleep(GATEWAY_RETRY_DELAY).await;
                continue;
            }

            return check_status(response).await;
        }
    }
}

/// Turns non-success responses into the matching [`SourceError`].
async fn check_status(response: Response) -> Result<Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    match status {
        StatusCode::TOO_MANY_REQUESTS => Err(SourceError::RateLimited {
            retry_after: utils::retry_after(response.headers()),
        }),
        StatusCode::UNAUTHORIZED => Err(SourceError::Unauthorized),
        StatusCode::NOT_FOUND => Err(SourceError::NotFound(url)),
        s if s.is_server_error() => {
            Err(SourceError::Unavailable(format!("HTTP {} from {}", s, url)))
        }
        s => {
            let body = response.text().await.unwrap_or_default();
            Err(SourceError::Malformed(format!("HTTP {} from {}: {}", s, url, body)))
        }
    }
}
