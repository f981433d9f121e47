use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Extension, Router,
    routing::{get, post},
};
use reqwest::Client;
use tokio::sync::Mutex;

use crate::{
    Res, api, config,
    enrichment::{
        EnrichmentSettings, FallbackGenreStore, GenreNormalizer, PrimaryMetadataSource,
        SecondaryTagSource,
    },
    lastfm::LastFmClient,
    management::{FallbackGenreManager, UserGenreManager, UserGenreStore},
    playlist::PlaylistProvider,
    spotify::SpotifyClient,
    types::PkceToken,
};

/// Opens per-request views on Spotify for a caller's access token.
pub trait SpotifyConnector: Send + Sync {
    fn metadata(&self, access_token: &str) -> Box<dyn PrimaryMetadataSource>;

    fn playlists(&self, access_token: &str) -> Box<dyn PlaylistProvider>;
}

/// [`SpotifyConnector`] sharing one connection pool across requests.
pub struct SpotifyApiConnector {
    http: Client,
    api_url: String,
}

impl SpotifyApiConnector {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into(),
        }
    }

    fn client(&self, access_token: &str) -> SpotifyClient {
        SpotifyClient::with_http(self.http.clone(), self.api_url.clone(), access_token)
    }
}

impl SpotifyConnector for SpotifyApiConnector {
    fn metadata(&self, access_token: &str) -> Box<dyn PrimaryMetadataSource> {
        Box::new(self.client(access_token))
    }

    fn playlists(&self, access_token: &str) -> Box<dyn PlaylistProvider> {
        Box::new(self.client(access_token))
    }
}

/// Everything the API handlers share.
#[derive(Clone)]
pub struct AppState {
    pub spotify: Arc<dyn SpotifyConnector>,
    pub secondary: Arc<dyn SecondaryTagSource>,
    pub fallback: Arc<dyn FallbackGenreStore>,
    pub user_genres: Arc<dyn UserGenreStore>,
    pub normalizer: Arc<GenreNormalizer>,
    pub settings: Arc<EnrichmentSettings>,
    pub pkce: Arc<Mutex<Option<PkceToken>>>,
}

impl AppState {
    /// State backed by the real services and the stores in the data
    /// directory.
    pub async fn from_env() -> Res<Self> {
        let fallback = FallbackGenreManager::load().await?;
        let user_genres = UserGenreManager::load().await?;

        Ok(Self {
            spotify: Arc::new(SpotifyApiConnector::new(config::spotify_apiurl())),
            secondary: Arc::new(LastFmClient::from_env()),
            fallback: Arc::new(fallback),
            user_genres: Arc::new(user_genres),
            normalizer: Arc::new(GenreNormalizer::default()),
            settings: Arc::new(EnrichmentSettings::from_env()),
            pkce: Arc::new(Mutex::new(None)),
        })
    }
}

/// Full API router.
pub fn build_router(state: AppState) -> Router {
    let pkce = Arc::clone(&state.pkce);

    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(pkce)))
        .route("/enrich", post(api::enrich))
        .route("/duplicates", post(api::duplicates))
        .route("/deduplicate", post(api::deduplicate))
        .route("/remove", post(api::remove))
        .route("/filter", post(api::filter))
        .route("/playlists", get(api::playlists))
        .route("/playlists/{id}/tracks", get(api::playlist_tracks))
        .route(
            "/user-genres/{track_id}",
            get(api::get_user_genres)
                .post(api::add_user_genre)
                .delete(api::remove_user_genre),
        )
        .with_state(state)
}

/// Router for the login flow only: health and the OAuth callback.
pub fn auth_router(pkce: Arc<Mutex<Option<PkceToken>>>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(pkce)))
}

/// Binds `SERVER_ADDRESS` and serves `app` until the task is dropped.
pub async fn serve(app: Router) -> Res<()> {
    let addr = SocketAddr::from_str(&config::server_addr())
        .map_err(|e| format!("Failed to parse server address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
