use crate::{
    config,
    enrichment::{EnrichmentPipeline, EnrichmentSettings, GenreNormalizer},
    error,
    lastfm::LastFmClient,
    management::{FallbackGenreManager, TokenManager, UserGenreManager, apply_user_genres},
    playlist::PlaylistProvider,
    spotify::SpotifyClient,
    types::{EnrichedTrack, TrackEntry},
    utils, warning,
};

/// A logged-in Spotify client and the id of the user it acts for.
pub(super) struct Session {
    pub client: SpotifyClient,
    pub user_id: String,
}

pub(super) async fn session() -> Session {
    let mut token_mgr = match TokenManager::load().await {
        Ok(manager) => manager,
        Err(e) => {
            error!(
                "Failed to load token. Please run spopify auth\n Error: {}",
                e
            );
        }
    };

    let client = SpotifyClient::new(token_mgr.get_valid_token().await);
    let user_id = match config::spotify_user() {
        Some(id) => id,
        None => match client.current_user().await {
            Ok(profile) => profile.id,
            Err(e) => error!("Failed to read Spotify profile. Err: {}", e),
        },
    };

    Session { client, user_id }
}

pub(super) async fn fetch_tracks(session: &Session, playlist_id: &str) -> Vec<TrackEntry> {
    let pb = utils::spinner("Fetching playlist tracks...");
    let tracks = session.client.playlist_tracks(playlist_id).await;
    pb.finish_and_clear();

    match tracks {
        Ok(tracks) => tracks,
        Err(e) => error!("Failed to fetch playlist {}. Err: {}", playlist_id, e),
    }
}

/// Fetches and enriches a playlist, merging in the user's own tags.
pub(super) async fn enriched_tracks(session: &Session, playlist_id: &str) -> Vec<EnrichedTrack> {
    let tracks = fetch_tracks(session, playlist_id).await;

    let fallback = match FallbackGenreManager::load().await {
        Ok(manager) => manager,
        Err(e) => {
            warning!("Ignoring fallback genres. Err: {}", e);
            FallbackGenreManager::new(Vec::new())
        }
    };
    let lastfm = LastFmClient::from_env();
    let normalizer = GenreNormalizer::default();
    let settings = EnrichmentSettings::from_env();

    let pb = utils::spinner(format!("Looking up genres for {} tracks...", tracks.len()));
    let pipeline =
        EnrichmentPipeline::new(&session.client, &lastfm, &fallback, &normalizer, &settings);
    let mut enriched = pipeline.enrich(tracks).await;
    pb.finish_and_clear();

    match UserGenreManager::load().await {
        Ok(store) => {
            if let Err(e) = apply_user_genres(&store, &session.user_id, &mut enriched).await {
                warning!("Ignoring custom tags. Err: {}", e);
            }
        }
        Err(e) => warning!("Ignoring custom tags. Err: {}", e),
    }

    enriched
}
