mod common;

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use common::{MemoryPlaylist, MockPrimary, MockSecondary, tracks_from_ids};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use spopify::{
    enrichment::{EnrichmentSettings, GenreNormalizer, PrimaryMetadataSource},
    management::{FallbackGenreManager, UserGenreManager},
    playlist::PlaylistProvider,
    server::{AppState, SpotifyConnector, build_router},
    types::TrackEntry,
};
use tempfile::TempDir;
use tokio::sync::Mutex;
use tower::ServiceExt;

/// Hands out fresh in-memory views for every request.
struct TestConnector {
    genres: HashMap<String, Vec<String>>,
    tracks: Vec<TrackEntry>,
}

impl SpotifyConnector for TestConnector {
    fn metadata(&self, _access_token: &str) -> Box<dyn PrimaryMetadataSource> {
        Box::new(MockPrimary {
            genres: self.genres.clone(),
            ..Default::default()
        })
    }

    fn playlists(&self, _access_token: &str) -> Box<dyn PlaylistProvider> {
        Box::new(MemoryPlaylist::new(self.tracks.clone()))
    }
}

// Helper function to build the router over test doubles. The returned
// directory holds the user genre file and must outlive the router.
async fn test_app(tracks: Vec<TrackEntry>) -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let user_genres = UserGenreManager::load_from(dir.path().join("user-genres.json"))
        .await
        .unwrap();

    let state = AppState {
        spotify: Arc::new(TestConnector {
            genres: HashMap::from([("a1".to_string(), vec!["synthpop".to_string()])]),
            tracks,
        }),
        secondary: Arc::new(MockSecondary::default()),
        fallback: Arc::new(FallbackGenreManager::new(Vec::new())),
        user_genres: Arc::new(user_genres),
        normalizer: Arc::new(GenreNormalizer::default()),
        settings: Arc::new(EnrichmentSettings {
            primary_delay: Duration::ZERO,
            secondary_delay: Duration::ZERO,
            ..Default::default()
        }),
        pkce: Arc::new(Mutex::new(None)),
    };

    (build_router(state), dir)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn track_json(id: &str, position: usize, artist_id: &str) -> Value {
    json!({
        "trackId": id,
        "trackName": format!("Song {}", id),
        "artists": [{ "artistId": artist_id, "artistName": "Someone" }],
        "position": position
    })
}

#[tokio::test]
async fn test_health() {
    let (app, _dir) = test_app(Vec::new()).await;

    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "spopify");
}

#[tokio::test]
async fn test_missing_bearer_token_is_unauthorized() {
    let (app, _dir) = test_app(Vec::new()).await;

    let (status, body) = send(&app, "GET", "/playlists", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = send(
        &app,
        "POST",
        "/enrich",
        None,
        Some(json!({ "tracks": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_duplicates_lists_later_occurrences() {
    let (app, _dir) = test_app(Vec::new()).await;

    let body = json!({
        "tracks": [track_json("A", 0, "a1"), track_json("B", 1, "a1"), track_json("A", 2, "a1")]
    });
    let (status, body) = send(&app, "POST", "/duplicates", None, Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["trackId"], "A");
    assert_eq!(body[0]["position"], 2);
}

#[tokio::test]
async fn test_malformed_bodies_are_bad_requests() {
    let (app, _dir) = test_app(Vec::new()).await;

    let (status, body) = send(&app, "POST", "/duplicates", None, Some(json!({ "nope": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    // Two entries claiming the same position
    let body = json!({ "tracks": [track_json("A", 0, "a1"), track_json("B", 0, "a1")] });
    let (status, _) = send(&app, "POST", "/duplicates", None, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/deduplicate",
        Some("token"),
        Some(json!({ "playlistId": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_deduplicate_reports_removed_count() {
    let tracks = tracks_from_ids(&[Some("A"), Some("B"), Some("A"), Some("A")]);
    let (app, _dir) = test_app(tracks).await;

    let (status, body) = send(
        &app,
        "POST",
        "/deduplicate",
        Some("token"),
        Some(json!({ "playlistId": "p1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "removed": 2 }));

    let (status, body) = send(
        &app,
        "POST",
        "/deduplicate",
        Some("token"),
        Some(json!({ "playlistId": "missing" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_remove_selected_positions() {
    let tracks = tracks_from_ids(&[Some("A"), Some("B"), Some("A")]);
    let (app, _dir) = test_app(tracks).await;

    let body = json!({
        "playlistId": "p1",
        "tracks": [track_json("A", 0, "a1"), track_json("B", 1, "a1"), track_json("A", 2, "a1")],
        "selections": [{ "uri": "spotify:track:A", "position": 0 }]
    });
    let (status, body) = send(&app, "POST", "/remove", Some("token"), Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], 1);
}

#[tokio::test]
async fn test_enrich_and_filter() {
    let (app, _dir) = test_app(Vec::new()).await;

    let body = json!({ "tracks": [track_json("t1", 0, "a1"), track_json("t2", 1, "a2")] });
    let (status, enriched) = send(&app, "POST", "/enrich", Some("token"), Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(enriched[0]["trackId"], "t1");
    assert_eq!(enriched[0]["genres"], json!(["pop"]));
    assert_eq!(enriched[1]["genres"], json!(["Unknown Genre"]));

    let body = json!({ "tracks": enriched, "genres": ["pop"] });
    let (status, filtered) = send(&app, "POST", "/filter", None, Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(filtered.as_array().map(Vec::len), Some(1));
    assert_eq!(filtered[0]["trackId"], "t1");
}

#[tokio::test]
async fn test_user_genres_round_trip() {
    let (app, _dir) = test_app(Vec::new()).await;

    let (status, body) = send(
        &app,
        "POST",
        "/user-genres/t2",
        None,
        Some(json!({ "userId": "u1", "genre": "night drive" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "trackId": "t2", "genres": ["night drive"] }));

    let (status, body) = send(&app, "GET", "/user-genres/t2?userId=u1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["genres"], json!(["night drive"]));

    // User tags replace the placeholder genre during enrichment
    let body = json!({ "tracks": [track_json("t2", 0, "a2")], "userId": "u1" });
    let (_, enriched) = send(&app, "POST", "/enrich", Some("token"), Some(body)).await;
    assert_eq!(enriched[0]["genres"], json!(["night drive"]));

    let (status, body) = send(
        &app,
        "DELETE",
        "/user-genres/t2",
        None,
        Some(json!({ "userId": "u1", "genre": "Night Drive" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["genres"], json!([]));

    let (status, _) = send(
        &app,
        "POST",
        "/user-genres/t2",
        None,
        Some(json!({ "userId": "u1", "genre": " " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
